//! Result types of the VERSIONINFO decoder.

use std::{collections::BTreeMap, fmt, io::Read, path::Path};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{decode, decode_stream, File, Result};

/// String keys that have a dedicated field in [`VersionInfo`].
///
/// Matching is exact and case-sensitive, as in the resource itself.
///
/// ```rust
/// use peversion::StringField;
/// use std::str::FromStr;
///
/// assert_eq!(StringField::from_str("ProductName"), Ok(StringField::ProductName));
/// assert!(StringField::from_str("productname").is_err());
/// assert_eq!(StringField::LegalCopyright.to_string(), "LegalCopyright");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    Display,
    IntoStaticStr,
    EnumIter,
)]
pub enum StringField {
    /// `FileDescription`
    FileDescription,
    /// `FileVersion`
    FileVersion,
    /// `ProductVersion`
    ProductVersion,
    /// `ProductName`
    ProductName,
    /// `InternalName`
    InternalName,
    /// `LegalCopyright`
    LegalCopyright,
    /// `OriginalFilename`
    OriginalFilename,
    /// `Comments`
    Comments,
}

/// A version number packed into two dwords of `VS_FIXEDFILEINFO`.
///
/// The most significant dword holds `major:minor`, the least significant one `build:revision`,
/// each as high:low 16-bit halves. Read as little-endian words, the stream order is
/// `minor, major, revision, build`.
///
/// ```rust
/// use peversion::FixedVersion;
///
/// let version = FixedVersion::from_words([2, 1, 4, 3]);
/// assert_eq!(version.to_string(), "1.2.3.4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedVersion {
    /// High word of the most significant dword
    pub major: u16,
    /// Low word of the most significant dword
    pub minor: u16,
    /// High word of the least significant dword
    pub build: u16,
    /// Low word of the least significant dword
    pub revision: u16,
}

impl FixedVersion {
    /// Build from four words in stream order.
    #[must_use]
    pub fn from_words(words: [u16; 4]) -> FixedVersion {
        FixedVersion {
            major: words[1],
            minor: words[0],
            build: words[3],
            revision: words[2],
        }
    }
}

impl fmt::Display for FixedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Version information decoded from the VERSIONINFO resource of a PE image.
///
/// Every recognised [`StringField`] found anywhere in the block tree sets the matching field,
/// regardless of which `StringTable` it sits in; later occurrences overwrite earlier ones. The
/// numeric versions from `VS_FIXEDFILEINFO` are stored in `file_version` / `product_version`
/// first, so string entries with the same keys take precedence. All other text entries land in
/// [`VersionInfo::values`], also last-write-wins.
///
/// # Examples
///
/// ```rust,no_run
/// use peversion::VersionInfo;
///
/// let info = VersionInfo::from_file("app.exe")?;
/// println!("{} {}",
///     info.product_name.as_deref().unwrap_or("?"),
///     info.product_version.as_deref().unwrap_or("?"));
///
/// for (key, value) in info.iter() {
///     println!("{key}: {value}");
/// }
/// # Ok::<(), peversion::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    /// Text entries without a dedicated field, keyed by their raw name
    pub values: BTreeMap<String, String>,
    /// `FileDescription`
    pub file_description: Option<String>,
    /// `FileVersion`, either the string entry or the fixed file version
    pub file_version: Option<String>,
    /// `ProductVersion`, either the string entry or the fixed product version
    pub product_version: Option<String>,
    /// `ProductName`
    pub product_name: Option<String>,
    /// `InternalName`
    pub internal_name: Option<String>,
    /// `LegalCopyright`
    pub legal_copyright: Option<String>,
    /// `OriginalFilename`
    pub original_filename: Option<String>,
    /// `Comments`
    pub comments: Option<String>,
}

impl VersionInfo {
    /// Decode the version information of the executable at `path`.
    ///
    /// The file is memory-mapped, not read into memory.
    ///
    /// # Errors
    /// See [`crate::decode`]; additionally [`crate::Error::FileError`] if the file cannot be
    /// opened.
    pub fn from_file(path: impl AsRef<Path>) -> Result<VersionInfo> {
        File::from_file(path.as_ref())?.version_info()
    }

    /// Decode the version information of an executable held in memory.
    ///
    /// # Errors
    /// See [`crate::decode`].
    pub fn from_mem(data: &[u8]) -> Result<VersionInfo> {
        decode(data)
    }

    /// Decode the version information from a forward-only stream.
    ///
    /// # Errors
    /// See [`crate::decode_stream`].
    pub fn from_reader<R: Read>(reader: R) -> Result<VersionInfo> {
        decode_stream(reader)
    }

    /// Value of a recognised field.
    #[must_use]
    pub fn field(&self, field: StringField) -> Option<&str> {
        let value = match field {
            StringField::FileDescription => &self.file_description,
            StringField::FileVersion => &self.file_version,
            StringField::ProductVersion => &self.product_version,
            StringField::ProductName => &self.product_name,
            StringField::InternalName => &self.internal_name,
            StringField::LegalCopyright => &self.legal_copyright,
            StringField::OriginalFilename => &self.original_filename,
            StringField::Comments => &self.comments,
        };

        value.as_deref()
    }

    /// Look up any entry by its resource key, recognised or not.
    ///
    /// ```rust
    /// use peversion::VersionInfo;
    ///
    /// let mut info = VersionInfo::default();
    /// info.product_name = Some("Example".to_string());
    /// info.values.insert("PrivateBuild".to_string(), "B".to_string());
    ///
    /// assert_eq!(info.get("ProductName"), Some("Example"));
    /// assert_eq!(info.get("PrivateBuild"), Some("B"));
    /// assert_eq!(info.get("SpecialBuild"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key.parse::<StringField>() {
            Ok(field) => self.field(field),
            Err(_) => self.values.get(key).map(String::as_str),
        }
    }

    /// All present entries: recognised fields in declaration order, then the remaining values
    /// sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        StringField::iter()
            .filter_map(|field| {
                let key: &'static str = field.into();
                self.field(field).map(|value| (key, value))
            })
            .chain(
                self.values
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )
    }

    /// Returns `true` if no entry was decoded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Store a text entry, routing recognised keys to their field.
    pub(crate) fn insert(&mut self, key: String, value: String) {
        let slot = match key.parse::<StringField>() {
            Ok(StringField::FileDescription) => &mut self.file_description,
            Ok(StringField::FileVersion) => &mut self.file_version,
            Ok(StringField::ProductVersion) => &mut self.product_version,
            Ok(StringField::ProductName) => &mut self.product_name,
            Ok(StringField::InternalName) => &mut self.internal_name,
            Ok(StringField::LegalCopyright) => &mut self.legal_copyright,
            Ok(StringField::OriginalFilename) => &mut self.original_filename,
            Ok(StringField::Comments) => &mut self.comments,
            Err(_) => {
                self.values.insert(key, value);
                return;
            }
        };

        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_version_order() {
        let version = FixedVersion::from_words([2, 1, 4, 3]);
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 2);
        assert_eq!(version.build, 3);
        assert_eq!(version.revision, 4);
        assert_eq!(version.to_string(), "1.2.3.4");

        assert_eq!(
            FixedVersion::from_words([0, 10, 0xFFFF, 19041]).to_string(),
            "10.0.19041.65535"
        );
    }

    #[test]
    fn insert_routes_fields() {
        let mut info = VersionInfo::default();
        info.insert("FileDescription".to_string(), "Example App".to_string());
        info.insert("Comments".to_string(), "none".to_string());
        info.insert("CompanyName".to_string(), "Example Corp".to_string());
        info.insert("filedescription".to_string(), "lowercase".to_string());

        assert_eq!(info.file_description.as_deref(), Some("Example App"));
        assert_eq!(info.comments.as_deref(), Some("none"));
        assert_eq!(info.values.len(), 2);
        assert_eq!(info.get("CompanyName"), Some("Example Corp"));
        assert_eq!(info.get("filedescription"), Some("lowercase"));
    }

    #[test]
    fn insert_last_write_wins() {
        let mut info = VersionInfo::default();
        info.insert("PrivateBuild".to_string(), "A".to_string());
        info.insert("PrivateBuild".to_string(), "B".to_string());
        info.insert("ProductName".to_string(), "First".to_string());
        info.insert("ProductName".to_string(), "Second".to_string());

        assert_eq!(info.values["PrivateBuild"], "B");
        assert_eq!(info.product_name.as_deref(), Some("Second"));
    }

    #[test]
    fn iter_order() {
        let mut info = VersionInfo::default();
        assert!(info.is_empty());

        info.insert("Zeta".to_string(), "z".to_string());
        info.insert("Alpha".to_string(), "a".to_string());
        info.insert("ProductName".to_string(), "Example".to_string());
        info.insert("FileVersion".to_string(), "1.0".to_string());

        let entries: Vec<_> = info.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("FileVersion", "1.0"),
                ("ProductName", "Example"),
                ("Alpha", "a"),
                ("Zeta", "z"),
            ]
        );
        assert!(!info.is_empty());
    }

    #[test]
    fn thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VersionInfo>();
    }
}
