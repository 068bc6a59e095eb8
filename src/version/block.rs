//! Recursive walk over the VERSIONINFO block tree.
//!
//! Every block shares the same header:
//!
//! ```text
//! +0x00  wLength       total size of the block including children, excluding trailing padding
//! +0x02  wValueLength  value size (UTF-16 units for text, bytes for binary)
//! +0x04  wType         0 = binary, 1 = text
//! +0x06  szKey         NUL-terminated UTF-16 key
//!        padding to 4
//!        Value
//!        padding to 4
//!        Children
//! ```
//!
//! The walker folds the tree depth-first into a single [`VersionInfo`]. Offsets are relative to
//! the start of the root block (see [`crate::file::Cursor::rebase`]), and no block is ever allowed
//! to reach past the end of its parent.

use widestring::U16String;

use crate::{
    file::Cursor,
    version::{FixedVersion, VersionInfo},
    Error, Result,
};

/// Maximum nesting depth of blocks, the root included.
pub const MAX_BLOCK_DEPTH: usize = 32;
/// Maximum number of UTF-16 units read for a block key.
pub const MAX_KEY_LENGTH: usize = 200;
/// Key of the root block, whose binary value is a `VS_FIXEDFILEINFO`.
pub const VS_VERSION_INFO_KEY: &str = "VS_VERSION_INFO";
/// Bytes of `VS_FIXEDFILEINFO` up to and including the product version.
pub const FIXED_VERSION_SIZE: usize = 24;

/// `dwSignature` and `dwStrucVersion`
const FIXED_INFO_PREFIX: usize = 8;

/// Round `offset` up to the next multiple of 4.
fn pad4(offset: usize) -> usize {
    offset.saturating_add(3) & !3
}

/// Decode a string of UTF-16 units, replacing unpaired surrogates.
fn utf16_to_string(units: Vec<u16>) -> String {
    U16String::from_vec(units).to_string_lossy()
}

/// Depth-first walker owning the accumulator under construction.
struct BlockWalker<'a, C: Cursor> {
    cursor: &'a mut C,
    info: VersionInfo,
}

impl<C: Cursor> BlockWalker<'_, C> {
    /// Parse one block and all of its children.
    ///
    /// `parent_end` is the relative offset at which the enclosing block ends.
    fn block(&mut self, parent_end: usize, depth: usize) -> Result<()> {
        if depth >= MAX_BLOCK_DEPTH {
            return Err(Error::RecursionLimit(MAX_BLOCK_DEPTH));
        }

        self.cursor.align(4)?;
        let start = self.cursor.pos();

        let total_length = self.cursor.read_le::<u16>()?;
        let value_length = self.cursor.read_le::<u16>()?;
        let value_type = self.cursor.read_le::<u16>()?;
        let end = start
            .saturating_add(usize::from(total_length))
            .min(parent_end);

        let key = self.key()?;
        if pad4(self.cursor.pos()) <= end {
            self.cursor.align(4)?;
        }

        if value_type == 0 {
            self.binary_value(&key, usize::from(value_length), end)?;
        } else {
            let value = self.text_value(&key, usize::from(value_length), end)?;
            self.info.insert(key, value);
        }

        while pad4(self.cursor.pos()) < end {
            self.block(end, depth + 1)?;
        }

        let target = pad4(self.cursor.pos()).min(end);
        if target > self.cursor.pos() {
            self.cursor.seek(target)?;
        }

        Ok(())
    }

    /// Read a NUL-terminated key of at most [`MAX_KEY_LENGTH`] units.
    fn key(&mut self) -> Result<String> {
        let mut units = Vec::new();
        for _ in 0..MAX_KEY_LENGTH {
            let unit = self.cursor.read_le::<u16>()?;
            if unit == 0 {
                break;
            }
            units.push(unit);
        }

        Ok(utf16_to_string(units))
    }

    /// Read a text value of up to `length` units, then move to the end of the declared value.
    fn text_value(&mut self, key: &str, length: usize, end: usize) -> Result<String> {
        let start = self.cursor.pos();
        let available = end.saturating_sub(start) / 2;
        let length = length.min(available);

        let mut units = Vec::with_capacity(length);
        let mut terminated = false;
        for _ in 0..length {
            let unit = self.cursor.read_le::<u16>()?;
            if unit == 0 {
                terminated = true;
                break;
            }
            units.push(unit);
        }

        if !terminated && length > 0 {
            log::warn!(
                "Text value of '{}' is not NUL-terminated within {} units",
                key,
                length
            );
        }

        let value_end = start + length * 2;
        if value_end > self.cursor.pos() {
            self.cursor.seek(value_end)?;
        }

        Ok(utf16_to_string(units))
    }

    /// Consume a binary value, decoding `VS_FIXEDFILEINFO` on the root block.
    fn binary_value(&mut self, key: &str, length: usize, end: usize) -> Result<()> {
        let start = self.cursor.pos();
        let length = length.min(end.saturating_sub(start));

        if key == VS_VERSION_INFO_KEY && length >= FIXED_VERSION_SIZE {
            self.cursor.advance_by(FIXED_INFO_PREFIX)?;

            let file_version = self.fixed_version()?;
            let product_version = self.fixed_version()?;
            log::debug!(
                "Fixed file version {}, product version {}",
                file_version,
                product_version
            );

            self.info.file_version = Some(file_version.to_string());
            self.info.product_version = Some(product_version.to_string());
        }

        let value_end = start + length;
        if value_end > self.cursor.pos() {
            self.cursor.seek(value_end)?;
        }

        Ok(())
    }

    fn fixed_version(&mut self) -> Result<FixedVersion> {
        let mut words = [0_u16; 4];
        for word in &mut words {
            *word = self.cursor.read_le::<u16>()?;
        }

        Ok(FixedVersion::from_words(words))
    }
}

/// Decode the VERSIONINFO tree whose root block starts at the cursor position.
///
/// The cursor is rebased first, so block alignment and ends are measured from the root. The walk
/// never reads past the declared length of the root block.
///
/// # Errors
/// - [`crate::Error::Truncated`] if any block runs past the available data
/// - [`crate::Error::RecursionLimit`] if blocks nest deeper than [`MAX_BLOCK_DEPTH`]
/// - [`crate::Error::MalformedHeader`] / [`crate::Error::FileError`] from the cursor back-end
///
/// # Examples
///
/// ```rust,no_run
/// use peversion::{version::parse_version_info, Parser};
///
/// let resource = std::fs::read("version.bin")?;
/// let info = parse_version_info(&mut Parser::new(&resource))?;
/// println!("{:?}", info.file_version);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_version_info<C: Cursor>(cursor: &mut C) -> Result<VersionInfo> {
    cursor.rebase();

    let mut walker = BlockWalker {
        cursor,
        info: VersionInfo::default(),
    };
    walker.block(usize::MAX, 0)?;

    Ok(walker.info)
}
