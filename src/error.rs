use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedHeader {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedHeader {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant is terminal for a single decode call: the pipeline aborts at the first failure
/// and no partially filled [`crate::VersionInfo`] is ever handed out.
///
/// # Error Categories
///
/// ## Format Errors
/// - [`Error::MalformedHeader`] - Bad MZ/PE/optional-header magic, zero counts, impossible offsets
/// - [`Error::Truncated`] - A read, skip or seek ran past the available data
/// - [`Error::RecursionLimit`] - The VERSIONINFO block tree nests deeper than allowed
///
/// ## Legitimate Absence
/// - [`Error::ResourceNotFound`] - A well-formed image without an RT_VERSION resource
///
/// ## I/O
/// - [`Error::FileError`] - Filesystem or stream errors other than an early end of data
///
/// # Examples
///
/// ```rust,no_run
/// use peversion::{Error, VersionInfo};
///
/// match VersionInfo::from_file("app.exe") {
///     Ok(info) => println!("{:?}", info.file_version),
///     Err(Error::ResourceNotFound) => eprintln!("No version information"),
///     Err(Error::MalformedHeader { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The PE headers are damaged or describe an unsupported image.
    ///
    /// Raised for a missing `MZ` or `PE\0\0` signature, an optional header that is not PE32,
    /// zero section or optional-header counts, and offsets computed from file data that cannot
    /// be represented. The error includes the source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    MalformedHeader {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A read, skip or seek would have gone past the end of the data.
    #[error("Truncated - out of bound read would have occurred!")]
    Truncated,

    /// The image is well-formed but carries no RT_VERSION resource.
    ///
    /// Also raised when the resource directory is structurally inconsistent while searching for
    /// it (empty directories, a leaf where a sub-directory is expected or the other way round).
    #[error("No version resource found")]
    ResourceNotFound,

    /// Recursion limit reached.
    ///
    /// The VERSIONINFO walker refuses to nest deeper than a fixed ceiling, so crafted input
    /// cannot exhaust the stack. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors from opening or mapping a file, or from a stream back-end.
    /// An early end of stream is reported as [`Error::Truncated`] instead.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error means "no version information available".
    ///
    /// Callers use this to tell a legitimate absence apart from malformed or unreadable input.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ResourceNotFound)
    }

    /// Maps an I/O error from a stream back-end, turning an early EOF into [`Error::Truncated`].
    pub(crate) fn from_stream(error: std::io::Error) -> Error {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::FileError(error)
        }
    }
}
