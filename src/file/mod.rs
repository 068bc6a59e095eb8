//! Byte sources and cursors for PE decoding.
//!
//! This module abstracts over where the executable bytes come from and how they are walked.
//! The decoder never opens files or mutates input itself; it only moves a [`Cursor`] over a
//! caller-owned source.
//!
//! # Architecture
//!
//! - **Cursor abstraction** - [`Cursor`] is the single capability interface the decoding pipeline
//!   is written against: little-endian reads, forward skips, seeks and 4-byte alignment
//! - **Cursor back-ends** - [`crate::file::parser::Parser`] walks an in-memory buffer with random
//!   access, [`crate::file::stream::StreamParser`] walks any [`std::io::Read`] forward-only
//! - **Backend system** - [`Backend`] is the owning storage behind [`File`]: a memory-mapped file
//!   on disk or an owned buffer
//!
//! # Key Components
//!
//! - [`crate::file::File`] - Loaded PE image with validated headers
//! - [`crate::file::Cursor`] - Read position contract shared by both back-ends
//! - [`crate::file::io`] - Low-level little-endian decoding helpers
//!
//! # Examples
//!
//! ## Loading from File
//!
//! ```rust,no_run
//! use peversion::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("app.exe"))?;
//! println!("Loaded PE file with {} bytes", file.len());
//! println!("Number of sections: {}", file.headers().number_of_sections);
//!
//! let info = file.version_info()?;
//! println!("File version: {:?}", info.file_version);
//! # Ok::<(), peversion::Error>(())
//! ```
//!
//! ## Loading from Memory
//!
//! ```rust,no_run
//! use peversion::File;
//! use std::fs;
//!
//! let data = fs::read("app.exe")?;
//! let file = File::from_mem(data)?;
//! println!("Resource directory RVA: 0x{:x}", file.headers().resource_rva);
//! # Ok::<(), peversion::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! [`File`] is `Send + Sync` and may be shared across threads. Cursors are not shared: every
//! decode call creates its own.

pub mod io;
pub mod parser;
pub mod stream;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    decode_with_headers,
    file::{io::PeIO, parser::Parser},
    pe::PeHeaders,
    version::VersionInfo,
    Result,
};
use memory::Memory;
use physical::Physical;

/// Read position over a byte source.
///
/// The decoding pipeline is generic over this trait so that a single algorithm serves both the
/// random-access buffer back-end and the forward-only stream back-end. Every operation that would
/// run past the available data fails with [`crate::Error::Truncated`] instead of returning
/// undefined data.
///
/// Positions are byte offsets from the cursor's origin. The origin starts at the beginning of the
/// source and can be moved to the current position with [`Cursor::rebase`].
pub trait Cursor {
    /// Current offset relative to the origin.
    fn pos(&self) -> usize;

    /// Move to `pos`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if `pos` lies beyond the data. Forward-only back-ends
    /// additionally fail with [`crate::Error::MalformedHeader`] if `pos` lies before the current
    /// position.
    fn seek(&mut self, pos: usize) -> Result<()>;

    /// Advance by exactly `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if fewer than `step` bytes remain.
    fn advance_by(&mut self, step: usize) -> Result<()>;

    /// Read a little-endian `T` and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if fewer than `size_of::<T>()` bytes remain.
    fn read_le<T: PeIO>(&mut self) -> Result<T>;

    /// Make the current position the new origin, so [`Cursor::pos`] reports `0`.
    fn rebase(&mut self);

    /// Advance to the next multiple of `alignment` (relative to the origin).
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the padding runs past the data.
    fn align(&mut self, alignment: usize) -> Result<()> {
        let padding = (alignment - (self.pos() % alignment)) % alignment;
        self.advance_by(padding)
    }
}

/// Backend trait for file data sources.
///
/// This trait abstracts over the storage holding a PE image, allowing for both in-memory and
/// on-disk representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

/// A loaded PE image whose headers have been validated.
///
/// `File` owns the bytes (memory-mapped or in memory) and the [`PeHeaders`] located when it was
/// loaded, so [`File::version_info`] only has to resolve the resource section and walk the
/// resource tree.
///
/// # Examples
///
/// ```rust,no_run
/// use peversion::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("app.exe"))?;
/// match file.version_info() {
///     Ok(info) => println!("{:?}", info.product_name),
///     Err(e) if e.is_not_found() => println!("No version information"),
///     Err(e) => return Err(e),
/// }
/// # Ok::<(), peversion::Error>(())
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// Header fields located when the file was loaded.
    headers: PeHeaders,
}

impl File {
    /// Loads a PE file from the given path.
    ///
    /// The file is memory-mapped for efficient access.
    ///
    /// # Arguments
    ///
    /// * `file` - Path to the PE file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped, or if its headers are not a
    /// valid PE32 image.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Arguments
    ///
    /// * `data` - The bytes of the PE file.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer's headers are not a valid PE32 image.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    /// Internal loader for any backend.
    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        let data: Box<dyn Backend> = Box::new(data);
        let headers = PeHeaders::read(&mut Parser::new(data.data()))?;

        Ok(File { data, headers })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    /// Returns the raw bytes of the image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns the header fields located when the file was loaded.
    #[must_use]
    pub fn headers(&self) -> &PeHeaders {
        &self.headers
    }

    /// Decodes the VERSIONINFO resource of this image.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ResourceNotFound`] if the image has no version resource,
    /// [`crate::Error::Truncated`] or [`crate::Error::MalformedHeader`] for damaged input.
    pub fn version_info(&self) -> Result<VersionInfo> {
        decode_with_headers(&mut Parser::new(self.data()), &self.headers)
    }
}
