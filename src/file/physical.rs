//! Physical file backend for memory-mapped I/O.
//!
//! This module provides the [`crate::file::physical::Physical`] backend that implements the
//! [`crate::file::Backend`] trait for accessing executables on disk through a read-only memory
//! mapping. Only the pages the decoder actually touches (headers, section table, resource
//! directory, version data) are ever faulted in, which keeps lookups on large binaries cheap.
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use peversion::file::{Physical, Backend};
//! use std::path::Path;
//!
//! let physical = Physical::new(Path::new("app.exe"))?;
//! println!("File size: {} bytes", physical.len());
//! assert_eq!(&physical.data()[0..2], b"MZ");
//! # Ok::<(), peversion::Error>(())
//! ```

use super::Backend;
use crate::{Error::FileError, Result};

use memmap2::Mmap;
use std::{fs, path::Path};

/// A file backend that uses memory-mapped I/O for efficient access to files on disk.
#[derive(Debug)]
pub struct Physical {
    /// Memory-mapped file data
    data: Mmap,
}

impl Physical {
    /// Create a new physical file backend by memory-mapping the specified file.
    ///
    /// # Arguments
    /// * `path` - Path to the PE file on disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or mapped.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        // The mapping is read-only; the decoder never writes through it.
        let mmap = unsafe { Mmap::map(&file) }.map_err(FileError)?;

        Ok(Physical { data: mmap })
    }
}

impl Backend for Physical {
    fn data(&self) -> &[u8] {
        self.data.as_ref()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}
