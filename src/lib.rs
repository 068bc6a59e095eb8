// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # peversion
//!
//! Decodes the version information (`VS_VERSION_INFO`) embedded in 32-bit Windows PE images:
//! file and product version, description, copyright and every other string the resource carries.
//! Pure Rust, no Windows APIs, works on any platform.
//!
//! ## Features
//!
//! - **Two input back-ends, one decoder** - in-memory buffers (including memory-mapped files) and
//!   forward-only [`std::io::Read`] streams go through the same [`Cursor`]-generic pipeline
//! - **Hardened against crafted input** - every offset taken from the file is bounds-checked, the
//!   VERSIONINFO walk has a depth ceiling, and no block may escape its parent
//! - **Precise errors** - [`Error::ResourceNotFound`] separates "no version information" from
//!   damaged input
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peversion::VersionInfo;
//!
//! let info = VersionInfo::from_file("app.exe")?;
//! println!("{} {}",
//!     info.product_name.as_deref().unwrap_or("unknown"),
//!     info.file_version.as_deref().unwrap_or("unknown"));
//! # Ok::<(), peversion::Error>(())
//! ```
//!
//! ### Decoding a Buffer or Stream
//!
//! ```rust,no_run
//! use std::{fs, io::BufReader};
//!
//! let data = fs::read("app.exe")?;
//! let from_buffer = peversion::decode(&data)?;
//!
//! let reader = BufReader::new(fs::File::open("app.exe")?);
//! let from_stream = peversion::decode_stream(reader)?;
//!
//! assert_eq!(from_buffer, from_stream);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! Decoding is a straight pipeline over one [`Cursor`]:
//!
//! 1. [`pe::PeHeaders`] - DOS and PE signatures, PE32 optional header, resource directory RVA
//! 2. [`pe::SectionHeader`] - locate `.rsrc` and translate RVAs to file offsets
//! 3. [`pe::resource`] - walk the resource directory to the RT_VERSION data
//! 4. [`version`] - fold the VERSIONINFO block tree into a [`VersionInfo`]
//!
//! The first failure aborts the decode; a partially filled [`VersionInfo`] is never returned.
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use peversion::{Error, VersionInfo};
//!
//! match VersionInfo::from_file("app.exe") {
//!     Ok(info) => println!("{:?}", info),
//!     Err(e) if e.is_not_found() => println!("No version information"),
//!     Err(Error::MalformedHeader { message, .. }) => println!("Malformed file: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Development and Testing
//!
//! ```bash
//! cargo test
//!
//! # Fuzzing
//! cargo +nightly fuzz run versioninfo --release
//! ```

use std::io::Read;

#[macro_use]
pub(crate) mod error;
pub mod file;
pub mod pe;
pub mod prelude;
pub mod version;

#[cfg(test)]
pub(crate) mod test;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use peversion::{Result, VersionInfo};
///
/// fn product_name(path: &str) -> Result<Option<String>> {
///     Ok(VersionInfo::from_file(path)?.product_name)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `peversion` Error type
///
/// See [`error::Error`](Error) for the taxonomy.
pub use error::Error;

/// Byte sources and cursors.
///
/// [`Parser`] walks a buffer, [`StreamParser`] walks any reader, and [`File`] owns a
/// memory-mapped or in-memory image.
///
/// # Example
///
/// ```rust
/// use peversion::{Cursor, Parser};
///
/// let data = [0x4D, 0x5A, 0x90, 0x00];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_le::<u16>()?, 0x5A4D);
/// # Ok::<(), peversion::Error>(())
/// ```
pub use file::{parser::Parser, stream::StreamParser, Cursor, File};

/// Decoded version information and its building blocks.
pub use version::{FixedVersion, StringField, VersionInfo};

/// Decode the version information of a PE32 image held in memory.
///
/// # Errors
/// - [`Error::MalformedHeader`] if the headers are not those of a PE32 image
/// - [`Error::ResourceNotFound`] if the image carries no version resource
/// - [`Error::Truncated`] if any structure runs past the end of `data`
/// - [`Error::RecursionLimit`] if the VERSIONINFO tree nests too deep
///
/// # Examples
///
/// ```rust,no_run
/// let data = std::fs::read("app.exe")?;
/// let info = peversion::decode(&data)?;
/// println!("{:?}", info.file_version);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(data: &[u8]) -> Result<VersionInfo> {
    decode_from(&mut Parser::new(data))
}

/// Decode the version information of a PE32 image from a forward-only stream.
///
/// The stream is consumed up to the end of the version resource; nothing is buffered beyond the
/// value currently being decoded. Images whose resource directory points backwards (to data
/// already consumed) fail with [`Error::MalformedHeader`].
///
/// # Errors
/// As [`decode`], plus [`Error::FileError`] for read failures other than an early end of stream.
pub fn decode_stream<R: Read>(reader: R) -> Result<VersionInfo> {
    decode_from(&mut StreamParser::new(reader))
}

/// Run the full pipeline on a cursor positioned at the start of the image.
///
/// # Errors
/// See [`decode`].
pub fn decode_from<C: Cursor>(cursor: &mut C) -> Result<VersionInfo> {
    let headers = pe::PeHeaders::read(cursor)?;
    decode_with_headers(cursor, &headers)
}

/// Resource lookup and VERSIONINFO walk for headers that were already read.
///
/// A forward-only cursor must still sit where [`pe::PeHeaders::read`] left it.
pub(crate) fn decode_with_headers<C: Cursor>(
    cursor: &mut C,
    headers: &pe::PeHeaders,
) -> Result<VersionInfo> {
    let offset = pe::find_version_resource(cursor, headers)?;

    log::debug!("VERSIONINFO at file offset 0x{:x}", offset);
    cursor.seek(offset)?;
    version::parse_version_info(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{sample_image, PeBuilder, ResourceBuilder};

    #[test]
    fn decode_sample() {
        let info = decode(&sample_image()).unwrap();

        assert_eq!(info.file_version.as_deref(), Some("1.2.3.4"));
        assert_eq!(info.product_version.as_deref(), Some("1.2.3-beta"));
        assert_eq!(info.file_description.as_deref(), Some("Example App"));
        assert_eq!(info.product_name.as_deref(), Some("Example"));
        assert_eq!(info.values["CompanyName"], "Example Corp");
    }

    #[test]
    fn stream_and_buffer_agree() {
        let image = sample_image();

        assert_eq!(
            decode_stream(image.as_slice()).unwrap(),
            decode(&image).unwrap()
        );
    }

    #[test]
    fn not_found() {
        let image = PeBuilder::new()
            .resources(ResourceBuilder::new().resource(3, vec![0; 16]))
            .build();

        let error = decode(&image).unwrap_err();
        assert!(error.is_not_found());
        assert!(decode_stream(image.as_slice()).unwrap_err().is_not_found());
    }
}
