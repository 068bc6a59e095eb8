//! PE32 navigation down to the version resource.
//!
//! This module implements the first three stages of the decoding pipeline, each consuming the
//! same [`crate::file::Cursor`]:
//!
//! 1. [`header::PeHeaders::read`] validates the DOS/PE signatures and the PE32 optional header and
//!    extracts the section table location and the resource directory RVA
//! 2. [`section::SectionHeader::find_resource_section`] scans the section table for `.rsrc`,
//!    which provides the RVA-to-file-offset mapping
//! 3. [`resource::find_version_resource`] walks the three-level resource directory to the
//!    RT_VERSION data entry
//!
//! Every offset computed from file data is checked before it is used, so crafted images fail with
//! [`crate::Error::Truncated`] or [`crate::Error::MalformedHeader`] rather than reading out of
//! bounds.
//!
//! # Examples
//!
//! ```rust,no_run
//! use peversion::{pe, Cursor, Parser};
//!
//! let data = std::fs::read("app.exe")?;
//! let mut parser = Parser::new(&data);
//!
//! let headers = pe::PeHeaders::read(&mut parser)?;
//! let offset = pe::find_version_resource(&mut parser, &headers)?;
//! println!("VERSIONINFO starts at file offset 0x{:x}", offset);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod header;
pub mod resource;
pub mod section;

pub use header::PeHeaders;
pub use resource::{ResourceDirectoryEntry, VersionResource, RT_VERSION};
pub use section::SectionHeader;

use crate::{file::Cursor, Error, Result};

/// Resolve the file offset of the VERSIONINFO root block of an image whose headers have
/// already been read.
///
/// # Errors
/// - [`crate::Error::ResourceNotFound`] if the image has no resource directory, no `.rsrc`
///   section, or no RT_VERSION entry
/// - [`crate::Error::Truncated`] / [`crate::Error::MalformedHeader`] for damaged input
pub fn find_version_resource<C: Cursor>(cursor: &mut C, headers: &PeHeaders) -> Result<usize> {
    if headers.resource_rva == 0 {
        log::debug!("Image has no resource directory");
        return Err(Error::ResourceNotFound);
    }

    let section = SectionHeader::find_resource_section(cursor, headers)?;
    let resource = resource::find_version_resource(cursor, &section, headers.resource_rva)?;

    Ok(resource.offset)
}
