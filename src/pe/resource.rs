//! Resource directory traversal.
//!
//! The resource directory is a three-level tree (type → name/id → language) stored in the
//! `.rsrc` section. Every directory starts with a 16-byte header followed by
//! `NumberOfNamedEntries + NumberOfIdEntries` 8-byte entries:
//!
//! ```text
//! directory header                      entry
//! +0x00  Characteristics                +0x00  Name / Id
//! +0x04  TimeDateStamp                  +0x04  OffsetToData (top bit: sub-directory)
//! +0x08  MajorVersion, MinorVersion
//! +0x0C  NumberOfNamedEntries
//! +0x0E  NumberOfIdEntries
//! ```
//!
//! All entry offsets are relative to the start of the resource directory. Leaf entries point at
//! a 16-byte data entry whose first dword is the RVA of the resource bytes.

use crate::{
    file::Cursor,
    pe::section::SectionHeader,
    Error::{self, ResourceNotFound},
    Result,
};

/// Resource type id of version information.
pub const RT_VERSION: u32 = 16;
/// Top bit of an entry offset, set when the entry points at a sub-directory.
pub const SUBDIRECTORY_FLAG: u32 = 0x8000_0000;
/// Size of a resource directory header.
pub const DIRECTORY_HEADER_SIZE: usize = 16;

/// One decoded entry of a resource directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDirectoryEntry {
    /// Integer id, or the name offset for named entries
    pub id: u32,
    /// `true` if [`ResourceDirectoryEntry::target`] is a sub-directory
    pub is_subdirectory: bool,
    /// Offset of the sub-directory or data entry, relative to the resource directory
    pub target: u32,
}

impl ResourceDirectoryEntry {
    /// Read an 8-byte directory entry at the cursor position.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the entry runs past the data.
    pub fn read<C: Cursor>(cursor: &mut C) -> Result<ResourceDirectoryEntry> {
        let id = cursor.read_le::<u32>()?;
        let offset = cursor.read_le::<u32>()?;

        Ok(ResourceDirectoryEntry {
            id,
            is_subdirectory: offset & SUBDIRECTORY_FLAG != 0,
            target: offset & !SUBDIRECTORY_FLAG,
        })
    }
}

/// File location of the version resource bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionResource {
    /// File offset of the VERSIONINFO root block
    pub offset: usize,
    /// Size recorded in the data entry
    pub size: u32,
}

/// Walks the resource directory of one `.rsrc` section.
struct ResourceWalker<'a> {
    section: &'a SectionHeader,
    /// File offset of the root directory
    root: usize,
}

impl ResourceWalker<'_> {
    /// File offset of something `target` bytes into the resource directory.
    fn offset_of(&self, target: u32) -> Result<usize> {
        self.root
            .checked_add(target as usize)
            .ok_or_else(|| malformed_error!("Resource offset 0x{:x} overflows", target))
    }

    /// Seek to a directory header and return its total entry count, leaving the cursor at the
    /// first entry.
    fn enter<C: Cursor>(&self, cursor: &mut C, directory: usize) -> Result<u32> {
        cursor.seek(directory)?;
        cursor.advance_by(12)?;
        let named = cursor.read_le::<u16>()?;
        let ids = cursor.read_le::<u16>()?;

        Ok(u32::from(named) + u32::from(ids))
    }

    /// First entry of a non-root directory, regardless of its id.
    fn first_entry<C: Cursor>(
        &self,
        cursor: &mut C,
        directory: usize,
    ) -> Result<ResourceDirectoryEntry> {
        if self.enter(cursor, directory)? == 0 {
            log::debug!("Empty resource directory at 0x{:x}", directory);
            return Err(ResourceNotFound);
        }

        ResourceDirectoryEntry::read(cursor)
    }

    fn find_version<C: Cursor>(&self, cursor: &mut C) -> Result<VersionResource> {
        let count = self.enter(cursor, self.root)?;

        let mut version_type = None;
        for _ in 0..count {
            let entry = ResourceDirectoryEntry::read(cursor)?;
            if entry.id == RT_VERSION {
                version_type = Some(entry);
                break;
            }
        }

        let Some(version_type) = version_type else {
            return Err(ResourceNotFound);
        };
        if !version_type.is_subdirectory {
            return Err(ResourceNotFound);
        }

        let name = self.first_entry(cursor, self.offset_of(version_type.target)?)?;
        if !name.is_subdirectory {
            return Err(ResourceNotFound);
        }

        let language = self.first_entry(cursor, self.offset_of(name.target)?)?;
        if language.is_subdirectory {
            return Err(ResourceNotFound);
        }

        cursor.seek(self.offset_of(language.target)?)?;
        let data_rva = cursor.read_le::<u32>()?;
        let size = cursor.read_le::<u32>()?;
        let offset = self.section.rva_to_offset(data_rva)?;

        log::debug!(
            "Version resource (name {}, language {}) at RVA 0x{:x}, file offset 0x{:x}, {} bytes",
            name.id,
            language.id,
            data_rva,
            offset,
            size
        );

        Ok(VersionResource { offset, size })
    }
}

/// Locate the RT_VERSION resource inside the resource directory at `resource_rva`.
///
/// Walks the root directory for type 16, then takes the first entry of the name level and the
/// first entry of the language level, without discriminating on their ids.
///
/// # Errors
/// - [`crate::Error::ResourceNotFound`] if there is no RT_VERSION entry, a directory on the path
///   is empty, or an entry is a leaf where a sub-directory is expected (or the reverse)
/// - [`crate::Error::Truncated`] if any directory or data entry runs past the data
/// - [`crate::Error::MalformedHeader`] if an RVA does not map into the section
pub fn find_version_resource<C: Cursor>(
    cursor: &mut C,
    section: &SectionHeader,
    resource_rva: u32,
) -> Result<VersionResource> {
    let walker = ResourceWalker {
        section,
        root: section.rva_to_offset(resource_rva)?,
    };

    walker.find_version(cursor).map_err(|error| {
        if matches!(error, Error::ResourceNotFound) {
            log::debug!("No RT_VERSION resource in directory at RVA 0x{:x}", resource_rva);
        }
        error
    })
}
