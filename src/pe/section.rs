//! Section table scanning and RVA translation.
//!
//! Each section header is 40 bytes:
//!
//! ```text
//! +0x00  Name[8]
//! +0x08  VirtualSize
//! +0x0C  VirtualAddress
//! +0x10  SizeOfRawData
//! +0x14  PointerToRawData
//! +0x18  relocations, line numbers, characteristics (16 bytes)
//! ```

use crate::{file::Cursor, pe::PeHeaders, Error, Result};

/// Size of one section table entry.
pub const SECTION_HEADER_SIZE: usize = 40;
/// Name of the section holding the resource directory.
pub const RESOURCE_SECTION_NAME: &str = ".rsrc";

/// The fields of a section header needed for address translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Section name with trailing NULs and whitespace removed
    pub name: String,
    /// RVA at which the section is mapped
    pub virtual_address: u32,
    /// File offset of the section's raw data
    pub raw_data_pointer: u32,
}

impl SectionHeader {
    /// Read one 40-byte section header at the cursor position.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the header runs past the data.
    pub fn read<C: Cursor>(cursor: &mut C) -> Result<SectionHeader> {
        let raw_name = cursor.read_le::<u64>()?.to_le_bytes();
        let name = String::from_utf8_lossy(&raw_name)
            .trim_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string();

        cursor.advance_by(4)?;
        let virtual_address = cursor.read_le::<u32>()?;
        cursor.advance_by(4)?;
        let raw_data_pointer = cursor.read_le::<u32>()?;
        cursor.advance_by(16)?;

        Ok(SectionHeader {
            name,
            virtual_address,
            raw_data_pointer,
        })
    }

    /// Scan the section table for `.rsrc`.
    ///
    /// The cursor is moved to the section table first and is left just past the matching header.
    ///
    /// # Errors
    /// - [`crate::Error::ResourceNotFound`] if no section is named `.rsrc`
    /// - [`crate::Error::Truncated`] if a section header runs past the data
    pub fn find_resource_section<C: Cursor>(
        cursor: &mut C,
        headers: &PeHeaders,
    ) -> Result<SectionHeader> {
        cursor.seek(headers.section_table_offset)?;

        for _ in 0..headers.number_of_sections {
            let section = SectionHeader::read(cursor)?;
            if section.name == RESOURCE_SECTION_NAME {
                log::debug!(
                    "Resource section at RVA 0x{:x}, file offset 0x{:x}",
                    section.virtual_address,
                    section.raw_data_pointer
                );
                return Ok(section);
            }
        }

        Err(Error::ResourceNotFound)
    }

    /// Convert an RVA that lies inside this section to a file offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedHeader`] if `rva` lies below the section start or the
    /// resulting offset overflows.
    pub fn rva_to_offset(&self, rva: u32) -> Result<usize> {
        let Some(delta) = rva.checked_sub(self.virtual_address) else {
            return Err(malformed_error!(
                "RVA 0x{:x} lies before section {} at 0x{:x}",
                rva,
                self.name,
                self.virtual_address
            ));
        };

        (self.raw_data_pointer as usize)
            .checked_add(delta as usize)
            .ok_or_else(|| malformed_error!("File offset for RVA 0x{:x} overflows", rva))
    }
}
