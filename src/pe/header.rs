//! DOS, COFF and optional header navigation.
//!
//! [`PeHeaders::read`] validates the signatures of a PE32 image and extracts the handful of
//! fields needed to reach the resource directory: where the section table starts, how many
//! sections it holds, and the RVA of the resource data directory.
//!
//! # Layout
//!
//! ```text
//! 0x00        DOS header, "MZ"
//! 0x3C        e_lfanew -> PE header offset
//! pe          "PE\0\0"
//! pe + 0x04   COFF header (machine, NumberOfSections, ..., SizeOfOptionalHeader, characteristics)
//! pe + 0x18   optional header (magic 0x10B, ..., data directories at +96)
//! opt + size  section table
//! ```

use crate::{file::Cursor, Result};

/// `MZ`
pub const DOS_MAGIC: u16 = 0x5A4D;
/// Offset of `e_lfanew` inside the DOS header.
pub const DOS_PE_OFFSET_FIELD: usize = 0x3C;
/// `PE` (the trailing `\0\0` is skipped along with the machine field).
pub const PE_MAGIC: u16 = 0x4550;
/// Optional header magic of a PE32 image.
pub const PE32_MAGIC: u16 = 0x10B;
/// Data directory index of the resource table.
pub const RESOURCE_DIRECTORY_INDEX: usize = 2;
/// Offset of the first data directory inside a PE32 optional header.
pub const DATA_DIRECTORY_OFFSET: usize = 96;
/// Size of one data directory entry (RVA + size).
pub const DATA_DIRECTORY_SIZE: usize = 8;

/// Offset of the resource directory RVA inside the optional header.
const RESOURCE_RVA_OFFSET: usize =
    DATA_DIRECTORY_OFFSET + RESOURCE_DIRECTORY_INDEX * DATA_DIRECTORY_SIZE;

/// Header fields needed to locate the resource section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeHeaders {
    /// File offset of the `PE\0\0` signature
    pub pe_offset: usize,
    /// `NumberOfSections` from the COFF header, never zero
    pub number_of_sections: u16,
    /// `SizeOfOptionalHeader` from the COFF header, never zero
    pub optional_header_size: u16,
    /// File offset of the optional header
    pub optional_header_offset: usize,
    /// File offset of the first section header
    pub section_table_offset: usize,
    /// RVA of the resource directory, `0` if the image has none
    pub resource_rva: u32,
}

impl PeHeaders {
    /// Validate the headers of a PE32 image and extract the resource directory location.
    ///
    /// The cursor must be positioned at file offset 0 and is left at the start of the section
    /// table on success.
    ///
    /// # Errors
    /// - [`crate::Error::MalformedHeader`] for a bad `MZ`/`PE`/PE32 magic, zero section count,
    ///   an optional header too small to hold the resource directory entry, or offsets that
    ///   overflow
    /// - [`crate::Error::Truncated`] if the data ends inside the headers
    pub fn read<C: Cursor>(cursor: &mut C) -> Result<PeHeaders> {
        // Byte by byte, so a one-byte input that cannot start with `MZ` is malformed
        for expected in DOS_MAGIC.to_le_bytes() {
            let byte = cursor.read_le::<u8>()?;
            if byte != expected {
                return Err(malformed_error!(
                    "Invalid DOS signature - byte 0x{:02X}, expected 0x{:02X}",
                    byte,
                    expected
                ));
            }
        }

        cursor.seek(DOS_PE_OFFSET_FIELD)?;
        let pe_offset = cursor.read_le::<u32>()? as usize;
        cursor.seek(pe_offset)?;

        let pe_magic = cursor.read_le::<u16>()?;
        if pe_magic != PE_MAGIC {
            return Err(malformed_error!("Invalid PE signature - 0x{:04X}", pe_magic));
        }

        // "\0\0" and Machine
        cursor.advance_by(4)?;
        let number_of_sections = cursor.read_le::<u16>()?;

        // TimeDateStamp, PointerToSymbolTable, NumberOfSymbols
        cursor.advance_by(12)?;
        let optional_header_size = cursor.read_le::<u16>()?;

        if number_of_sections == 0 || optional_header_size == 0 {
            return Err(malformed_error!(
                "Empty section table or optional header - {} sections, {} bytes",
                number_of_sections,
                optional_header_size
            ));
        }

        // Characteristics
        cursor.advance_by(2)?;
        let optional_header_offset = cursor.pos();

        let magic = cursor.read_le::<u16>()?;
        if magic != PE32_MAGIC {
            return Err(malformed_error!(
                "Unsupported optional header magic - 0x{:04X}",
                magic
            ));
        }

        if usize::from(optional_header_size) < RESOURCE_RVA_OFFSET + DATA_DIRECTORY_SIZE {
            return Err(malformed_error!(
                "Optional header too small for the resource directory - {} bytes",
                optional_header_size
            ));
        }

        cursor.advance_by(RESOURCE_RVA_OFFSET - 2)?;
        let resource_rva = cursor.read_le::<u32>()?;

        let Some(section_table_offset) =
            optional_header_offset.checked_add(usize::from(optional_header_size))
        else {
            return Err(malformed_error!("Section table offset overflows"));
        };
        cursor.seek(section_table_offset)?;

        log::debug!(
            "PE header at 0x{:x}: {} sections, optional header {} bytes, resource RVA 0x{:x}",
            pe_offset,
            number_of_sections,
            optional_header_size,
            resource_rva
        );

        Ok(PeHeaders {
            pe_offset,
            number_of_sections,
            optional_header_size,
            optional_header_offset,
            section_table_offset,
            resource_rva,
        })
    }
}
