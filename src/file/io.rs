//! Little-endian primitive decoding shared by every cursor back-end.
//!
//! The PE format and the VERSIONINFO block format are little-endian throughout, so this module
//! only provides little-endian decoding. The [`crate::file::io::PeIO`] trait abstracts over the
//! primitive integer types the decoder reads, and the free functions perform bounds-checked reads
//! from byte slices.
//!
//! # Key Components
//!
//! - [`crate::file::io::PeIO`] - Trait mapping a primitive type to its byte array representation
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Error::Truncated`] if there are insufficient bytes in
//! the buffer to complete the operation.
//!
//! # Examples
//!
//! ```rust
//! use peversion::file::io::read_le_at;
//!
//! let data = [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let mut offset = 0;
//!
//! let magic: u16 = read_le_at(&data, &mut offset)?;
//! let rest: u16 = read_le_at(&data, &mut offset)?;
//! let pages: u32 = read_le_at(&data, &mut offset)?;
//!
//! assert_eq!(magic, 0x5A4D);
//! assert_eq!(rest, 0x0090);
//! assert_eq!(pages, 3);
//! assert_eq!(offset, 8);
//! # Ok::<(), peversion::Error>(())
//! ```

use crate::{Error::Truncated, Result};

/// Trait for implementing type-specific safe binary data reading operations.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size byte
/// array required for that type (e.g. `[u8; 4]` for `u32`). Cursor back-ends fill such an array,
/// either by slicing a buffer or by reading from a stream, and convert it with
/// [`PeIO::from_le_bytes`].
pub trait PeIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_pe_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl PeIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_pe_io! {
    u8 => 1,
    u16 => 2,
    u32 => 4,
    u64 => 8,
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Errors
///
/// Returns [`crate::Error::Truncated`] if there are insufficient bytes.
pub fn read_le<T: PeIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// The offset is advanced by the number of bytes read. On failure the offset is left untouched.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::Truncated`] if there are insufficient bytes.
pub fn read_le_at<T: PeIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(Truncated);
    };
    if end > data.len() {
        return Err(Truncated);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(Truncated);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}
