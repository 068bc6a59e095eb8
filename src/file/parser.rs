//! Random-access cursor over an in-memory buffer.
//!
//! This module provides the [`crate::file::parser::Parser`] type, the buffer back-end of the
//! [`crate::file::Cursor`] contract. It maintains a position within a byte slice and offers
//! bounds-checked little-endian reads, forward skips and unrestricted seeks.
//!
//! # Usage Examples
//!
//! ```rust
//! use peversion::{Cursor, Parser};
//!
//! let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
//! let mut parser = Parser::new(&data);
//!
//! let first = parser.read_le::<u32>()?;
//! assert_eq!(first, 0x04030201);
//!
//! parser.seek(6)?;
//! let last_bytes = parser.read_le::<u16>()?;
//! assert_eq!(last_bytes, 0x0807);
//! # Ok::<(), peversion::Error>(())
//! ```

use crate::{
    file::{
        io::{read_le_at, PeIO},
        Cursor,
    },
    Error::Truncated,
    Result,
};

/// A bounds-checked cursor over a byte slice.
///
/// Seeks may move in either direction. Calling [`Cursor::rebase`] narrows the visible slice to
/// start at the current position, so subsequent offsets are relative to it.
///
/// # Examples
///
/// ```rust
/// use peversion::{Cursor, Parser};
///
/// let data = [0xAA, 0xBB, 0x01, 0x00];
/// let mut parser = Parser::new(&data);
///
/// parser.advance_by(2)?;
/// parser.rebase();
/// assert_eq!(parser.pos(), 0);
/// assert_eq!(parser.read_le::<u16>()?, 1);
/// # Ok::<(), peversion::Error>(())
/// ```
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the visible data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes between the current position and the end of the data.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get access to the visible data buffer.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data
    }
}

impl Cursor for Parser<'_> {
    fn pos(&self) -> usize {
        self.position
    }

    fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Truncated);
        }

        self.position = pos;
        Ok(())
    }

    fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(Truncated);
        }

        self.position += step;
        Ok(())
    }

    fn read_le<T: PeIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    fn rebase(&mut self) {
        let start = self.position.min(self.data.len());
        self.data = &self.data[start..];
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_and_read() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        parser.seek(2).unwrap();
        assert_eq!(parser.pos(), 2);
        assert_eq!(parser.read_le::<u8>().unwrap(), 0x03);

        // Backwards seeks are allowed on buffers
        parser.seek(0).unwrap();
        assert_eq!(parser.read_le::<u16>().unwrap(), 0x0201);

        // Seeking to the very end is fine, reading there is not
        parser.seek(4).unwrap();
        assert!(matches!(parser.read_le::<u8>(), Err(Truncated)));
        assert!(matches!(parser.seek(5), Err(Truncated)));
    }

    #[test]
    fn advance_by_bounds() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut parser = Parser::new(&data);

        parser.advance_by(3).unwrap();
        assert_eq!(parser.pos(), 3);
        assert_eq!(parser.remaining(), 2);

        assert!(matches!(parser.advance_by(3), Err(Truncated)));
        assert_eq!(parser.pos(), 3);
        assert!(matches!(parser.advance_by(usize::MAX), Err(Truncated)));

        parser.advance_by(2).unwrap();
        assert_eq!(parser.remaining(), 0);
    }

    #[test]
    fn align() {
        let data = [0u8; 8];
        let mut parser = Parser::new(&data);

        parser.align(4).unwrap();
        assert_eq!(parser.pos(), 0);

        parser.advance_by(1).unwrap();
        parser.align(4).unwrap();
        assert_eq!(parser.pos(), 4);

        parser.advance_by(3).unwrap();
        parser.align(4).unwrap();
        assert_eq!(parser.pos(), 8);

        let short = [0u8; 6];
        let mut parser = Parser::new(&short);
        parser.advance_by(5).unwrap();
        assert!(matches!(parser.align(4), Err(Truncated)));
    }

    #[test]
    fn rebase() {
        let data = [0xAA, 0xBB, 0xCC, 0x01, 0x00];
        let mut parser = Parser::new(&data);

        parser.advance_by(3).unwrap();
        parser.rebase();

        assert_eq!(parser.pos(), 0);
        assert_eq!(parser.len(), 2);
        assert_eq!(parser.data(), &[0x01, 0x00]);
        assert_eq!(parser.read_le::<u16>().unwrap(), 1);
        assert!(!parser.is_empty());
    }

    #[test]
    fn empty() {
        let mut parser = Parser::new(&[]);
        assert!(parser.is_empty());
        assert!(matches!(parser.read_le::<u16>(), Err(Truncated)));
        parser.rebase();
        assert_eq!(parser.pos(), 0);
    }
}
