//! Forward-only cursor over a [`std::io::Read`] stream.
//!
//! [`crate::file::stream::StreamParser`] is the stream back-end of the [`crate::file::Cursor`]
//! contract. It never buffers more than the primitive currently being decoded and keeps a running
//! offset of how many bytes it has consumed. Seeks can only move forward; they are realised by
//! discarding bytes. [`crate::file::Cursor::rebase`] resets the running offset to zero, which is
//! how the VERSIONINFO walk addresses blocks relative to the start of the resource data.
//!
//! # Usage Examples
//!
//! ```rust
//! use peversion::{file::stream::StreamParser, Cursor};
//!
//! let data: &[u8] = &[0x4D, 0x5A, 0x00, 0x00, 0x10, 0x00];
//! let mut stream = StreamParser::new(data);
//!
//! assert_eq!(stream.read_le::<u16>()?, 0x5A4D);
//! stream.seek(4)?;
//! assert_eq!(stream.read_le::<u16>()?, 0x10);
//! assert!(stream.seek(0).is_err());
//! # Ok::<(), peversion::Error>(())
//! ```

use std::io::{self, Read};

use crate::{
    file::{io::PeIO, Cursor},
    Error, Result,
};

/// A forward-only cursor over any reader.
///
/// Reads go straight to the underlying reader, so wrap unbuffered sources such as
/// [`std::fs::File`] in a [`std::io::BufReader`] first.
pub struct StreamParser<R> {
    /// Source of the bytes
    reader: R,
    /// Bytes consumed since the origin
    position: usize,
}

impl<R: Read> StreamParser<R> {
    /// Create a new [`crate::file::stream::StreamParser`] positioned at offset 0.
    ///
    /// # Arguments
    /// * `reader` - The stream to consume
    pub fn new(reader: R) -> Self {
        StreamParser {
            reader,
            position: 0,
        }
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Cursor for StreamParser<R> {
    fn pos(&self) -> usize {
        self.position
    }

    fn seek(&mut self, pos: usize) -> Result<()> {
        if pos < self.position {
            return Err(malformed_error!(
                "Cannot seek backwards on a stream - from {} to {}",
                self.position,
                pos
            ));
        }

        self.advance_by(pos - self.position)
    }

    fn advance_by(&mut self, step: usize) -> Result<()> {
        let wanted = step as u64;
        let skipped = io::copy(&mut (&mut self.reader).take(wanted), &mut io::sink())
            .map_err(Error::from_stream)?;

        // A short copy means the stream ended; count what was consumed anyway
        self.position += skipped as usize;
        if skipped < wanted {
            return Err(Error::Truncated);
        }

        Ok(())
    }

    fn read_le<T: PeIO>(&mut self) -> Result<T> {
        let type_len = std::mem::size_of::<T>();
        let mut buffer = [0_u8; 8];
        let bytes = &mut buffer[..type_len];

        self.reader.read_exact(bytes).map_err(Error::from_stream)?;
        self.position += type_len;

        let Ok(read) = (&*bytes).try_into() else {
            return Err(Error::Truncated);
        };

        Ok(T::from_le_bytes(read))
    }

    fn rebase(&mut self) {
        self.position = 0;
    }
}
