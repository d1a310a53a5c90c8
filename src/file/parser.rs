//! Cursor-based byte parser used by the entry point codec and the table stream walker.
//!
//! [`crate::file::parser::Parser`] keeps a position inside a borrowed byte slice and offers
//! bounds-checked reads of little-endian integers, raw byte runs and NUL-terminated strings.
//! Nothing is copied until a caller asks for an owned value.
//!
//! # Examples
//!
//! ```rust
//! use dmiscope::Parser;
//!
//! let data = [0x01, 0x1F, 0x02, 0x00, b'A', 0x00];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_le::<u8>()?, 0x01);
//! assert_eq!(parser.read_le::<u8>()?, 0x1F);
//! assert_eq!(parser.read_le::<u16>()?, 0x0002);
//! assert_eq!(parser.read_cstring()?, "A");
//! assert!(!parser.has_more_data());
//! # Ok::<(), dmiscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, SmbiosIO},
    Result,
};

/// A cursor over a borrowed byte buffer.
///
/// All reads validate the remaining length first and return
/// [`crate::Error::OutOfBounds`] instead of panicking.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes between the cursor and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly the end of the buffer is allowed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by one byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing would exceed the data length.
    pub fn advance(&mut self) -> Result<()> {
        self.advance_by(1)
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(out_of_bounds_error!());
        }

        self.position += step;
        Ok(())
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at the current byte without advancing.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(out_of_bounds_error!()),
        }
    }

    /// Read a little-endian value of type `T` and advance past it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough bytes remain.
    pub fn read_le<T: SmbiosIO>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }

    /// Borrow the next `len` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(out_of_bounds_error!());
        }

        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Read a NUL-terminated string and advance past its terminator.
    ///
    /// An empty result means the cursor was positioned on a NUL byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no terminator exists before the end of the
    /// buffer or the bytes are not valid UTF-8.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = &self.data[self.position.min(self.data.len())..];
        let Some(end) = rest.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!(
                "unterminated string at offset {}",
                self.position
            ));
        };

        let value = std::str::from_utf8(&rest[..end])
            .map_err(|err| malformed_error!("invalid string at offset {}: {}", self.position, err))?
            .to_string();
        self.position += end + 1;
        Ok(value)
    }

    /// Find the next occurrence of `pattern` at or after the cursor, returning its absolute
    /// offset without moving.
    #[must_use]
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        if pattern.is_empty() || self.remaining() < pattern.len() {
            return None;
        }

        self.data[self.position..]
            .windows(pattern.len())
            .position(|window| window == pattern)
            .map(|found| found + self.position)
    }
}
