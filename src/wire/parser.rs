//! Low-level byte stream parser for protobuf-encoded metadata.
//!
//! This module provides the [`crate::wire::Parser`] type, a cursor-based binary data parser
//! for the wire format used by the compact member metadata. It offers bounds-checked
//! access to binary data with support for base-128 varints, little-endian fixed-width
//! values and length-delimited payloads.
//!
//! # Architecture
//!
//! The parser is built around a simple cursor-based model that maintains a position within
//! a byte slice:
//!
//! - **Position tracking** - Maintains current offset for sequential parsing operations
//! - **Bounds checking** - All operations validate data availability before reading
//! - **Zero-copy slices** - Length-delimited payloads are returned as borrowed sub-slices
//!
//! # Usage Examples
//!
//! ```rust
//! use kmsig::Parser;
//!
//! // 300 encoded as a varint, followed by a 2-byte length-delimited payload
//! let data = [0xAC, 0x02, 0x02, 0x68, 0x69];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_varint()?, 300);
//! assert_eq!(parser.read_length_delimited()?, b"hi");
//! assert!(!parser.has_more_data());
//! # Ok::<(), kmsig::Error>(())
//! ```

use crate::Result;

/// Maximum number of bytes a base-128 varint may occupy (64 bits / 7 bits per byte).
const MAX_VARINT_BYTES: usize = 10;

/// A generic binary data parser for reading protobuf wire data.
///
/// `Parser` maintains an internal position cursor and provides bounds checking
/// to prevent buffer overruns when reading malformed or truncated data.
///
/// # Examples
///
/// ```rust
/// use kmsig::Parser;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(parser.read_fixed32()?, 0x04030201);
/// assert_eq!(parser.remaining(), 1);
/// # Ok::<(), kmsig::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::wire::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
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

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes remaining from the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get access to the data which has not been consumed yet.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Arguments
    /// * `step` - Amount of bytes to advance
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        self.ensure_remaining(step)?;
        self.position += step;
        Ok(())
    }

    /// Peek at the next byte without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.position)
            .copied()
            .ok_or(out_of_bounds_error!())
    }

    /// Read a single byte and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is at or beyond the data length.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    /// Read a base-128 varint as used by the protobuf wire format.
    ///
    /// Each byte contributes its low 7 bits, least significant group first; the most
    /// significant bit of a byte is the continuation flag.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the data ends inside the varint or
    /// [`crate::Error::Malformed`] if the varint is longer than 10 bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kmsig::Parser;
    ///
    /// let mut parser = Parser::new(&[0x96, 0x01]);
    /// assert_eq!(parser.read_varint()?, 150);
    /// # Ok::<(), kmsig::Error>(())
    /// ```
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut value = 0u64;

        for index in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * index);

            if (byte & 0x80) == 0 {
                return Ok(value);
            }
        }

        Err(malformed_error!(
            "Varint exceeds {} bytes at offset {}",
            MAX_VARINT_BYTES,
            self.position
        ))
    }

    /// Read a varint and interpret it as a protobuf `int32`.
    ///
    /// Negative `int32` values are sign-extended to 64 bits on the wire, so only the
    /// low 32 bits carry the value.
    ///
    /// # Errors
    /// Same as [`Parser::read_varint`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_int32(&mut self) -> Result<i32> {
        Ok(self.read_varint()? as i32)
    }

    /// Read a varint and interpret it as a protobuf `bool`.
    ///
    /// # Errors
    /// Same as [`Parser::read_varint`].
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_varint()? != 0)
    }

    /// Read a little-endian 32-bit value (protobuf `fixed32` wire type).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_fixed32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        let Ok(read) = bytes.try_into() else {
            return Err(out_of_bounds_error!());
        };
        Ok(u32::from_le_bytes(read))
    }

    /// Read a little-endian 64-bit value (protobuf `fixed64` wire type).
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 8 bytes remain.
    pub fn read_fixed64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        let Ok(read) = bytes.try_into() else {
            return Err(out_of_bounds_error!());
        };
        Ok(u64::from_le_bytes(read))
    }

    /// Read `length` bytes as a borrowed slice and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        self.ensure_remaining(length)?;

        let bytes = &self.data[self.position..self.position + length];
        self.position += length;
        Ok(bytes)
    }

    /// Read a varint length prefix followed by that many bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the payload is truncated or
    /// [`crate::Error::Malformed`] if the length prefix is invalid.
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let length = self.read_varint()?;
        let Ok(length) = usize::try_from(length) else {
            return Err(malformed_error!("Length prefix too large - {}", length));
        };

        self.read_bytes(length)
    }

    /// Read a length-delimited UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for invalid UTF-8 encoding.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.position;
        let bytes = self.read_length_delimited()?;

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            malformed_error!(
                "Invalid UTF-8 string at offset {}-{}: {}",
                start,
                self.position,
                e.utf8_error()
            )
        })
    }

    /// Ensures that at least `needed` bytes are available from the current position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `needed` bytes remain.
    pub fn ensure_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(out_of_bounds_error!());
        }
        Ok(())
    }
}
