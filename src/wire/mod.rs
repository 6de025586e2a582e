//! Protobuf wire-format primitives.
//!
//! Metadata messages are stored in the protobuf binary encoding: every field is
//! prefixed by a *key* varint combining the field number and a [`WireType`], followed
//! by a payload whose shape depends on the wire type. This module provides the
//! cursor [`Parser`] plus the key/skip helpers the message decoder is built on.
//!
//! # Key layout
//!
//! ```text
//! key = (field_number << 3) | wire_type
//! ```
//!
//! # Examples
//!
//! ```rust
//! use kmsig::wire::{FieldKey, Parser, WireType};
//!
//! // field 2, varint, value 150
//! let data = [0x10, 0x96, 0x01];
//! let mut parser = Parser::new(&data);
//!
//! let key = FieldKey::read(&mut parser)?;
//! assert_eq!(key.number, 2);
//! assert_eq!(key.wire_type, WireType::Varint);
//! assert_eq!(parser.read_varint()?, 150);
//! # Ok::<(), kmsig::Error>(())
//! ```

mod parser;

pub use parser::Parser;

use strum::{Display, EnumCount, EnumIter, FromRepr};

use crate::{Error::RecursionLimit, Result};

/// Largest field number the wire format can carry (2^29 - 1).
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// The payload encodings a protobuf field can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, FromRepr, Display)]
#[repr(u8)]
pub enum WireType {
    /// int32, int64, uint32, uint64, sint32, sint64, bool, enum
    Varint = 0,
    /// fixed64, sfixed64, double
    Fixed64 = 1,
    /// string, bytes, embedded messages, packed repeated fields
    LengthDelimited = 2,
    /// Deprecated group start marker
    StartGroup = 3,
    /// Deprecated group end marker
    EndGroup = 4,
    /// fixed32, sfixed32, float
    Fixed32 = 5,
}

/// A decoded field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    /// The field number as declared in the message definition
    pub number: u32,
    /// How the payload following the key is encoded
    pub wire_type: WireType,
}

impl FieldKey {
    /// Read a field key from the current parser position.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for field number 0, field numbers beyond
    /// [`MAX_FIELD_NUMBER`] or unknown wire types, and [`crate::Error::OutOfBounds`] if the
    /// key is truncated.
    pub fn read(parser: &mut Parser) -> Result<Self> {
        let raw = parser.read_varint()?;

        let Some(wire_type) = WireType::from_repr((raw & 0x7) as u8) else {
            return Err(malformed_error!("Invalid wire type - {}", raw & 0x7));
        };

        let Ok(number) = u32::try_from(raw >> 3) else {
            return Err(malformed_error!("Invalid field number - {}", raw >> 3));
        };
        if number == 0 || number > MAX_FIELD_NUMBER {
            return Err(malformed_error!("Invalid field number - {}", number));
        }

        Ok(FieldKey { number, wire_type })
    }
}

/// Skip over the payload of a field whose key has already been read.
///
/// Groups are skipped up to their matching end marker. Nested groups are tracked
/// on an explicit stack; every open group counts as one nesting level on top of
/// `depth`.
///
/// # Arguments
/// * `parser` - The parser positioned right after the field key
/// * `key` - The key of the field to skip
/// * `depth` - The nesting level of the message containing the field
/// * `limit` - The maximum nesting level
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the payload is truncated,
/// [`crate::Error::Malformed`] for a stray or mismatched group end marker, and
/// [`crate::Error::RecursionLimit`] if groups nest to `limit` or deeper.
pub fn skip_field(parser: &mut Parser, key: FieldKey, depth: usize, limit: usize) -> Result<()> {
    let mut groups: Vec<u32> = Vec::new();
    let mut key = key;

    loop {
        match key.wire_type {
            WireType::Varint => {
                parser.read_varint()?;
            }
            WireType::Fixed64 => parser.advance_by(8)?,
            WireType::LengthDelimited => {
                parser.read_length_delimited()?;
            }
            WireType::Fixed32 => parser.advance_by(4)?,
            WireType::StartGroup => {
                if depth + groups.len() + 1 >= limit {
                    return Err(RecursionLimit(limit));
                }
                groups.push(key.number);
            }
            WireType::EndGroup => match groups.pop() {
                Some(number) if number == key.number => {}
                Some(number) => {
                    return Err(malformed_error!(
                        "Mismatched group end - expected {}, found {}",
                        number,
                        key.number
                    ));
                }
                None => {
                    return Err(malformed_error!("Unexpected group end - {}", key.number));
                }
            },
        }

        if groups.is_empty() {
            return Ok(());
        }
        key = FieldKey::read(parser)?;
    }
}

/// Read a repeated `int32` field occurrence into `values`.
///
/// Repeated scalars may arrive either packed (one length-delimited run of varints)
/// or unpacked (one varint per key); both forms are accepted for every repeated field.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the payload is truncated, or
/// [`crate::Error::Malformed`] if the wire type is neither varint nor length-delimited.
pub fn read_repeated_int32(
    parser: &mut Parser,
    key: FieldKey,
    values: &mut Vec<i32>,
) -> Result<()> {
    match key.wire_type {
        WireType::Varint => values.push(parser.read_int32()?),
        WireType::LengthDelimited => {
            let mut packed = Parser::new(parser.read_length_delimited()?);
            while packed.has_more_data() {
                values.push(packed.read_int32()?);
            }
        }
        other => {
            return Err(malformed_error!(
                "Field {} can not hold repeated int32 values as {}",
                key.number,
                other
            ))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use strum::IntoEnumIterator;

    const LIMIT: usize = 100;

    #[test]
    fn wire_type_roundtrip() {
        for wire_type in WireType::iter() {
            assert_eq!(WireType::from_repr(wire_type as u8), Some(wire_type));
        }
        assert_eq!(WireType::COUNT, 6);
        assert_eq!(WireType::from_repr(6), None);
    }

    #[test]
    fn key_read() {
        // field 30, length delimited => (30 << 3) | 2 = 242 => [0xF2, 0x01]
        let mut parser = Parser::new(&[0xF2, 0x01]);
        let key = FieldKey::read(&mut parser).unwrap();
        assert_eq!(key.number, 30);
        assert_eq!(key.wire_type, WireType::LengthDelimited);
    }

    #[test]
    fn key_invalid() {
        // field number 0
        let mut parser = Parser::new(&[0x00]);
        assert!(matches!(
            FieldKey::read(&mut parser),
            Err(Error::Malformed { .. })
        ));

        // wire type 7
        let mut parser = Parser::new(&[0x0F]);
        assert!(matches!(
            FieldKey::read(&mut parser),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn skip_all_wire_types() {
        #[rustfmt::skip]
        let data = [
            0x08, 0x96, 0x01,                                   // 1: varint
            0x11, 1, 2, 3, 4, 5, 6, 7, 8,                       // 2: fixed64
            0x1A, 0x02, 0xAA, 0xBB,                             // 3: length delimited
            0x23, 0x08, 0x01, 0x24,                             // 4: group { 1: varint }
            0x2D, 1, 2, 3, 4,                                   // 5: fixed32
            0x30, 0x07,                                         // 6: varint (kept)
        ];

        let mut parser = Parser::new(&data);
        for _ in 0..5 {
            let key = FieldKey::read(&mut parser).unwrap();
            skip_field(&mut parser, key, 0, LIMIT).unwrap();
        }

        let key = FieldKey::read(&mut parser).unwrap();
        assert_eq!(key.number, 6);
        assert_eq!(parser.read_varint().unwrap(), 7);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn skip_truncated() {
        let mut parser = Parser::new(&[0x1A, 0x05, 0x01]);
        let key = FieldKey::read(&mut parser).unwrap();
        assert!(matches!(
            skip_field(&mut parser, key, 0, LIMIT),
            Err(Error::OutOfBounds)
        ));

        let mut parser = Parser::new(&[0x0C]);
        let key = FieldKey::read(&mut parser).unwrap();
        assert!(matches!(
            skip_field(&mut parser, key, 0, LIMIT),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn skip_nested_groups() {
        // 1: group { 1: group { 2: varint } }, then 3: varint
        let data = [0x0B, 0x0B, 0x10, 0x01, 0x0C, 0x0C, 0x18, 0x05];
        let mut parser = Parser::new(&data);
        let key = FieldKey::read(&mut parser).unwrap();
        skip_field(&mut parser, key, 0, LIMIT).unwrap();

        let key = FieldKey::read(&mut parser).unwrap();
        assert_eq!(key.number, 3);

        // 1: group { 2: group end }
        let mut parser = Parser::new(&[0x0B, 0x14]);
        let key = FieldKey::read(&mut parser).unwrap();
        assert!(matches!(
            skip_field(&mut parser, key, 0, LIMIT),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn skip_deep_groups() {
        let data = vec![0x0B; 200_000];
        let mut parser = Parser::new(&data);
        let key = FieldKey::read(&mut parser).unwrap();
        assert!(matches!(
            skip_field(&mut parser, key, 0, LIMIT),
            Err(Error::RecursionLimit(LIMIT))
        ));

        // the enclosing message depth counts towards the limit
        let data = [0x0B, 0x0B, 0x0C, 0x0C];
        let mut parser = Parser::new(&data);
        let key = FieldKey::read(&mut parser).unwrap();
        assert!(matches!(
            skip_field(&mut parser, key, 2, 4),
            Err(Error::RecursionLimit(4))
        ));

        let mut parser = Parser::new(&data);
        let key = FieldKey::read(&mut parser).unwrap();
        skip_field(&mut parser, key, 1, 4).unwrap();
        assert!(!parser.has_more_data());
    }

    #[test]
    fn repeated_int32_packed_and_unpacked() {
        // field 5 packed [1, 2, 300], then field 5 unpacked 4
        let data = [0x2A, 0x04, 0x01, 0x02, 0xAC, 0x02, 0x28, 0x04];
        let mut parser = Parser::new(&data);
        let mut values = Vec::new();

        while parser.has_more_data() {
            let key = FieldKey::read(&mut parser).unwrap();
            read_repeated_int32(&mut parser, key, &mut values).unwrap();
        }

        assert_eq!(values, vec![1, 2, 300, 4]);
    }
}
