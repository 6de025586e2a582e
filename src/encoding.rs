//! String pool bridge: compact string-array encoding of metadata bytes.
//!
//! Compiled artifacts cannot store arbitrary binary data in their annotation attributes,
//! so the metadata bytes are stored as an array of strings. Two encodings exist:
//!
//! - **8-to-7 packing** (default): the byte stream is regrouped into 7-bit units, each
//!   unit is incremented by one modulo `0x80` (so the common zero byte does not need a
//!   two-byte modified UTF-8 form), and every unit becomes one character. The first
//!   string may start with the marker `U+FFFF`, which is dropped.
//! - **UTF-8 mode**: the first string starts with the marker `U+0000`; after dropping it,
//!   every character of the concatenated strings is one byte (`0x00..=0xFF`).
//!
//! # Examples
//!
//! ```rust
//! use kmsig::encoding::decode_bytes;
//!
//! // UTF-8 mode: marker followed by the raw bytes as characters
//! let data = ["\u{0}\u{1}\u{2}", "\u{ff}"];
//! assert_eq!(decode_bytes(&data)?, vec![0x01, 0x02, 0xFF]);
//! # Ok::<(), kmsig::Error>(())
//! ```

use crate::Result;

/// Marker opening the first string of a UTF-8 mode encoding.
pub const UTF8_MODE_MARKER: char = '\u{0}';

/// Marker optionally opening the first string of an 8-to-7 encoding.
pub const PACKED_MODE_MARKER: char = '\u{ffff}';

/// Decode an encoded string array back into the metadata byte stream.
///
/// ## Arguments
/// * 'data' - The encoded strings, in order
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a character is outside the range allowed by the
/// detected encoding.
pub fn decode_bytes<S: AsRef<str>>(data: &[S]) -> Result<Vec<u8>> {
    let (chars, utf8_mode) = split_marker(data);

    if utf8_mode {
        return chars
            .map(|c| {
                u8::try_from(u32::from(c))
                    .map_err(|_| malformed_error!("Invalid UTF-8 mode character - {:?}", c))
            })
            .collect();
    }

    let mut units = Vec::new();
    for c in chars {
        let Ok(unit) = u8::try_from(u32::from(c)) else {
            return Err(malformed_error!("Invalid packed character - {:?}", c));
        };
        if unit > 0x7F {
            return Err(malformed_error!("Invalid packed character - {:?}", c));
        }
        // Undo the +1 applied by the encoder
        units.push(unit.wrapping_add(0x7F) & 0x7F);
    }

    Ok(decode_7to8(&units))
}

/// Detect the encoding marker and return the payload characters of all strings.
fn split_marker<S: AsRef<str>>(data: &[S]) -> (impl Iterator<Item = char> + '_, bool) {
    let first = data.first().and_then(|s| s.as_ref().chars().next());
    let (skip_first, utf8_mode) = match first {
        Some(UTF8_MODE_MARKER) => (true, true),
        Some(PACKED_MODE_MARKER) => (true, false),
        _ => (false, false),
    };

    let chars = data
        .iter()
        .flat_map(|s| s.as_ref().chars())
        .skip(usize::from(skip_first));

    (chars, utf8_mode)
}

/// Reassemble 8-bit bytes from a little-endian stream of 7-bit units.
///
/// Trailing bits which do not fill a whole byte are padding and are dropped.
fn decode_7to8(units: &[u8]) -> Vec<u8> {
    let length = 7 * units.len() / 8;
    let mut result = Vec::with_capacity(length);

    let mut index = 0;
    let mut bit = 0;
    for _ in 0..length {
        let first_part = units[index] >> bit;
        index += 1;
        let second_part = (units[index] & ((1u8 << (bit + 1)) - 1)) << (7 - bit);
        result.push(first_part | second_part);

        if bit == 6 {
            index += 1;
            bit = 0;
        } else {
            bit += 1;
        }
    }

    result
}
