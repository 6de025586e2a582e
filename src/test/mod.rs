mod encoders;

pub use encoders::*;
pub use writer::Writer;

use crate::encoding::PACKED_MODE_MARKER;

/// Encode `bytes` the way the string pool stores them: 8-to-7 packing with +1 per unit
///
/// Units are grouped into strings of at most 65535 characters; the first string starts
/// with the packed mode marker.
pub fn encode_bytes(bytes: &[u8]) -> Vec<String> {
    let unit_count = (bytes.len() * 8).div_ceil(7);
    let mut units = Vec::with_capacity(unit_count);

    let mut index = 0;
    let mut bit = 0;
    for _ in 0..unit_count {
        let low = u32::from(bytes[index]) >> bit;
        let high = if bit > 1 && index + 1 < bytes.len() {
            u32::from(bytes[index + 1]) << (8 - bit)
        } else {
            0
        };
        units.push(((low | high) & 0x7F) as u8);

        bit += 7;
        if bit >= 8 {
            bit -= 8;
            index += 1;
        }
    }

    let chars: Vec<char> = std::iter::once(PACKED_MODE_MARKER)
        .chain(units.iter().map(|unit| char::from((unit + 1) & 0x7F)))
        .collect();

    chars
        .chunks(65535)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Split `bytes` into UTF-8 mode strings of `chunk` characters each
pub fn encode_bytes_utf8(bytes: &[u8], chunk: usize) -> Vec<String> {
    let chars: Vec<char> = std::iter::once(crate::encoding::UTF8_MODE_MARKER)
        .chain(bytes.iter().map(|byte| char::from(*byte)))
        .collect();

    chars
        .chunks(chunk.max(1))
        .map(|part| part.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_crafted() {
        // 0x01 0x02 0x03 => units 0x01, 0x04, 0x0C, 0x00
        let encoded = encode_bytes(&[0x01, 0x02, 0x03]);
        assert_eq!(encoded, vec!["\u{ffff}\u{2}\u{5}\u{d}\u{1}".to_string()]);
    }

    #[test]
    fn utf8_chunks_decode() {
        let bytes = [0x00, 0x7F, 0x80, 0xFF];
        let encoded = encode_bytes_utf8(&bytes, 2);
        assert_eq!(encoded.len(), 3);
        assert_eq!(crate::encoding::decode_bytes(&encoded).unwrap(), bytes);
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode_bytes(&[]), vec!["\u{ffff}".to_string()]);
    }
}
