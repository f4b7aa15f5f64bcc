//! Variable-byte integer encoding for list length prefixes.
//!
//! Each byte carries 7 value bits; the high bit marks that more bytes
//! follow. Encodings are minimal length and at least one byte, so the
//! decoder is self-delimiting within a larger byte stream.

use crate::error::{Result, XystonError};

/// Encode a u32 value using variable-byte encoding.
pub fn encode_u32(value: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    encode_u32_into(value, &mut bytes);
    bytes
}

/// Append the variable-byte encoding of `value` to `out`, returning the
/// number of bytes written.
pub fn encode_u32_into(value: u32, out: &mut Vec<u8>) -> usize {
    let mut val = value;
    let mut written = 0;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        out.push(byte);
        written += 1;

        if val == 0 {
            break;
        }
    }

    written
}

/// Decode a u32 value from variable-byte encoding.
///
/// Returns the value and the number of bytes consumed. Fails with
/// `MalformedInput` if the input ends before a terminating byte or the
/// value does not fit in 32 bits.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let mut result = 0u32;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        let group = (byte & 0x7F) as u32;

        // The fifth byte may only contribute the remaining 4 value bits.
        if shift == 28 && group > 0x0F {
            return Err(XystonError::malformed_input("vbyte value overflows 32 bits"));
        }

        result |= group << shift;

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
        if shift > 28 {
            return Err(XystonError::malformed_input("vbyte value overflows 32 bits"));
        }
    }

    Err(XystonError::malformed_input(
        "vbyte input ends before terminating byte",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_u32() {
        let test_values = [0, 1, 127, 128, 255, 256, 16383, 16384, u32::MAX];

        for &value in &test_values {
            let encoded = encode_u32(value);
            let (decoded, bytes_read) = decode_u32(&encoded).unwrap();

            assert_eq!(value, decoded);
            assert_eq!(encoded.len(), bytes_read);
        }
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buffer = vec![0xAA];
        let written = encode_u32_into(300, &mut buffer);

        assert_eq!(written, 2);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer[0], 0xAA);

        let (decoded, consumed) = decode_u32(&buffer[1..]).unwrap();
        assert_eq!(decoded, 300);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut encoded = encode_u32(16384);
        let prefix_len = encoded.len();
        encoded.extend_from_slice(&[0xFF, 0xFF, 0xFF]);

        let (decoded, consumed) = decode_u32(&encoded).unwrap();
        assert_eq!(decoded, 16384);
        assert_eq!(consumed, prefix_len);
    }

    #[test]
    fn test_encoding_efficiency() {
        // Small values should use fewer bytes
        assert_eq!(encode_u32(0).len(), 1);
        assert_eq!(encode_u32(127).len(), 1);
        assert_eq!(encode_u32(128).len(), 2);
        assert_eq!(encode_u32(16383).len(), 2);
        assert_eq!(encode_u32(16384).len(), 3);

        // Large values should use more bytes
        assert_eq!(encode_u32(u32::MAX).len(), 5);
    }

    #[test]
    fn test_incomplete_varint() {
        // Continuation bit set but no more data
        let incomplete = vec![0x80];
        assert!(decode_u32(&incomplete).is_err());
        assert!(decode_u32(&[]).is_err());
    }

    #[test]
    fn test_overflow() {
        // Too many continuation bytes for a u32
        let overflow_data = vec![0xFF; 10];
        assert!(decode_u32(&overflow_data).is_err());

        // Five bytes whose top group spills past 32 bits
        let spill = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x10];
        assert!(decode_u32(&spill).is_err());
    }
}
