//! Binary packing block codecs backed by the `bitpacking` crate.
//!
//! Every block is stored as a one-byte bit width followed by the packed
//! bytes (`bits * BLOCK_LEN / 8` of them). Partial trailing blocks are
//! zero-padded up to the packer's block length before packing; the
//! externally supplied count recovers the real values on decode.

use std::fmt;

use bitpacking::BitPacker;

use crate::codec::BlockCodec;
use crate::error::{Result, XystonError};

/// A block codec over one of the `bitpacking` packer implementations.
///
/// The three registered widths are `BitPacker1x` (scalar, 32 values per
/// block), `BitPacker4x` (SSE-width, 128) and `BitPacker8x` (AVX-width,
/// 256).
pub struct BinaryPacking<P: BitPacker> {
    packer: P,
    name: &'static str,
}

impl<P: BitPacker> BinaryPacking<P> {
    /// Create a packing codec registered under `name`.
    pub fn new(name: &'static str) -> Self {
        BinaryPacking {
            packer: P::new(),
            name,
        }
    }

    fn packed_len(num_bits: u8) -> usize {
        num_bits as usize * P::BLOCK_LEN / 8
    }
}

impl<P: BitPacker> fmt::Debug for BinaryPacking<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryPacking")
            .field("name", &self.name)
            .field("block_len", &P::BLOCK_LEN)
            .finish()
    }
}

impl<P: BitPacker + Send + Sync> BlockCodec for BinaryPacking<P> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn block_len(&self) -> usize {
        P::BLOCK_LEN
    }

    fn encode_block(&self, values: &[u32], out: &mut Vec<u8>) -> Result<usize> {
        if values.is_empty() || values.len() > P::BLOCK_LEN {
            return Err(XystonError::invalid_argument(format!(
                "block must hold 1..={} values, got {}",
                P::BLOCK_LEN,
                values.len()
            )));
        }

        let mut padded;
        let block: &[u32] = if values.len() == P::BLOCK_LEN {
            values
        } else {
            padded = vec![0u32; P::BLOCK_LEN];
            padded[..values.len()].copy_from_slice(values);
            &padded
        };

        let num_bits = self.packer.num_bits(block);
        out.push(num_bits);

        let start = out.len();
        out.resize(start + Self::packed_len(num_bits), 0);
        let written = self.packer.compress(block, &mut out[start..], num_bits);
        debug_assert_eq!(written, Self::packed_len(num_bits));

        Ok(1 + written)
    }

    fn decode_block(&self, bytes: &[u8], count: usize, out: &mut [u32]) -> Result<usize> {
        if count == 0 || count > P::BLOCK_LEN {
            return Err(XystonError::invalid_argument(format!(
                "block must hold 1..={} values, got {}",
                P::BLOCK_LEN,
                count
            )));
        }

        let Some((&num_bits, packed)) = bytes.split_first() else {
            return Err(XystonError::decode("missing bit width byte"));
        };
        if num_bits > 32 {
            return Err(XystonError::decode(format!(
                "bit width {num_bits} exceeds 32"
            )));
        }

        let packed_len = Self::packed_len(num_bits);
        if packed.len() < packed_len {
            return Err(XystonError::decode(format!(
                "packed block needs {packed_len} bytes, {} available",
                packed.len()
            )));
        }

        if count == P::BLOCK_LEN {
            let read = self
                .packer
                .decompress(&packed[..packed_len], &mut out[..P::BLOCK_LEN], num_bits);
            debug_assert_eq!(read, packed_len);
        } else {
            let mut block = vec![0u32; P::BLOCK_LEN];
            let read = self
                .packer
                .decompress(&packed[..packed_len], &mut block, num_bits);
            debug_assert_eq!(read, packed_len);
            out[..count].copy_from_slice(&block[..count]);
        }

        Ok(1 + packed_len)
    }
}

#[cfg(test)]
mod tests {
    use bitpacking::{BitPacker1x, BitPacker4x, BitPacker8x};

    use super::*;

    #[test]
    fn test_block_lens_match_packers() {
        assert_eq!(BinaryPacking::<BitPacker1x>::new("bp").block_len(), 32);
        assert_eq!(BinaryPacking::<BitPacker4x>::new("simdbp").block_len(), 128);
        assert_eq!(
            BinaryPacking::<BitPacker8x>::new("simdbp256").block_len(),
            256
        );
    }

    #[test]
    fn test_all_zero_block_is_one_byte() {
        let codec = BinaryPacking::<BitPacker4x>::new("simdbp");
        let zeros = vec![0u32; codec.block_len()];

        let mut encoded = Vec::new();
        let written = codec.encode_block(&zeros, &mut encoded).unwrap();

        // Zero bits per value: only the width byte remains.
        assert_eq!(written, 1);
        assert_eq!(encoded, vec![0]);

        let mut decoded = vec![1u32; codec.block_len()];
        let consumed = codec
            .decode_block(&encoded, codec.block_len(), &mut decoded)
            .unwrap();
        assert_eq!(consumed, 1);
        assert!(decoded.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_width_scales_with_values() {
        let codec = BinaryPacking::<BitPacker1x>::new("bp");

        let small: Vec<u32> = (0..32).map(|i| i % 4).collect();
        let large: Vec<u32> = (0..32).map(|i| i * 1_000_000).collect();

        let mut small_bytes = Vec::new();
        let mut large_bytes = Vec::new();
        codec.encode_block(&small, &mut small_bytes).unwrap();
        codec.encode_block(&large, &mut large_bytes).unwrap();

        assert!(small_bytes.len() < large_bytes.len());
    }

    #[test]
    fn test_oversized_block_rejected() {
        let codec = BinaryPacking::<BitPacker1x>::new("bp");
        let too_many = vec![1u32; codec.block_len() + 1];

        let mut out = Vec::new();
        assert!(codec.encode_block(&too_many, &mut out).is_err());
        assert!(codec.encode_block(&[], &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_width_byte_rejected() {
        let codec = BinaryPacking::<BitPacker1x>::new("bp");
        let mut out = vec![0u32; codec.block_len()];

        // 33 bits per value can never be a valid u32 width.
        let bogus = vec![33u8, 0, 0, 0, 0];
        assert!(codec.decode_block(&bogus, 4, &mut out).is_err());
    }
}
