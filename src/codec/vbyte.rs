//! Variable-byte group block codec.
//!
//! Encodes each value of a block with the same self-delimiting vbyte
//! groups used for list length prefixes. No per-block header is needed:
//! the value count delimits the block on decode.

use crate::codec::BlockCodec;
use crate::error::{Result, XystonError};
use crate::util::varint;

/// How many values a vbyte block holds. The format itself has no block
/// boundary, so this only sets the decode batch granularity.
const BLOCK_LEN: usize = 128;

/// A block codec storing one vbyte group per value.
#[derive(Debug, Default)]
pub struct VByteBlock;

impl VByteBlock {
    /// Create a vbyte block codec.
    pub fn new() -> Self {
        VByteBlock
    }
}

impl BlockCodec for VByteBlock {
    fn name(&self) -> &'static str {
        "varint"
    }

    fn block_len(&self) -> usize {
        BLOCK_LEN
    }

    fn encode_block(&self, values: &[u32], out: &mut Vec<u8>) -> Result<usize> {
        if values.is_empty() || values.len() > BLOCK_LEN {
            return Err(XystonError::invalid_argument(format!(
                "block must hold 1..={} values, got {}",
                BLOCK_LEN,
                values.len()
            )));
        }

        let mut written = 0;
        for &value in values {
            written += varint::encode_u32_into(value, out);
        }

        Ok(written)
    }

    fn decode_block(&self, bytes: &[u8], count: usize, out: &mut [u32]) -> Result<usize> {
        if count == 0 || count > BLOCK_LEN {
            return Err(XystonError::invalid_argument(format!(
                "block must hold 1..={BLOCK_LEN} values, got {count}"
            )));
        }

        let mut offset = 0;
        for slot in out.iter_mut().take(count) {
            let (value, consumed) = varint::decode_u32(&bytes[offset..]).map_err(|_| {
                XystonError::decode(format!(
                    "vbyte block ends after {offset} bytes, {count} values expected"
                ))
            })?;
            *slot = value;
            offset += consumed;
        }

        Ok(offset)
    }
}
