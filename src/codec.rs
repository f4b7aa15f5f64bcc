//! Pluggable block codecs for posting list compression.
//!
//! A block codec losslessly encodes a fixed-count batch of u32 values.
//! The encoded bytes are not self-delimiting: decoding needs the value
//! count supplied externally (the store keeps it in the list's vbyte
//! length prefix), and reports how many bytes it consumed so the caller
//! can keep walking the payload. Codec output is not portable across
//! variants; an index must be decoded with the codec it was built with.

pub mod bitpacked;
pub mod vbyte;

use std::fmt;
use std::sync::Arc;

use bitpacking::{BitPacker1x, BitPacker4x, BitPacker8x};

use crate::error::Result;

pub use bitpacked::BinaryPacking;
pub use vbyte::VByteBlock;

/// The encode/decode contract every block codec satisfies.
///
/// `encode_block`/`decode_block` operate on at most [`block_len`] values;
/// longer sequences are split into consecutive blocks by the caller. The
/// store never interprets codec byte contents.
///
/// [`block_len`]: BlockCodec::block_len
pub trait BlockCodec: fmt::Debug + Send + Sync {
    /// The registry name of this codec.
    fn name(&self) -> &'static str;

    /// Natural batch granularity: the maximum (and preferred) number of
    /// values per encoded block.
    fn block_len(&self) -> usize;

    /// Append the encoding of `values` (1..=`block_len` of them) to `out`.
    ///
    /// Returns the number of bytes written. Deterministic and lossless.
    fn encode_block(&self, values: &[u32], out: &mut Vec<u8>) -> Result<usize>;

    /// Reconstruct exactly `count` values from the front of `bytes` into
    /// `out[..count]`, returning the number of bytes consumed.
    ///
    /// `out` must hold at least `count` slots. Fails with `DecodeError`
    /// if `bytes` is too short or not a valid encoding for this codec.
    fn decode_block(&self, bytes: &[u8], count: usize, out: &mut [u32]) -> Result<usize>;
}

/// Names of every registered codec, in registry order.
pub const CODEC_NAMES: &[&str] = &["bp", "simdbp", "simdbp256", "varint"];

/// Look up a block codec by its registry name.
///
/// Returns `None` for unrecognized names; the caller decides whether that
/// is fatal.
pub fn by_name(name: &str) -> Option<Arc<dyn BlockCodec>> {
    match name {
        "bp" => Some(Arc::new(BinaryPacking::<BitPacker1x>::new("bp"))),
        "simdbp" => Some(Arc::new(BinaryPacking::<BitPacker4x>::new("simdbp"))),
        "simdbp256" => Some(Arc::new(BinaryPacking::<BitPacker8x>::new("simdbp256"))),
        "varint" => Some(Arc::new(VByteBlock::new())),
        _ => None,
    }
}
