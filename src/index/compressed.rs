//! The immutable compressed index and its on-disk container.
//!
//! Container layout (little-endian):
//! `[u32 endpoint_count] [endpoint_count * u32 endpoint] [u32 payload_size]
//! [payload bytes]`. The payload holds every serialized posting list back
//! to back; `endpoints[i]..endpoints[i+1]` delimits list `i`.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use memmap2::{Mmap, MmapOptions};

use crate::codec::BlockCodec;
use crate::error::{Result, XystonError};
use crate::index::posting::DocumentEnumerator;

/// Payload byte backing: heap-owned after a build, or a window into a
/// shared memory map after opening a container file. One `as_slice`
/// interface keeps the two interchangeable for the index and enumerator.
pub enum ListBytes {
    Owned(Vec<u8>),
    Mapped {
        map: Arc<Mmap>,
        offset: usize,
        len: usize,
    },
}

impl ListBytes {
    /// The payload bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ListBytes::Owned(bytes) => bytes,
            ListBytes::Mapped { map, offset, len } => &map[*offset..*offset + *len],
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        match self {
            ListBytes::Owned(bytes) => bytes.len(),
            ListBytes::Mapped { len, .. } => *len,
        }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListBytes::Owned(bytes) => f.debug_tuple("Owned").field(&bytes.len()).finish(),
            ListBytes::Mapped { offset, len, .. } => f
                .debug_struct("Mapped")
                .field("offset", offset)
                .field("len", len)
                .finish(),
        }
    }
}

/// Immutable random-access view over the finished payload blob.
///
/// Safe for unbounded concurrent readers: nothing is mutated after
/// construction. Each [`get`] hands out an independent enumerator.
///
/// [`get`]: CompressedIndex::get
#[derive(Debug)]
pub struct CompressedIndex {
    size: usize,
    num_docs: u64,
    endpoints: Vec<u64>,
    lists: ListBytes,
    codec: Arc<dyn BlockCodec>,
    compress_freqs: bool,
}

impl CompressedIndex {
    pub(crate) fn from_parts(
        num_docs: u64,
        endpoints: Vec<u64>,
        lists: ListBytes,
        codec: Arc<dyn BlockCodec>,
        compress_freqs: bool,
    ) -> Self {
        debug_assert!(!endpoints.is_empty());
        debug_assert_eq!(*endpoints.last().unwrap() as usize, lists.len());

        CompressedIndex {
            size: endpoints.len() - 1,
            num_docs,
            endpoints,
            lists,
            codec,
            compress_freqs,
        }
    }

    /// Number of posting lists.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Collection-level document count supplied at construction.
    pub fn num_docs(&self) -> u64 {
        self.num_docs
    }

    /// Total payload bytes.
    pub fn payload_len(&self) -> u64 {
        self.lists.len() as u64
    }

    /// Whether lists carry a frequency section.
    pub fn has_freqs(&self) -> bool {
        self.compress_freqs
    }

    /// The block codec this index was built with.
    pub fn codec(&self) -> &dyn BlockCodec {
        self.codec.as_ref()
    }

    /// The endpoint table: `size() + 1` non-decreasing byte offsets.
    pub fn endpoints(&self) -> &[u64] {
        &self.endpoints
    }

    fn list_range(&self, i: usize) -> Result<Range<usize>> {
        if i >= self.size {
            return Err(XystonError::out_of_range(format!(
                "list {i} out of range for index of {} lists",
                self.size
            )));
        }
        Ok(self.endpoints[i] as usize..self.endpoints[i + 1] as usize)
    }

    /// An enumerator bound to list `i`'s byte range.
    pub fn get(&self, i: usize) -> Result<DocumentEnumerator<'_>> {
        let range = self.list_range(i)?;
        DocumentEnumerator::new(
            &self.lists.as_slice()[range],
            self.codec.as_ref(),
            self.compress_freqs,
        )
    }

    /// Touch every byte of list `i`'s range without decoding, forcing a
    /// memory-mapped backing to page it in. Pure side effect: decode
    /// results are unaffected, and repeated calls are harmless.
    pub fn warmup(&self, i: usize) -> Result<()> {
        let range = self.list_range(i)?;

        let mut acc = 0u8;
        for &byte in &self.lists.as_slice()[range] {
            acc ^= byte;
        }
        std::hint::black_box(acc);
        Ok(())
    }

    /// Write the container to `out`, returning the bytes written.
    pub fn save_to<W: Write>(&self, out: &mut W) -> Result<u64> {
        let endpoint_count = u32::try_from(self.endpoints.len()).map_err(|_| {
            XystonError::invalid_argument("endpoint table too large for container format")
        })?;
        let payload_size = u32::try_from(self.lists.len()).map_err(|_| {
            XystonError::invalid_argument("payload too large for container format")
        })?;

        out.write_u32::<LittleEndian>(endpoint_count)?;
        for &endpoint in &self.endpoints {
            // Endpoints are bounded by the payload size checked above.
            out.write_u32::<LittleEndian>(endpoint as u32)?;
        }
        out.write_u32::<LittleEndian>(payload_size)?;
        out.write_all(self.lists.as_slice())?;

        Ok(8 + 4 * endpoint_count as u64 + payload_size as u64)
    }

    /// Write the container to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let written = self.save_to(&mut writer)?;
        writer.flush()?;
        Ok(written)
    }

    /// Open a container file, memory-mapping the payload for zero-copy
    /// access.
    ///
    /// The container does not record the collection document count or the
    /// codec, so both come from the caller; decoding with a codec other
    /// than the one the index was built with yields garbage or
    /// `DecodeError`.
    pub fn open<P: AsRef<Path>>(
        path: P,
        codec: Arc<dyn BlockCodec>,
        compress_freqs: bool,
        num_docs: u64,
    ) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            XystonError::storage(format!(
                "failed to open index file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let map = unsafe {
            MmapOptions::new().map(&file).map_err(|e| {
                XystonError::storage(format!(
                    "failed to mmap index file {}: {e}",
                    path.as_ref().display()
                ))
            })?
        };

        let data: &[u8] = &map;
        if data.len() < 4 {
            return Err(XystonError::malformed_input("container too short"));
        }

        let endpoint_count = LittleEndian::read_u32(&data[0..4]) as usize;
        if endpoint_count == 0 {
            return Err(XystonError::malformed_input("empty endpoint table"));
        }

        let payload_size_at = 4 + endpoint_count * 4;
        if data.len() < payload_size_at + 4 {
            return Err(XystonError::malformed_input("truncated endpoint table"));
        }

        let mut endpoints = Vec::with_capacity(endpoint_count);
        for i in 0..endpoint_count {
            let at = 4 + i * 4;
            endpoints.push(LittleEndian::read_u32(&data[at..at + 4]) as u64);
        }
        if endpoints[0] != 0 {
            return Err(XystonError::malformed_input("endpoint table must start at 0"));
        }
        if endpoints.windows(2).any(|w| w[0] > w[1]) {
            return Err(XystonError::malformed_input(
                "endpoint table is not monotonic",
            ));
        }

        let payload_size =
            LittleEndian::read_u32(&data[payload_size_at..payload_size_at + 4]) as usize;
        let payload_at = payload_size_at + 4;
        if data.len() < payload_at + payload_size {
            return Err(XystonError::malformed_input("truncated payload"));
        }
        if *endpoints.last().unwrap() != payload_size as u64 {
            return Err(XystonError::malformed_input(
                "endpoint table does not cover payload",
            ));
        }

        log::debug!(
            "opened index {}: {} lists, {} payload bytes",
            path.as_ref().display(),
            endpoint_count - 1,
            payload_size
        );

        Ok(CompressedIndex::from_parts(
            num_docs,
            endpoints,
            ListBytes::Mapped {
                map: Arc::new(map),
                offset: payload_at,
                len: payload_size,
            },
            codec,
            compress_freqs,
        ))
    }
}

/// Codec-agnostic facts read from a container file's framing.
#[derive(Debug, Clone)]
pub struct ContainerStats {
    /// Number of posting lists.
    pub lists: usize,
    /// Payload bytes (all serialized lists).
    pub payload_bytes: u64,
    /// Total container bytes including framing.
    pub total_bytes: u64,
}

/// Inspect a container file without decoding anything.
pub fn container_stats<P: AsRef<Path>>(path: P) -> Result<ContainerStats> {
    use std::io::{BufReader, Seek, SeekFrom};

    let file = File::open(path.as_ref())?;
    let total_bytes = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let endpoint_count = reader.read_u32::<LittleEndian>().map_err(|_| {
        XystonError::malformed_input("container too short")
    })? as usize;
    if endpoint_count == 0 {
        return Err(XystonError::malformed_input("empty endpoint table"));
    }

    reader.seek(SeekFrom::Current(endpoint_count as i64 * 4))?;
    let payload_bytes = reader.read_u32::<LittleEndian>().map_err(|_| {
        XystonError::malformed_input("truncated endpoint table")
    })? as u64;

    let framing = 8 + endpoint_count as u64 * 4;
    if total_bytes < framing + payload_bytes {
        return Err(XystonError::malformed_input("truncated payload"));
    }

    Ok(ContainerStats {
        lists: endpoint_count - 1,
        payload_bytes,
        total_bytes,
    })
}
