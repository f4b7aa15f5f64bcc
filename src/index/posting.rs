//! Posting list serialization and the document enumerator.
//!
//! A serialized list is `[vbyte(n)] [gap blocks] [frequency blocks]`,
//! where the gap and frequency sections are runs of codec blocks holding
//! `n` values each and the frequency section exists only for lists built
//! with frequencies. Document ids are gap-coded: the first gap is the
//! first id verbatim, every later gap is `id - previous - 1`. Frequencies
//! are stored verbatim.

use crate::codec::BlockCodec;
use crate::error::{Result, XystonError};
use crate::util::varint;

/// Serialize one posting list, appending to `out`.
///
/// `docs` must be nonempty, strictly ascending and unique; ascent is a
/// caller contract checked only in debug builds. `freqs`, when given,
/// must hold one value per document. Returns the number of bytes
/// appended. No padding is inserted between lists.
pub fn write_posting_list(
    out: &mut Vec<u8>,
    docs: &[u32],
    freqs: Option<&[u32]>,
    codec: &dyn BlockCodec,
) -> Result<usize> {
    if docs.is_empty() {
        return Err(XystonError::invalid_argument(
            "posting list must be nonempty",
        ));
    }
    if let Some(freqs) = freqs {
        if freqs.len() != docs.len() {
            return Err(XystonError::invalid_argument(format!(
                "frequency count {} does not match document count {}",
                freqs.len(),
                docs.len()
            )));
        }
    }
    debug_assert!(
        docs.windows(2).all(|w| w[0] < w[1]),
        "document ids must be strictly ascending"
    );

    let start = out.len();
    varint::encode_u32_into(docs.len() as u32, out);

    let mut gaps = Vec::with_capacity(docs.len());
    let mut prev: Option<u32> = None;
    for &doc in docs {
        gaps.push(match prev {
            None => doc,
            Some(p) => doc.wrapping_sub(p).wrapping_sub(1),
        });
        prev = Some(doc);
    }

    for chunk in gaps.chunks(codec.block_len()) {
        codec.encode_block(chunk, out)?;
    }

    if let Some(freqs) = freqs {
        for chunk in freqs.chunks(codec.block_len()) {
            codec.encode_block(chunk, out)?;
        }
    }

    Ok(out.len() - start)
}

/// A stateful cursor over one serialized posting list.
///
/// The enumerator starts uninitialized, becomes positioned after the
/// first successful [`next`], and is exhausted once every document has
/// been produced. Gap blocks are decoded one codec batch at a time and
/// cached, so [`next`] amortizes decode cost across a block.
///
/// [`next`]: DocumentEnumerator::next
#[derive(Debug)]
pub struct DocumentEnumerator<'a> {
    data: &'a [u8],
    codec: &'a dyn BlockCodec,
    n: usize,
    has_freqs: bool,

    /// Current position; meaningful only once `started`.
    position: usize,
    started: bool,
    current: u32,

    /// Byte offset of the next undecoded gap block.
    doc_offset: usize,
    /// Absolute ids of the cached gap block.
    block: Vec<u32>,
    block_idx: Option<usize>,
    /// Last absolute id across every decoded gap block.
    prev_last: Option<u32>,

    /// Byte offset where the frequency section starts, once located.
    freq_section: Option<usize>,
    freq_offset: usize,
    freq_block: Vec<u32>,
    freq_block_idx: Option<usize>,

    scratch: Vec<u32>,
}

impl<'a> DocumentEnumerator<'a> {
    /// Bind an enumerator to one list's byte range.
    ///
    /// Parses the vbyte length prefix; an empty window, a truncated
    /// prefix, or a zero document count is `MalformedInput`.
    pub fn new(data: &'a [u8], codec: &'a dyn BlockCodec, has_freqs: bool) -> Result<Self> {
        if data.is_empty() {
            return Err(XystonError::malformed_input("empty posting list window"));
        }

        let (n, header_len) = varint::decode_u32(data)?;
        if n == 0 {
            return Err(XystonError::malformed_input(
                "posting list declares zero documents",
            ));
        }

        let block_len = codec.block_len();
        Ok(DocumentEnumerator {
            data,
            codec,
            n: n as usize,
            has_freqs,
            position: 0,
            started: false,
            current: 0,
            doc_offset: header_len,
            block: Vec::with_capacity(block_len),
            block_idx: None,
            prev_last: None,
            freq_section: None,
            freq_offset: 0,
            freq_block: Vec::new(),
            freq_block_idx: None,
            scratch: vec![0u32; block_len],
        })
    }

    /// Total number of documents in this list; valid in any state.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Advance to the next document and return its absolute id, or `None`
    /// once the list is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u32>> {
        if !self.started {
            self.started = true;
        } else if self.position < self.n {
            self.position += 1;
        }

        if self.position >= self.n {
            return Ok(None);
        }

        let block_len = self.codec.block_len();
        let target = self.position / block_len;
        while self.block_idx.is_none_or(|cached| cached < target) {
            self.decode_next_doc_block()?;
        }

        self.current = self.block[self.position % block_len];
        Ok(Some(self.current))
    }

    /// The current absolute document id.
    pub fn docid(&self) -> Result<u32> {
        self.check_positioned()?;
        Ok(self.current)
    }

    /// The current document's frequency.
    ///
    /// Fails with `ValueUnavailable` on lists serialized without
    /// frequencies. The frequency section is located lazily on first use.
    pub fn freq(&mut self) -> Result<u32> {
        if !self.has_freqs {
            return Err(XystonError::value_unavailable(
                "list was serialized without frequencies",
            ));
        }
        self.check_positioned()?;

        if self.freq_section.is_none() {
            self.locate_freq_section()?;
        }

        let block_len = self.codec.block_len();
        let target = self.position / block_len;
        while self.freq_block_idx.is_none_or(|cached| cached < target) {
            self.decode_next_freq_block()?;
        }

        Ok(self.freq_block[self.position % block_len])
    }

    fn check_positioned(&self) -> Result<()> {
        if !self.started {
            return Err(XystonError::invalid_state(
                "enumerator has not been advanced",
            ));
        }
        if self.position >= self.n {
            return Err(XystonError::invalid_state("enumerator is exhausted"));
        }
        Ok(())
    }

    fn block_count(&self) -> usize {
        self.n.div_ceil(self.codec.block_len())
    }

    fn decode_next_doc_block(&mut self) -> Result<()> {
        let block_len = self.codec.block_len();
        let idx = self.block_idx.map_or(0, |i| i + 1);
        let count = (self.n - idx * block_len).min(block_len);

        let window = self.data.get(self.doc_offset..).ok_or_else(|| {
            XystonError::decode("posting list window exhausted before gap block")
        })?;
        let consumed = self.codec.decode_block(window, count, &mut self.scratch)?;

        self.block.clear();
        let mut prev = self.prev_last;
        for &gap in &self.scratch[..count] {
            let id = match prev {
                None => gap,
                Some(p) => p.wrapping_add(gap).wrapping_add(1),
            };
            self.block.push(id);
            prev = Some(id);
        }

        self.prev_last = prev;
        self.doc_offset += consumed;
        self.block_idx = Some(idx);
        Ok(())
    }

    /// Walk the gap blocks not yet reached by the document cursor to find
    /// where the frequency section starts. Codec output is not
    /// self-delimiting, so the walk decodes each block into scratch and
    /// discards it; the document cursor itself is left untouched.
    fn locate_freq_section(&mut self) -> Result<()> {
        let block_len = self.codec.block_len();
        let total = self.block_count();
        let mut decoded = self.block_idx.map_or(0, |i| i + 1);
        let mut offset = self.doc_offset;
        let mut scratch = vec![0u32; block_len];

        while decoded < total {
            let count = (self.n - decoded * block_len).min(block_len);
            let window = self.data.get(offset..).ok_or_else(|| {
                XystonError::decode("posting list window exhausted before gap block")
            })?;
            offset += self.codec.decode_block(window, count, &mut scratch)?;
            decoded += 1;
        }

        self.freq_section = Some(offset);
        self.freq_offset = offset;
        if self.freq_block.is_empty() {
            self.freq_block = vec![0u32; block_len];
        }
        Ok(())
    }

    fn decode_next_freq_block(&mut self) -> Result<()> {
        let block_len = self.codec.block_len();
        let idx = self.freq_block_idx.map_or(0, |i| i + 1);
        let count = (self.n - idx * block_len).min(block_len);

        let window = self.data.get(self.freq_offset..).ok_or_else(|| {
            XystonError::decode("posting list window exhausted before frequency block")
        })?;
        let consumed = self
            .codec
            .decode_block(window, count, &mut self.freq_block)?;

        self.freq_offset += consumed;
        self.freq_block_idx = Some(idx);
        Ok(())
    }
}
