//! Single-writer accumulator for building a compressed index.

use std::sync::Arc;

use crate::codec::BlockCodec;
use crate::error::Result;
use crate::index::compressed::{CompressedIndex, ListBytes};
use crate::index::posting;

/// Accumulates serialized posting lists into one growable payload blob,
/// recording a byte endpoint after every appended list.
///
/// Lists are added exactly once each, in final list-id order, from a
/// single writer. [`build`] consumes the builder and moves its buffers
/// into the immutable [`CompressedIndex`]; reuse after build is a
/// compile error, not undefined behavior.
///
/// [`build`]: IndexBuilder::build
#[derive(Debug)]
pub struct IndexBuilder {
    num_docs: u64,
    endpoints: Vec<u64>,
    lists: Vec<u8>,
    codec: Arc<dyn BlockCodec>,
    compress_freqs: bool,
}

impl IndexBuilder {
    /// Create a builder for a collection of `num_docs` documents.
    pub fn new(num_docs: u64, codec: Arc<dyn BlockCodec>, compress_freqs: bool) -> Self {
        IndexBuilder {
            num_docs,
            endpoints: vec![0],
            lists: Vec::new(),
            codec,
            compress_freqs,
        }
    }

    /// Serialize one posting list into the shared blob and record its
    /// endpoint.
    ///
    /// Fails with `InvalidArgument` for an empty list, a frequency slice
    /// whose presence disagrees with the builder's configuration, or a
    /// length mismatch; on any error the blob and endpoint table are left
    /// exactly as they were.
    pub fn add_posting_list(&mut self, docs: &[u32], freqs: Option<&[u32]>) -> Result<usize> {
        if self.compress_freqs != freqs.is_some() {
            return Err(crate::error::XystonError::invalid_argument(
                if self.compress_freqs {
                    "builder expects frequencies for every list"
                } else {
                    "builder was not configured for frequencies"
                },
            ));
        }

        let start = self.lists.len();
        match posting::write_posting_list(&mut self.lists, docs, freqs, self.codec.as_ref()) {
            Ok(written) => {
                self.endpoints.push(self.lists.len() as u64);
                Ok(written)
            }
            Err(e) => {
                self.lists.truncate(start);
                Err(e)
            }
        }
    }

    /// Number of lists added so far.
    pub fn len(&self) -> usize {
        self.endpoints.len() - 1
    }

    /// Whether no lists have been added yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The collection document count this builder was created with.
    pub fn num_docs(&self) -> u64 {
        self.num_docs
    }

    /// Total payload bytes written so far.
    pub fn payload_len(&self) -> u64 {
        self.lists.len() as u64
    }

    /// Finalize: move the endpoint table and payload blob into an
    /// immutable index.
    pub fn build(self) -> CompressedIndex {
        CompressedIndex::from_parts(
            self.num_docs,
            self.endpoints,
            ListBytes::Owned(self.lists),
            self.codec,
            self.compress_freqs,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::codec;
    use crate::error::XystonError;

    use super::*;

    fn builder(compress_freqs: bool) -> IndexBuilder {
        IndexBuilder::new(21, codec::by_name("simdbp").unwrap(), compress_freqs)
    }

    #[test]
    fn test_endpoints_track_payload() {
        let mut b = builder(false);
        assert_eq!(b.len(), 0);
        assert!(b.is_empty());

        b.add_posting_list(&[1, 2, 3], None).unwrap();
        b.add_posting_list(&[10, 20], None).unwrap();

        assert_eq!(b.len(), 2);
        assert_eq!(b.num_docs(), 21);

        let payload = b.payload_len();
        let index = b.build();
        assert_eq!(index.size(), 2);
        assert_eq!(index.payload_len(), payload);

        // Endpoint invariants: one per list plus the seed, monotonic,
        // closing at the payload length.
        let endpoints = index.endpoints();
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[0], 0);
        assert!(endpoints.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*endpoints.last().unwrap(), payload);
    }

    #[test]
    fn test_empty_list_leaves_state_untouched() {
        let mut b = builder(false);
        b.add_posting_list(&[4, 8], None).unwrap();
        let payload_before = b.payload_len();

        let result = b.add_posting_list(&[], None);
        assert!(matches!(result, Err(XystonError::InvalidArgument(_))));

        assert_eq!(b.len(), 1);
        assert_eq!(b.payload_len(), payload_before);

        // The surviving list still decodes.
        let index = b.build();
        let mut cursor = index.get(0).unwrap();
        assert_eq!(cursor.next().unwrap(), Some(4));
        assert_eq!(cursor.next().unwrap(), Some(8));
        assert_eq!(cursor.next().unwrap(), None);
    }

    #[test]
    fn test_freq_configuration_is_enforced() {
        let mut with_freqs = builder(true);
        assert!(with_freqs.add_posting_list(&[1, 2], None).is_err());
        assert!(with_freqs.add_posting_list(&[1, 2], Some(&[3, 1])).is_ok());

        let mut without_freqs = builder(false);
        assert!(
            without_freqs
                .add_posting_list(&[1, 2], Some(&[3, 1]))
                .is_err()
        );
        assert!(without_freqs.add_posting_list(&[1, 2], None).is_ok());
    }

    #[test]
    fn test_build_empty_builder() {
        let index = builder(false).build();
        assert_eq!(index.size(), 0);
        assert_eq!(index.payload_len(), 0);
        assert!(matches!(index.get(0), Err(XystonError::OutOfRange(_))));
    }
}
