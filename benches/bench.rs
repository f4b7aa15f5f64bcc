//! Criterion benchmarks for the Xyston posting list store.
//!
//! Measures serialization and enumeration throughput for every registered
//! block codec over synthetic clustered posting lists.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use xyston::codec::{self, BlockCodec};
use xyston::index::{CompressedIndex, IndexBuilder};

/// Generate posting lists with clustered gaps, the shape real inverted
/// indexes tend to have.
fn generate_posting_lists(lists: usize, avg_len: usize) -> Vec<(Vec<u32>, Vec<u32>)> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut result = Vec::with_capacity(lists);

    for _ in 0..lists {
        let len = avg_len / 2 + rng.random_range(0..avg_len);
        let mut doc = 0u32;
        let mut docs = Vec::with_capacity(len);
        let mut freqs = Vec::with_capacity(len);

        for _ in 0..len {
            doc += rng.random_range(1..64);
            docs.push(doc);
            freqs.push(rng.random_range(1..16));
        }
        result.push((docs, freqs));
    }

    result
}

fn build_index(
    codec: Arc<dyn BlockCodec>,
    lists: &[(Vec<u32>, Vec<u32>)],
    num_docs: u64,
) -> CompressedIndex {
    let mut builder = IndexBuilder::new(num_docs, codec, true);
    for (docs, freqs) in lists {
        builder.add_posting_list(docs, Some(freqs)).unwrap();
    }
    builder.build()
}

fn bench_serialize(c: &mut Criterion) {
    let lists = generate_posting_lists(200, 2000);
    let postings: u64 = lists.iter().map(|(docs, _)| docs.len() as u64).sum();
    let num_docs = lists
        .iter()
        .map(|(docs, _)| u64::from(*docs.last().unwrap()) + 1)
        .max()
        .unwrap();

    let mut group = c.benchmark_group("serialize");
    group.throughput(Throughput::Elements(postings));

    for &name in codec::CODEC_NAMES {
        let codec = codec::by_name(name).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &lists, |b, lists| {
            b.iter(|| {
                let index = build_index(Arc::clone(&codec), lists, num_docs);
                black_box(index.payload_len())
            });
        });
    }

    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let lists = generate_posting_lists(200, 2000);
    let postings: u64 = lists.iter().map(|(docs, _)| docs.len() as u64).sum();
    let num_docs = lists
        .iter()
        .map(|(docs, _)| u64::from(*docs.last().unwrap()) + 1)
        .max()
        .unwrap();

    let mut group = c.benchmark_group("enumerate");
    group.throughput(Throughput::Elements(postings));

    for &name in codec::CODEC_NAMES {
        let codec = codec::by_name(name).unwrap();
        let index = build_index(codec, &lists, num_docs);

        group.bench_with_input(BenchmarkId::from_parameter(name), &index, |b, index| {
            b.iter(|| {
                let mut checksum = 0u64;
                for i in 0..index.size() {
                    let mut cursor = index.get(i).unwrap();
                    while let Some(doc) = cursor.next().unwrap() {
                        checksum = checksum.wrapping_add(u64::from(doc));
                    }
                }
                black_box(checksum)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_serialize, bench_enumerate);
criterion_main!(benches);
