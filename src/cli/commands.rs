//! Command implementations for the Xyston CLI.

use std::time::Instant;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::codec;
use crate::collection::BinaryFreqCollection;
use crate::error::{Result, XystonError};
use crate::index::{CompressedIndex, IndexBuilder};
use crate::index::compressed::container_stats;

/// Execute a CLI command.
pub fn execute_command(args: XystonArgs) -> Result<()> {
    match &args.command {
        Command::Compress(compress_args) => compress(compress_args.clone(), &args),
        Command::Stats(stats_args) => stats(stats_args.clone(), &args),
        Command::Validate(validate_args) => validate(validate_args.clone(), &args),
    }
}

fn lookup_codec(codec_type: CodecType) -> Result<std::sync::Arc<dyn codec::BlockCodec>> {
    codec::by_name(codec_type.as_str()).ok_or_else(|| {
        XystonError::invalid_argument(format!("unknown codec: {}", codec_type.as_str()))
    })
}

/// Compress a binary collection into an index container.
fn compress(args: CompressArgs, cli_args: &XystonArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Compressing collection: {}", args.collection.display());
        println!("Codec: {}", args.codec.as_str());
    }

    let codec = lookup_codec(args.codec)?;
    let collection = BinaryFreqCollection::open(&args.collection)?;
    info!(
        "collection {} holds {} documents",
        args.collection.display(),
        collection.num_docs()
    );

    let start_time = Instant::now();
    let mut builder = IndexBuilder::new(collection.num_docs(), codec, args.freqs);
    let mut postings = 0u64;

    for input in collection.iter()? {
        let input = input?;
        postings += input.docs.len() as u64;
        let freqs = if args.freqs {
            Some(input.freqs.as_slice())
        } else {
            None
        };
        builder.add_posting_list(&input.docs, freqs)?;
    }

    let index = builder.build();
    let bytes = index.save(&args.output)?;
    debug!(
        "wrote {} lists ({} payload bytes) to {}",
        index.size(),
        index.payload_len(),
        args.output.display()
    );

    let bits_per_doc = if postings > 0 {
        bytes as f64 * 8.0 / postings as f64
    } else {
        0.0
    };

    output_result(
        "Index compressed successfully",
        &CompressionResult {
            lists: index.size(),
            postings,
            bytes,
            bits_per_doc,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Show container statistics without decoding.
fn stats(args: StatsArgs, cli_args: &XystonArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Reading container: {}", args.index_file.display());
    }

    let stats = container_stats(&args.index_file)?;
    let avg_bytes_per_list = if stats.lists > 0 {
        stats.payload_bytes as f64 / stats.lists as f64
    } else {
        0.0
    };

    output_result(
        "Container statistics",
        &StatsResult {
            lists: stats.lists,
            payload_bytes: stats.payload_bytes,
            total_bytes: stats.total_bytes,
            avg_bytes_per_list,
        },
        cli_args,
    )
}

/// Decode every list and check that document ids ascend strictly.
fn validate(args: ValidateArgs, cli_args: &XystonArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Validating index: {}", args.index_file.display());
    }

    let codec = lookup_codec(args.codec)?;
    let index = CompressedIndex::open(&args.index_file, codec, args.freqs, 0)?;

    let start_time = Instant::now();
    let mut postings = 0u64;

    for i in 0..index.size() {
        let mut cursor = index.get(i)?;
        let mut produced = 0usize;
        let mut previous: Option<u32> = None;

        while let Some(doc) = cursor.next()? {
            if let Some(prev) = previous {
                if doc <= prev {
                    return Err(XystonError::decode(format!(
                        "list {i}: document {doc} does not ascend past {prev}"
                    )));
                }
            }
            if args.freqs && cursor.freq()? == 0 {
                return Err(XystonError::decode(format!(
                    "list {i}: zero frequency for document {doc}"
                )));
            }
            previous = Some(doc);
            produced += 1;
        }

        if produced != cursor.size() {
            return Err(XystonError::decode(format!(
                "list {i}: produced {produced} of {} documents",
                cursor.size()
            )));
        }
        postings += produced as u64;
    }

    output_result(
        "Index validated successfully",
        &ValidationResult {
            lists: index.size(),
            postings,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}
