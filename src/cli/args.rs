//! Command line argument parsing for the Xyston CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Xyston - a compressed, random-access posting list store
#[derive(Parser, Debug, Clone)]
#[command(name = "xyston")]
#[command(about = "A compressed, random-access posting list store")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct XystonArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl XystonArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Output format for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compress a binary collection into an index container
    Compress(CompressArgs),

    /// Show container statistics without decoding
    Stats(StatsArgs),

    /// Decode every list and check document id ascent
    Validate(ValidateArgs),
}

/// Block codec selection. Unrecognized names are rejected at parse time.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecType {
    /// Scalar binary packing (32-value blocks)
    #[value(name = "bp")]
    Bp,
    /// SIMD binary packing (128-value blocks)
    #[value(name = "simdbp")]
    Simdbp,
    /// Wide SIMD binary packing (256-value blocks)
    #[value(name = "simdbp256")]
    Simdbp256,
    /// Variable-byte groups (128-value blocks)
    #[value(name = "varint")]
    Varint,
}

impl CodecType {
    /// The registry name for this codec.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecType::Bp => "bp",
            CodecType::Simdbp => "simdbp",
            CodecType::Simdbp256 => "simdbp256",
            CodecType::Varint => "varint",
        }
    }
}

/// Arguments for compressing a collection
#[derive(Parser, Debug, Clone)]
pub struct CompressArgs {
    /// Index type (block codec)
    #[arg(short = 't', long = "type", value_enum)]
    pub codec: CodecType,

    /// Collection basename (expects <basename>.docs and <basename>.freqs)
    #[arg(short, long, value_name = "COLLECTION")]
    pub collection: PathBuf,

    /// Output filename
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also compress per-document frequencies
    #[arg(long)]
    pub freqs: bool,
}

/// Arguments for showing container statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the index container
    #[arg(value_name = "INDEX_FILE")]
    pub index_file: PathBuf,
}

/// Arguments for validating an index
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Index type (block codec) the container was built with
    #[arg(short = 't', long = "type", value_enum)]
    pub codec: CodecType,

    /// Path to the index container
    #[arg(value_name = "INDEX_FILE")]
    pub index_file: PathBuf,

    /// The container was built with compressed frequencies
    #[arg(long)]
    pub freqs: bool,
}
