//! Output formatting for CLI commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, XystonArgs};
use crate::error::Result;

/// Result structure for collection compression.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompressionResult {
    pub lists: usize,
    pub postings: u64,
    pub bytes: u64,
    pub bits_per_doc: f64,
    pub duration_ms: u64,
}

impl fmt::Display for CompressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lists: {}, postings: {}, bytes: {}, bits/doc: {:.2}, took {} ms",
            self.lists, self.postings, self.bytes, self.bits_per_doc, self.duration_ms
        )
    }
}

/// Result structure for container statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResult {
    pub lists: usize,
    pub payload_bytes: u64,
    pub total_bytes: u64,
    pub avg_bytes_per_list: f64,
}

impl fmt::Display for StatsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lists: {}, payload bytes: {}, container bytes: {}, avg bytes/list: {:.2}",
            self.lists, self.payload_bytes, self.total_bytes, self.avg_bytes_per_list
        )
    }
}

/// Result structure for index validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub lists: usize,
    pub postings: u64,
    pub duration_ms: u64,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validated {} lists, {} postings, took {} ms",
            self.lists, self.postings, self.duration_ms
        )
    }
}

/// Print a command result in the requested format.
pub fn output_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &XystonArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Json => {
            let rendered = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            println!("{rendered}");
        }
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
            }
            println!("{result}");
        }
    }

    Ok(())
}
