//! Error types for the Xyston library.
//!
//! All errors are represented by the [`XystonError`] enum. The variants
//! follow the store's error taxonomy: argument validation, bounds checks,
//! malformed binary input, codec-level decode failures, and enumerator
//! state violations each get their own variant so callers can react to
//! them individually.
//!
//! # Examples
//!
//! ```
//! use xyston::error::{Result, XystonError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(XystonError::invalid_argument("posting list must be nonempty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Xyston operations.
#[derive(Error, Debug)]
pub enum XystonError {
    /// I/O errors (file operations, mmap, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An argument violates the caller contract (e.g. an empty posting list).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A list index lookup beyond the index size.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A length prefix or container header cannot be parsed from the given bytes.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Codec-level corruption or insufficient compressed bytes.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// An enumerator was queried before the first advance or after exhaustion.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A frequency was requested on a list built without frequency compression.
    #[error("Value unavailable: {0}")]
    ValueUnavailable(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with XystonError.
pub type Result<T> = std::result::Result<T, XystonError>;

impl XystonError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        XystonError::InvalidArgument(msg.into())
    }

    /// Create a new out of range error.
    pub fn out_of_range<S: Into<String>>(msg: S) -> Self {
        XystonError::OutOfRange(msg.into())
    }

    /// Create a new malformed input error.
    pub fn malformed_input<S: Into<String>>(msg: S) -> Self {
        XystonError::MalformedInput(msg.into())
    }

    /// Create a new decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        XystonError::DecodeError(msg.into())
    }

    /// Create a new invalid state error.
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        XystonError::InvalidState(msg.into())
    }

    /// Create a new value unavailable error.
    pub fn value_unavailable<S: Into<String>>(msg: S) -> Self {
        XystonError::ValueUnavailable(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        XystonError::Storage(msg.into())
    }
}
