//! Error types for segscan.
//!
//! The scan layer itself never validates its inputs. Errors come from the
//! primitive backend (bounds-checked scatter and gather), from configuration
//! and from the command line boundary.
//!
//! # Examples
//!
//! ```
//! use segscan::error::{Result, SegScanError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SegScanError::invalid_segment("lengths sum to 7, data has 6 elements"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for segscan operations.
#[derive(Error, Debug)]
pub enum SegScanError {
    /// I/O errors (reading config or input files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Segment lengths that do not partition the data vector
    #[error("Invalid segment: {0}")]
    InvalidSegment(String),

    /// A scatter or gather addressed a position outside its target
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Thread pool construction errors
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SegScanError.
pub type Result<T> = std::result::Result<T, SegScanError>;

impl SegScanError {
    /// Create a new invalid segment error.
    pub fn invalid_segment<S: Into<String>>(msg: S) -> Self {
        SegScanError::InvalidSegment(msg.into())
    }

    /// Create a new out-of-bounds error for `index` into a target of `len` elements.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        SegScanError::IndexOutOfBounds(format!("index {index} is outside a vector of length {len}"))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SegScanError::InvalidConfig(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        SegScanError::ThreadPool(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SegScanError::Other(msg.into())
    }
}
