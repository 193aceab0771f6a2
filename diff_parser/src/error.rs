//! Diff Parser Error Types
//!
//! This module defines the [`DiffError`] enum, which covers every fatal failure that can occur while
//! loading, segmenting and assembling a diff log. Non-fatal per-record problems are not errors; they
//! are reported as [`crate::types::AssemblyMismatch`] values alongside the parsed records.
//!
//! # Example
//!
//! ```rust
//! use diff_parser::error::DiffError;
//!
//! fn require_names(block: &str) -> Result<(), DiffError> {
//!     if block.is_empty() {
//!         return Err(DiffError::EmptyNamesBlock);
//!     }
//!     Ok(())
//! }
//! ```

/// Represents all fatal error types that can occur in the diff parser.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// I/O error (file not found, not a file, unreadable).
    #[error("I/O error: {0}")]
    Io(String),

    /// The summary sentinels are missing or out of order.
    #[error("Malformed diff log: {0}")]
    MalformedLog(String),

    /// The captured test-case names region was empty.
    #[error("The test case names block is empty")]
    EmptyNamesBlock,

    /// The parser configuration could not be loaded or is unusable.
    #[error("Invalid diff configuration: {0}")]
    InvalidConfig(String),

    /// Results were requested before the diff file was processed.
    #[error("The diff data has not been loaded and processed yet")]
    NotProcessed,

    /// A blocking worker panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    TaskJoin(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio::task::JoinError> for DiffError {
    fn from(e: tokio::task::JoinError) -> Self {
        DiffError::TaskJoin(e.to_string())
    }
}
