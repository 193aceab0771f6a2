//! # Utilities
//!
//! File-system helpers used by the diff parser:
//! - [`file_loader`]: validates the diff log path and streams it into the segmenter.
//! - [`file_writer`]: writes name lists and reports.

pub mod file_loader;
pub mod file_writer;
