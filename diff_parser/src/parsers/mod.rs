//! # Parsers
//!
//! The text-parsing stages of the diff pipeline. Both implement the
//! [`Parser`](crate::traits::parser::Parser) trait.
//!
//! - [`segmenter`]: splits the log into the names block and raw per-test-case blocks.
//! - [`name_parser`]: extracts ordered test case names from the names block.

pub mod name_parser;
pub mod segmenter;
