//! Parser Trait
//!
//! This module defines the [`Parser`] trait, a generic interface for the stages that turn diff log
//! text into structured values. Implementations validate their input against the sentinels in
//! [`DiffConfig`] and return a [`DiffError`] on structural failures.
//!
//! # Example
//!
//! ```rust
//! use diff_parser::config::DiffConfig;
//! use diff_parser::error::DiffError;
//! use diff_parser::traits::parser::Parser;
//!
//! struct LineCounter;
//!
//! impl<'a> Parser<&'a str, usize> for LineCounter {
//!     fn parse(&self, input: &'a str, _config: &DiffConfig) -> Result<usize, DiffError> {
//!         Ok(input.lines().count())
//!     }
//! }
//! ```

use crate::config::DiffConfig;
use crate::error::DiffError;

/// A generic trait for parsing diff log data into a strongly-typed Rust structure.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    /// Parse an input value into the target type.
    ///
    /// # Errors
    ///
    /// Returns a [`DiffError`] if the input does not have the expected structure.
    fn parse(&self, input: Input, config: &DiffConfig) -> Result<Output, DiffError>;
}
