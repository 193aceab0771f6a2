//!
//! Traits Module
//!
//! Core traits shared by the diff parser stages.
//!
//! - [`parser`]: the generic trait every parsing stage implements.

pub mod parser;
