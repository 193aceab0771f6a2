//! Shared ambient helpers for the diffview workspace: environment-driven
//! application configuration and tracing initialisation.

pub mod config;
pub mod logging;
