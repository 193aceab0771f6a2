//! Tracing initialisation for executables.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter`, a non-blocking
//! daily-rolling file layer, and an optional ANSI stdout layer. The returned
//! guard must be kept alive for the file writer to flush.

use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the filter from `LOG_LEVEL` when set, otherwise from `default_directives`.
pub fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_directives))
}

pub fn init_logging(log_dir: &str, log_file: &str, log_level: &str, log_to_stdout: bool) -> WorkerGuard {
    fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true)
    });

    // `try_init` so repeated initialisation (tests, embedding) does not panic.
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .ok();

    guard
}
