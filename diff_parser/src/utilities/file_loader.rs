//!
//! File Loader Utility
//!
//! Validates the diff log path and streams its lines into a [`LogSegmenter`].
//!
//! # Functionality
//!
//! - Checks that the path exists, is a regular file, and is readable.
//! - Reads the file line by line through a buffered reader; `\r\n` and `\n` endings are accepted and
//!   a leading UTF-8 byte order mark is dropped. Invalid UTF-8 is decoded lossily (U+FFFD).
//! - The file handle lives only inside [`load_segments`], so it is closed on every exit path.
//!
//! # Error Handling
//!
//! Returns [`DiffError::Io`] for missing, non-file, or unreadable paths, and
//! propagates [`DiffError::MalformedLog`] from the segmenter.

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::parsers::segmenter::{LogSegmenter, Segments};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{error, info};

const BUFFER_SIZE: usize = 64 * 1024;
const BOM: char = '\u{feff}';

/// Checks that a file exists and is a regular file.
///
/// # Errors
///
/// Returns [`DiffError::Io`] if the file is missing, not a file, or its metadata is unreadable.
pub fn check_file(path: &Path) -> Result<(), DiffError> {
    if !path.exists() {
        error!("File does not exist: `{}`", path.display());
        return Err(DiffError::Io(format!("File not found: {}", path.display())));
    }

    if !path.is_file() {
        error!("Not a file: `{}`", path.display());
        return Err(DiffError::Io(format!("Not a file: {}", path.display())));
    }

    fs::metadata(path).map_err(|e| {
        error!("File unreadable: `{}` - {}", path.display(), e);
        DiffError::Io(format!("File unreadable: {}", path.display()))
    })?;

    Ok(())
}

/// Last modification time of `path`, if the platform reports one.
pub fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Stream `path` through the segmenter.
pub fn load_segments(path: &Path, config: &DiffConfig) -> Result<Segments, DiffError> {
    check_file(path)?;
    info!("Start handling diff file: {}", path.display());

    let file = File::open(path).map_err(|e| {
        error!("Cannot open `{}`: {}", path.display(), e);
        DiffError::Io(format!("File unreadable: {}", path.display()))
    })?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut segmenter = LogSegmenter::new(config);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|e| {
            error!(
                "Error reading `{}` at line {}: {}",
                path.display(),
                line_no + 1,
                e
            );
            DiffError::Io(format!(
                "Failed to read {} at line {}: {e}",
                path.display(),
                line_no + 1
            ))
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let bytes = strip_line_ending(&buf);
        let line = String::from_utf8_lossy(bytes);
        let line = if line_no == 1 {
            line.strip_prefix(BOM).unwrap_or(&line)
        } else {
            &line
        };
        segmenter.push_line(line)?;
    }

    let segments = segmenter.finish()?;
    info!(
        blocks = segments.raw_blocks.len(),
        "End of handling diff file: {}",
        path.display()
    );
    Ok(segments)
}
