//!
//! Name Parser Module
//!
//! Extracts the ordered list of test case names from the names block captured by the segmenter.
//! Each summary line of interest looks like `Some_Case completed in 12.3 seconds`; the name is
//! everything before the `completed_in` marker.

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::traits::parser::Parser;

pub struct NameParser;

impl<'a> Parser<&'a str, Vec<String>> for NameParser {
    fn parse(&self, input: &'a str, config: &DiffConfig) -> Result<Vec<String>, DiffError> {
        extract_names(input, config)
    }
}

/// Extract test case names in the order they appear.
///
/// Lines are trimmed and empty lines dropped. A line contributes a name only when it contains the
/// marker verbatim; the name ends at the first case-insensitive occurrence of the marker.
///
/// # Errors
///
/// [`DiffError::EmptyNamesBlock`] if `names_block` is empty.
pub fn extract_names(names_block: &str, config: &DiffConfig) -> Result<Vec<String>, DiffError> {
    if names_block.is_empty() {
        return Err(DiffError::EmptyNamesBlock);
    }

    let marker = config.completed_in.as_str();
    let names = names_block
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.contains(marker))
        .filter_map(|line| find_ignore_ascii_case(line, marker).map(|idx| line[..idx].to_string()))
        .collect();

    Ok(names)
}

/// Byte index of the first ASCII-case-insensitive occurrence of `needle` in `haystack`.
pub(crate) fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() {
        return Some(0);
    }
    if n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
