//! Parser configuration.
//!
//! [`DiffConfig`] carries every sentinel literal and tunable the parser relies on. It is built once
//! by the caller and passed explicitly into each entry point; nothing in this crate reads global
//! state. Every field has a serde default so partial JSON documents are accepted.

use crate::error::DiffError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maximum size accepted for a configuration file.
const MAX_CONFIG_SIZE: u64 = 256 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DiffConfig {
    /// Line fragment that opens the validation summary.
    #[serde(default = "default_validation_header")]
    pub validation_header: String,

    /// Line fragment that closes the validation summary.
    #[serde(default = "default_end_of_summary")]
    pub end_of_summary: String,

    /// Marker line that starts each per-test-case block.
    #[serde(default = "default_post_processing")]
    pub post_processing: String,

    /// Suffix marker on summary lines; the test case name precedes it.
    #[serde(default = "default_completed_in")]
    pub completed_in: String,

    #[serde(default = "default_identical_marker")]
    pub identical_marker: String,

    /// Any of these in a block classifies it as a severe error.
    #[serde(default = "default_severe_error_markers")]
    pub severe_error_markers: Vec<String>,

    #[serde(default = "default_plus_prefix")]
    pub plus_prefix: char,

    #[serde(default = "default_minus_prefix")]
    pub minus_prefix: char,

    /// Lines starting and ending with this char are banner separators.
    #[serde(default = "default_separator_char")]
    pub separator_char: char,

    /// Number of blocking workers used for concurrent assembly. `1` keeps it sequential.
    #[serde(default = "default_assembly_workers")]
    pub assembly_workers: usize,
}

fn default_validation_header() -> String {
    "Validation Results".to_string()
}

fn default_end_of_summary() -> String {
    "End of Summary".to_string()
}

fn default_post_processing() -> String {
    "Post Processing...".to_string()
}

fn default_completed_in() -> String {
    " completed in ".to_string()
}

fn default_identical_marker() -> String {
    "are identical".to_string()
}

fn default_severe_error_markers() -> Vec<String> {
    vec![
        "No such file or directory".to_string(),
        "SEVERE ERROR".to_string(),
        "No dump file".to_string(),
    ]
}

fn default_plus_prefix() -> char {
    '+'
}

fn default_minus_prefix() -> char {
    '-'
}

fn default_separator_char() -> char {
    '#'
}

fn default_assembly_workers() -> usize {
    4
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            validation_header: default_validation_header(),
            end_of_summary: default_end_of_summary(),
            post_processing: default_post_processing(),
            completed_in: default_completed_in(),
            identical_marker: default_identical_marker(),
            severe_error_markers: default_severe_error_markers(),
            plus_prefix: default_plus_prefix(),
            minus_prefix: default_minus_prefix(),
            separator_char: default_separator_char(),
            assembly_workers: default_assembly_workers(),
        }
    }
}

impl DiffConfig {
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON, filling missing fields with defaults, and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, DiffError> {
        let config: DiffConfig = serde_json::from_str(json)
            .map_err(|e| DiffError::InvalidConfig(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, DiffError> {
        let metadata = fs::metadata(path).map_err(|e| {
            DiffError::InvalidConfig(format!("Cannot read config {}: {e}", path.display()))
        })?;
        if metadata.len() > MAX_CONFIG_SIZE {
            return Err(DiffError::InvalidConfig(format!(
                "Config file too large: {} ({} bytes, max {} bytes)",
                path.display(),
                metadata.len(),
                MAX_CONFIG_SIZE
            )));
        }
        let raw = fs::read_to_string(path).map_err(|e| {
            DiffError::InvalidConfig(format!("Cannot read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations whose empty sentinels would match every line.
    pub fn validate(&self) -> Result<(), DiffError> {
        let sentinels = [
            ("validation_header", &self.validation_header),
            ("end_of_summary", &self.end_of_summary),
            ("post_processing", &self.post_processing),
            ("completed_in", &self.completed_in),
            ("identical_marker", &self.identical_marker),
        ];
        for (field, value) in sentinels {
            if value.is_empty() {
                return Err(DiffError::InvalidConfig(format!("`{field}` must not be empty")));
            }
        }
        if self.severe_error_markers.iter().any(|m| m.is_empty()) {
            return Err(DiffError::InvalidConfig(
                "`severe_error_markers` must not contain empty entries".to_string(),
            ));
        }
        if self.plus_prefix == self.minus_prefix {
            return Err(DiffError::InvalidConfig(
                "`plus_prefix` and `minus_prefix` must differ".to_string(),
            ));
        }
        if self.assembly_workers == 0 {
            return Err(DiffError::InvalidConfig(
                "`assembly_workers` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
