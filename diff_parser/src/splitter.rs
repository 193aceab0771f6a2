//! # Result Splitter
//!
//! Separates one test case block into its baseline and actual variants and classifies the outcome.
//!
//! Lines starting with the plus prefix are dropped from the actual text and lines starting with the
//! minus prefix are dropped from the baseline text. The naming is kept as the downstream
//! viewers expect it: `baseline` still holds the `+` lines, `actual` still holds the `-` lines.

use crate::config::DiffConfig;
use crate::types::Outcome;

/// Baseline/actual texts and outcome of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub baseline: String,
    pub actual: String,
    pub outcome: Outcome,
}

pub fn split_and_classify(raw: &str, config: &DiffConfig) -> SplitResult {
    let (baseline, actual) = split(raw, config);
    SplitResult {
        baseline,
        actual,
        outcome: classify(raw, config),
    }
}

/// Returns `(baseline, actual)`.
pub fn split(raw: &str, config: &DiffConfig) -> (String, String) {
    let lines: Vec<&str> = raw.split('\n').collect();

    let baseline = lines
        .iter()
        .copied()
        .filter(|l| !l.starts_with(config.minus_prefix))
        .collect::<Vec<_>>()
        .join("\n");
    let actual = lines
        .iter()
        .copied()
        .filter(|l| !l.starts_with(config.plus_prefix))
        .collect::<Vec<_>>()
        .join("\n");

    (baseline, actual)
}

/// First match wins: identical marker, then any severe error marker, else different.
pub fn classify(raw: &str, config: &DiffConfig) -> Outcome {
    if raw.contains(config.identical_marker.as_str()) {
        Outcome::Identical
    } else if config
        .severe_error_markers
        .iter()
        .any(|m| raw.contains(m.as_str()))
    {
        Outcome::SevereError
    } else {
        Outcome::Different
    }
}
