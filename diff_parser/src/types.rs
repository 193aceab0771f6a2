//! # Types Module
//!
//! Core data structures produced by the diff parser and consumed by presentation and export code.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

/// Outcome of one test case, derived from marker substrings in its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Identical,
    Different,
    SevereError,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Identical => "identical",
            Outcome::Different => "different",
            Outcome::SevereError => "severe_error",
        };
        f.write_str(s)
    }
}

/// A finalized test case record.
///
/// Fields are set once during assembly and exposed read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCaseRecord {
    name: String,
    raw: String,
    baseline_text: String,
    actual_text: String,
    outcome: Outcome,
    raw_size_kb: f64,
}

/// Bytes added on top of the UTF-8 payload when sizing a record: CRLF terminator plus file header.
const RAW_SIZE_OVERHEAD: usize = 2 + 4;

impl TestCaseRecord {
    pub(crate) fn new(
        name: String,
        raw: String,
        baseline_text: String,
        actual_text: String,
        outcome: Outcome,
    ) -> Self {
        let raw_size_kb = raw_size_kb(&raw);
        Self {
            name,
            raw,
            baseline_text,
            actual_text,
            outcome,
            raw_size_kb,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Block text with every line starting with the minus prefix removed.
    pub fn baseline_text(&self) -> &str {
        &self.baseline_text
    }

    /// Block text with every line starting with the plus prefix removed.
    pub fn actual_text(&self) -> &str {
        &self.actual_text
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn raw_size_kb(&self) -> f64 {
        self.raw_size_kb
    }

    pub fn is_identical(&self) -> bool {
        self.outcome == Outcome::Identical
    }
}

/// Size of `raw` in KiB as it would be saved to disk, rounded to two decimals.
pub fn raw_size_kb(raw: &str) -> f64 {
    let size = raw.len() + RAW_SIZE_OVERHEAD;
    round2(size as f64 / 1024.0)
}

#[inline]
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Per-outcome totals for a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub identical: usize,
    pub different: usize,
    pub severe_error: usize,
}

impl OutcomeCounts {
    pub fn from_records(records: &[TestCaseRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            match r.outcome() {
                Outcome::Identical => acc.identical += 1,
                Outcome::Different => acc.different += 1,
                Outcome::SevereError => acc.severe_error += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.identical + self.different + self.severe_error
    }

    /// Counts in bar-chart order: identical, different, severe error.
    pub fn as_array(&self) -> [usize; 3] {
        [self.identical, self.different, self.severe_error]
    }
}

/// Run metadata shared by every record of one diff log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestCaseShare {
    pub area: Option<String>,
    pub media: Option<String>,
    pub version: Option<String>,
    pub time: Option<String>,
}

impl TestCaseShare {
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = Some(time.format("%Y-%m-%d %H:%M:%S").to_string());
        self
    }

    pub fn version_tested(&self) -> Option<i32> {
        self.version.as_deref().and_then(|v| v.trim().parse().ok())
    }

    pub fn media_tested(&self) -> Option<i32> {
        self.media.as_deref().and_then(|m| m.trim().parse().ok())
    }
}

/// A non-fatal problem found while pairing names with raw blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssemblyMismatch {
    /// The block count is not one more than the name count.
    BlockCount { names: usize, blocks: usize },
    /// No raw block could be found for this name.
    MissingBlock { name: String },
    /// A raw block whose embedded name matched no extracted name.
    UnclaimedBlock { index: usize, embedded_name: String },
}

impl fmt::Display for AssemblyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyMismatch::BlockCount { names, blocks } => write!(
                f,
                "expected {} raw blocks for {} names, found {}",
                names + 1,
                names,
                blocks
            ),
            AssemblyMismatch::MissingBlock { name } => {
                write!(f, "no raw block found for test case `{name}`")
            }
            AssemblyMismatch::UnclaimedBlock {
                index,
                embedded_name,
            } => write!(
                f,
                "raw block #{index} (`{embedded_name}`) matched no test case name"
            ),
        }
    }
}
