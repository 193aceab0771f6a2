//! # Diff Report Module
//!
//! The result of processing one diff log: ordered test case records, per-outcome counts for the
//! bar chart, shared run metadata, and the non-fatal assembly mismatches.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Diff processed.",
//!   "data": {
//!     "source": "run_0412.dif",
//!     "share": { "area": "Solver", "media": null, "version": "42", "time": "2026-10-18 09:12:44" },
//!     "counts": { "identical": 48, "different": 1, "severe_error": 0 },
//!     "raw_size_sum_kb": 12.5,
//!     "test_cases": [ { "name": "Case_A", "outcome": "identical", "raw_size_kb": 0.2 } ],
//!     "mismatches": []
//!   }
//! }
//! ```
//!
//! `full` output carries the raw, baseline and actual text of every record; `minimal` output only
//! the name, outcome and size.

use crate::error::DiffError;
use crate::types::{AssemblyMismatch, Outcome, OutcomeCounts, TestCaseRecord, TestCaseShare, round2};
use crate::utilities::file_writer::write_name_list;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Full,
    Minimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    /// Path of the processed diff log.
    pub source: String,
    pub share: TestCaseShare,
    pub counts: OutcomeCounts,
    pub raw_size_sum_kb: f64,
    pub test_cases: Vec<TestCaseRecord>,
    pub mismatches: Vec<AssemblyMismatch>,
}

#[derive(Debug, Serialize)]
struct RecordSummary<'a> {
    name: &'a str,
    outcome: Outcome,
    raw_size_kb: f64,
}

#[derive(Debug, Serialize)]
struct MinimalReport<'a> {
    source: &'a str,
    share: &'a TestCaseShare,
    counts: OutcomeCounts,
    raw_size_sum_kb: f64,
    test_cases: Vec<RecordSummary<'a>>,
    mismatches: &'a [AssemblyMismatch],
}

/// Response envelope matching the rest of the tooling's JSON output.
#[derive(Debug, Serialize)]
pub struct DiffReportResponse<T: Serialize> {
    success: bool,
    message: String,
    data: T,
}

impl<T: Serialize> DiffReportResponse<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            message: "Diff processed.".to_string(),
            data,
        }
    }
}

impl DiffReport {
    pub fn new(
        source: String,
        share: TestCaseShare,
        test_cases: Vec<TestCaseRecord>,
        mismatches: Vec<AssemblyMismatch>,
    ) -> Self {
        let counts = OutcomeCounts::from_records(&test_cases);
        let raw_size_sum_kb = round2(test_cases.iter().map(|t| t.raw_size_kb()).sum());
        Self {
            source,
            share,
            counts,
            raw_size_sum_kb,
            test_cases,
            mismatches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }

    /// 1-based display indexes of the records.
    pub fn indexes(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.test_cases.len()
    }

    pub fn find(&self, name: &str) -> Option<&TestCaseRecord> {
        self.test_cases.iter().find(|t| t.name() == name)
    }

    /// Records whose name contains `query`, ignoring ASCII case. An empty query matches all.
    pub fn filter_by_name<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a TestCaseRecord> + 'a {
        let query = query.trim().to_ascii_lowercase();
        self.test_cases
            .iter()
            .filter(move |t| query.is_empty() || t.name().to_ascii_lowercase().contains(&query))
    }

    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &TestCaseRecord> + '_ {
        self.test_cases.iter().filter(move |t| t.outcome() == outcome)
    }

    pub fn identical_names(&self) -> Vec<&str> {
        self.with_outcome(Outcome::Identical).map(|t| t.name()).collect()
    }

    /// Names of every record that is not identical (different or severe error).
    pub fn non_identical_names(&self) -> Vec<&str> {
        self.test_cases
            .iter()
            .filter(|t| !t.is_identical())
            .map(|t| t.name())
            .collect()
    }

    /// Write the identical test case names, one per line.
    pub async fn export_passed_lst(&self, path: &Path) -> Result<usize, DiffError> {
        write_name_list(path, self.identical_names()).await
    }

    /// Write the non-identical test case names, one per line.
    pub async fn export_failed_lst(&self, path: &Path) -> Result<usize, DiffError> {
        write_name_list(path, self.non_identical_names()).await
    }

    pub fn to_json(&self, format: ReportFormat) -> Result<String, DiffError> {
        let json = match format {
            ReportFormat::Full => serde_json::to_string_pretty(&DiffReportResponse::new(self))?,
            ReportFormat::Minimal => {
                let minimal = MinimalReport {
                    source: &self.source,
                    share: &self.share,
                    counts: self.counts,
                    raw_size_sum_kb: self.raw_size_sum_kb,
                    test_cases: self
                        .test_cases
                        .iter()
                        .map(|t| RecordSummary {
                            name: t.name(),
                            outcome: t.outcome(),
                            raw_size_kb: t.raw_size_kb(),
                        })
                        .collect(),
                    mismatches: &self.mismatches,
                };
                serde_json::to_string_pretty(&DiffReportResponse::new(minimal))?
            }
        };
        Ok(json)
    }
}
