//! # Diff Parser Library
//!
//! Core logic for reading simulation test-run diff logs and turning them into classified test case
//! records.
//!
//! ## Pipeline
//! 1. [`parsers::segmenter`] streams the log and splits it into the validation-summary names block
//!    and one raw block per test case.
//! 2. [`parsers::name_parser`] extracts the ordered test case names from the names block.
//! 3. [`assembler`] pairs names with raw blocks, and [`splitter`] derives the baseline/actual
//!    texts and the [`types::Outcome`] of every pair.
//! 4. [`report::DiffReport`] aggregates records, outcome counts and assembly mismatches.
//!
//! ## Key Concepts
//! - **DiffJob**: processes one diff log file end to end.
//! - **DiffConfig**: every sentinel literal, passed explicitly into each stage.

pub mod assembler;
pub mod config;
pub mod error;
pub mod parsers;
pub mod report;
pub mod splitter;
pub mod traits;
pub mod types;
pub mod utilities;

use crate::assembler::{Assembly, assemble, assemble_concurrent};
use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::parsers::name_parser::extract_names;
use crate::report::DiffReport;
use crate::types::TestCaseShare;
use crate::utilities::file_loader::{check_file, load_segments, modified_time};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};

/// Read-only view of a job's "process over" flag.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    done: Arc<AtomicBool>,
}

impl ProgressHandle {
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Returns [`DiffError::NotProcessed`] until the job has finished.
    pub fn check_process_over(&self) -> Result<(), DiffError> {
        if self.is_done() {
            Ok(())
        } else {
            error!("Haven't loaded and processed the diff data first");
            Err(DiffError::NotProcessed)
        }
    }
}

/// Processes one diff log file.
///
/// # Fields
/// - `diff_path`: Path to the diff log.
/// - `config`: Sentinels and assembly settings.
/// - `share`: Run metadata copied onto the report.
pub struct DiffJob {
    diff_path: PathBuf,
    config: Arc<DiffConfig>,
    share: TestCaseShare,
    done: Arc<AtomicBool>,
}

impl DiffJob {
    /// Create a job for `diff_path`.
    ///
    /// # Errors
    /// [`DiffError::Io`] if the path is not a readable file, [`DiffError::InvalidConfig`] if
    /// `config` fails validation.
    pub fn new(diff_path: PathBuf, config: DiffConfig) -> Result<Self, DiffError> {
        check_file(&diff_path)?;
        config.validate()?;
        let share = match modified_time(&diff_path) {
            Some(time) => TestCaseShare::default().with_time(time),
            None => TestCaseShare::default(),
        };
        Ok(Self {
            diff_path,
            config: Arc::new(config),
            share,
            done: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Attach run metadata. A `time` already derived from the file is kept unless `share` sets one.
    pub fn with_share(mut self, share: TestCaseShare) -> Self {
        let time = share.time.clone().or(self.share.time.take());
        self.share = TestCaseShare { time, ..share };
        self
    }

    pub fn progress(&self) -> ProgressHandle {
        ProgressHandle {
            done: Arc::clone(&self.done),
        }
    }

    /// Run the full pipeline and build the report.
    ///
    /// # Steps
    /// 1. Streams and segments the file on a blocking worker.
    /// 2. Extracts the test case names.
    /// 3. Assembles records, concurrently when `assembly_workers > 1`.
    /// 4. Sets the process-over flag and returns the report.
    pub async fn handle(self) -> Result<DiffReport, DiffError> {
        let path = self.diff_path.clone();
        let config = Arc::clone(&self.config);

        let (names, raw_blocks) = tokio::task::spawn_blocking(move || {
            let segments = load_segments(&path, &config)?;
            let names = extract_names(&segments.names_block, &config)?;
            Ok::<_, DiffError>((names, segments.raw_blocks))
        })
        .await?
        .inspect_err(|e| error!("DiffJob failed for {}: {}", self.diff_path.display(), e))?;

        info!(
            names = names.len(),
            blocks = raw_blocks.len(),
            "diff file segmented"
        );

        let Assembly {
            records,
            mismatches,
        } = if self.config.assembly_workers > 1 {
            assemble_concurrent(names, raw_blocks, Arc::clone(&self.config)).await?
        } else {
            let config = Arc::clone(&self.config);
            tokio::task::spawn_blocking(move || assemble(&names, &raw_blocks, &config)).await?
        };

        let report = DiffReport::new(
            self.diff_path.display().to_string(),
            self.share,
            records,
            mismatches,
        );
        self.done.store(true, Ordering::Release);
        info!(
            identical = report.counts.identical,
            different = report.counts.different,
            severe_error = report.counts.severe_error,
            mismatches = report.mismatches.len(),
            "diff processing complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use std::path::Path;

    const CASE_DIR: &str = "src/test_files/diff_logs";

    fn case(name: &str) -> PathBuf {
        Path::new(CASE_DIR).join(name)
    }

    #[tokio::test]
    async fn test_diff_job_happy_path() {
        let job = DiffJob::new(case("basic.dif"), DiffConfig::default_config()).unwrap();
        let progress = job.progress();
        assert!(!progress.is_done());
        assert!(matches!(
            progress.check_process_over(),
            Err(DiffError::NotProcessed)
        ));

        let report = job.handle().await.unwrap();
        assert!(progress.is_done());
        assert!(progress.check_process_over().is_ok());

        assert_eq!(report.test_cases.len(), 3);
        assert!(report.mismatches.is_empty(), "{:?}", report.mismatches);
        assert_eq!(report.counts.as_array(), [1, 1, 1]);

        let names: Vec<&str> = report.test_cases.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Beam_Static", "Beam_Modal", "Shell_Buckling"]);

        let modal = report.find("Beam_Modal").unwrap();
        assert_eq!(modal.outcome(), Outcome::Different);
        assert!(modal.baseline_text().contains("+Frequency 1 = 12.50"));
        assert!(!modal.baseline_text().contains("-Frequency 1 = 12.45"));
        assert!(modal.actual_text().contains("-Frequency 1 = 12.45"));
        assert!(!modal.actual_text().contains("+Frequency 1 = 12.50"));
        assert!(!modal.raw().contains('#'));

        assert!(report.share.time.is_some());
    }

    #[tokio::test]
    async fn test_diff_job_sequential_matches_concurrent() {
        let sequential = DiffJob::new(
            case("basic.dif"),
            DiffConfig {
                assembly_workers: 1,
                ..DiffConfig::default_config()
            },
        )
        .unwrap()
        .handle()
        .await
        .unwrap();
        let concurrent = DiffJob::new(case("basic.dif"), DiffConfig::default_config())
            .unwrap()
            .handle()
            .await
            .unwrap();
        assert_eq!(sequential.test_cases, concurrent.test_cases);
        assert_eq!(sequential.counts, concurrent.counts);
    }

    #[test]
    fn test_diff_job_missing_file() {
        let result = DiffJob::new(case("missing.dif"), DiffConfig::default_config());
        assert!(matches!(result, Err(DiffError::Io(_))));
    }

    #[test]
    fn test_diff_job_invalid_config() {
        let config = DiffConfig {
            end_of_summary: String::new(),
            ..DiffConfig::default_config()
        };
        assert!(matches!(
            DiffJob::new(case("basic.dif"), config),
            Err(DiffError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_diff_job_malformed_log_leaves_flag_unset() {
        let job = DiffJob::new(case("no_header.dif"), DiffConfig::default_config()).unwrap();
        let progress = job.progress();
        let result = job.handle().await;
        assert!(matches!(result, Err(DiffError::MalformedLog(_))));
        assert!(!progress.is_done());
    }

    #[tokio::test]
    async fn test_with_share_keeps_file_time() {
        let job = DiffJob::new(case("basic.dif"), DiffConfig::default_config())
            .unwrap()
            .with_share(TestCaseShare {
                area: Some("Structures".to_string()),
                version: Some("42".to_string()),
                ..Default::default()
            });
        let report = job.handle().await.unwrap();
        assert_eq!(report.share.area.as_deref(), Some("Structures"));
        assert_eq!(report.share.version_tested(), Some(42));
        assert!(report.share.time.is_some());
    }
}
