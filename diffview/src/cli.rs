use clap::{Parser, ValueEnum};
use diff_parser::report::ReportFormat;
use diff_parser::types::Outcome;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Full,
    Minimal,
}

impl From<OutputFormat> for ReportFormat {
    fn from(fmt: OutputFormat) -> Self {
        match fmt {
            OutputFormat::Full => ReportFormat::Full,
            OutputFormat::Minimal => ReportFormat::Minimal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeArg {
    Identical,
    Different,
    SevereError,
}

impl From<OutcomeArg> for Outcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Identical => Outcome::Identical,
            OutcomeArg::Different => Outcome::Different,
            OutcomeArg::SevereError => Outcome::SevereError,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Parse a simulation diff log and report per-test-case outcomes")]
pub struct Args {
    /// The diff log to process
    pub file: PathBuf,
    /// Parser configuration JSON (overrides DIFF_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output format: full (with raw/baseline/actual text) or minimal
    #[arg(long, value_enum, default_value_t = OutputFormat::Full)]
    pub format: OutputFormat,
    /// Output JSON path. Defaults to "diff_report.json"
    #[arg(long, default_value = "diff_report.json")]
    pub out: PathBuf,
    /// Keep only test cases whose name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,
    /// Keep only test cases with this outcome
    #[arg(long, value_enum)]
    pub outcome: Option<OutcomeArg>,
    /// Write identical test case names to this .lst file
    #[arg(long)]
    pub passed_lst: Option<PathBuf>,
    /// Write non-identical test case names to this .lst file
    #[arg(long)]
    pub failed_lst: Option<PathBuf>,
    /// Write both name lists into EXPORT_DIR with generated file names
    #[arg(long)]
    pub export_lists: bool,
    /// Test area recorded in the report metadata
    #[arg(long)]
    pub area: Option<String>,
    /// Media number recorded in the report metadata
    #[arg(long)]
    pub media: Option<String>,
    /// Version number recorded in the report metadata
    #[arg(long)]
    pub version_tested: Option<String>,
    /// Do not print the JSON report to stdout
    #[arg(long)]
    pub quiet: bool,
}
