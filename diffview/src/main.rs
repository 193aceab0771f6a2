mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use diff_parser::DiffJob;
use diff_parser::config::DiffConfig;
use diff_parser::report::DiffReport;
use diff_parser::types::{Outcome, TestCaseShare};
use diff_parser::utilities::file_writer::write_text;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use util::config;
use util::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let _log_guard = init_logging(
        &config::log_dir(),
        &config::log_file(),
        &config::log_level(),
        config::log_to_stdout(),
    );

    run(args).await
}

async fn run(args: cli::Args) -> Result<()> {
    let diff_config = load_diff_config(args.config.as_deref())?;

    let share = TestCaseShare {
        area: args.area.clone(),
        media: args.media.clone(),
        version: args.version_tested.clone(),
        time: None,
    };

    info!("Imported diff file: {}", args.file.display());
    let report = DiffJob::new(args.file.clone(), diff_config)
        .with_context(|| format!("opening {}", args.file.display()))?
        .with_share(share)
        .handle()
        .await
        .with_context(|| format!("processing {}", args.file.display()))?;

    for mismatch in &report.mismatches {
        warn!("{}", mismatch);
    }

    let view = select(&report, args.filter.as_deref(), args.outcome.map(Outcome::from));
    let json = view
        .to_json(args.format.into())
        .context("serializing report")?;

    if !args.quiet {
        println!("{json}");
    }

    write_text(&args.out, &json)
        .await
        .with_context(|| format!("writing {}", args.out.display()))?;
    eprintln!("Saved report to {}", args.out.display());

    export_lists(&args, &report).await?;

    let counts = report.counts;
    eprintln!(
        "identical: {}  different: {}  severe error: {}  (skipped: {})",
        counts.identical,
        counts.different,
        counts.severe_error,
        report.mismatches.len()
    );
    Ok(())
}

/// `--config` wins over `DIFF_CONFIG`; otherwise built-in defaults.
fn load_diff_config(cli_path: Option<&Path>) -> Result<DiffConfig> {
    let path = cli_path.map(Path::to_path_buf).or_else(config::diff_config_path);
    match path {
        Some(path) => DiffConfig::load(&path)
            .with_context(|| format!("loading diff config {}", path.display())),
        None => Ok(DiffConfig::default_config()),
    }
}

/// Narrow the report to the requested name filter and outcome.
fn select(report: &DiffReport, filter: Option<&str>, outcome: Option<Outcome>) -> DiffReport {
    if filter.is_none() && outcome.is_none() {
        return report.clone();
    }
    let records = report
        .filter_by_name(filter.unwrap_or(""))
        .filter(|t| outcome.is_none_or(|o| t.outcome() == o))
        .cloned()
        .collect();
    DiffReport::new(
        report.source.clone(),
        report.share.clone(),
        records,
        report.mismatches.clone(),
    )
}

/// `P_<stem>_<MM_dd_yy_HH>.lst` style name for generated exports.
fn export_file_name(prefix: &str, source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "diff".to_string());
    format!("{prefix}_{stem}_{}.lst", Local::now().format("%m_%d_%y_%H"))
}

async fn export_lists(args: &cli::Args, report: &DiffReport) -> Result<()> {
    let mut passed: Vec<PathBuf> = args.passed_lst.iter().cloned().collect();
    let mut failed: Vec<PathBuf> = args.failed_lst.iter().cloned().collect();
    if args.export_lists {
        let dir = config::export_dir();
        passed.push(dir.join(export_file_name("P", &args.file)));
        failed.push(dir.join(export_file_name("F", &args.file)));
    }

    for path in passed {
        let n = report
            .export_passed_lst(&path)
            .await
            .with_context(|| format!("exporting identical names to {}", path.display()))?;
        eprintln!("Exported {n} identical test case(s) to {}", path.display());
    }
    for path in failed {
        let n = report
            .export_failed_lst(&path)
            .await
            .with_context(|| format!("exporting non-identical names to {}", path.display()))?;
        eprintln!("Exported {n} non-identical test case(s) to {}", path.display());
    }
    Ok(())
}
