use diff_parser::DiffJob;
use diff_parser::assembler::assemble;
use diff_parser::config::DiffConfig;
use diff_parser::error::DiffError;
use diff_parser::parsers::name_parser::extract_names;
use diff_parser::parsers::segmenter::segment;
use diff_parser::splitter::split_and_classify;
use diff_parser::types::{AssemblyMismatch, Outcome};
use std::io::Write;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src/test_files/diff_logs")
        .join(name)
}

/// Builds a log of roughly `target_lines` lines with one preamble marker plus one marker per case.
fn generated_log(cases: usize, target_lines: usize) -> String {
    let mut out = String::new();
    out.push_str("Run header\nValidation Results\n");
    for i in 0..cases {
        out.push_str(&format!("Case_{i:02} completed in {}.0 seconds\n", i + 1));
    }
    out.push_str("End of Summary\nPost Processing...\nloading\n");

    let body_lines = target_lines.saturating_sub(cases + 5) / cases.max(1);
    for i in 0..cases {
        out.push_str(&format!("Post Processing... Case_{i:02}\n"));
        out.push_str("##########\n");
        for j in 0..body_lines.saturating_sub(3) {
            match (i + j) % 4 {
                0 => out.push_str(&format!("-value {j} = {i}\n")),
                1 => out.push_str(&format!("+value {j} = {}\n", i + 1)),
                _ => out.push_str(&format!(" context {j}\n")),
            }
        }
        if i % 7 == 0 {
            out.push_str("Files are identical\n");
        } else if i % 11 == 0 {
            out.push_str("SEVERE ERROR: solver diverged\n");
        } else {
            out.push_str("Files differ\n");
        }
    }
    out
}

#[test]
fn empty_summary_yields_no_records() {
    let config = DiffConfig::default_config();
    let segments = segment(["Validation Results", "End of Summary"], &config).unwrap();
    let names = extract_names(&segments.names_block, &config).unwrap();
    assert!(names.is_empty());
    let assembly = assemble(&names, &segments.raw_blocks, &config);
    assert!(assembly.records.is_empty());
    assert!(assembly.mismatches.is_empty());
}

#[test]
fn missing_header_is_malformed() {
    let config = DiffConfig::default_config();
    let result = segment(["Run header", "End of Summary", "Post Processing..."], &config);
    assert!(matches!(result, Err(DiffError::MalformedLog(_))));
}

#[test]
fn split_example_block() {
    let result = split_and_classify("+alpha\n-beta\nare identical", &DiffConfig::default_config());
    assert_eq!(result.baseline, "+alpha\nare identical");
    assert_eq!(result.actual, "-beta\nare identical");
    assert_eq!(result.outcome, Outcome::Identical);
}

#[test]
fn missing_file_marker_is_severe() {
    let result = split_and_classify(
        "diff: case.out: No such file or directory",
        &DiffConfig::default_config(),
    );
    assert_eq!(result.outcome, Outcome::SevereError);
}

#[test]
fn large_log_matches_every_name() {
    let config = DiffConfig::default_config();
    let log = generated_log(49, 10_000);
    let line_count = log.lines().count();
    assert!(line_count > 9_000, "generated {line_count} lines");

    let segments = segment(log.lines(), &config).unwrap();
    let names = extract_names(&segments.names_block, &config).unwrap();
    assert_eq!(names.len(), 49);
    assert_eq!(segments.raw_blocks.len(), names.len() + 1);

    let assembly = assemble(&names, &segments.raw_blocks, &config);
    assert!(assembly.mismatches.is_empty(), "{:?}", assembly.mismatches);
    assert_eq!(assembly.records.len(), 49);
    for (record, name) in assembly.records.iter().zip(&names) {
        assert_eq!(record.name(), name);
        assert!(record.actual_text().split('\n').all(|l| !l.starts_with('+')));
        assert!(record.baseline_text().split('\n').all(|l| !l.starts_with('-')));
    }
    assert_eq!(assembly.records[0].outcome(), Outcome::Identical);
    assert_eq!(assembly.records[11].outcome(), Outcome::SevereError);
    assert_eq!(assembly.records[1].outcome(), Outcome::Different);
}

#[test]
fn segmentation_is_idempotent() {
    let config = DiffConfig::default_config();
    let log = generated_log(5, 200);
    let first = segment(log.lines(), &config).unwrap();
    let second = segment(log.lines(), &config).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn job_reports_missing_blocks_without_failing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "Validation Results\nA completed in 1 s\nB completed in 2 s\nEnd of Summary\n\
         Post Processing...\nPost Processing... A\nare identical\n"
    )
    .unwrap();
    file.flush().unwrap();

    let report = DiffJob::new(file.path().to_path_buf(), DiffConfig::default_config())
        .unwrap()
        .handle()
        .await
        .unwrap();
    assert_eq!(report.test_cases.len(), 1);
    assert_eq!(report.test_cases[0].name(), "A");
    assert!(report.mismatches.contains(&AssemblyMismatch::BlockCount {
        names: 2,
        blocks: 2
    }));
    assert!(report.mismatches.contains(&AssemblyMismatch::MissingBlock {
        name: "B".to_string()
    }));
}

#[tokio::test]
async fn job_fails_without_footer() {
    let job = DiffJob::new(fixture("no_footer.dif"), DiffConfig::default_config()).unwrap();
    match job.handle().await {
        Err(DiffError::MalformedLog(msg)) => assert!(msg.contains("End of Summary")),
        other => panic!("Expected MalformedLog, got: {:?}", other.map(|r| r.counts)),
    }
}

#[tokio::test]
async fn job_with_config_file() {
    let config = DiffConfig::load(&fixture("diff_config.json")).unwrap();
    assert_eq!(config.assembly_workers, 2);
    let report = DiffJob::new(fixture("basic.dif"), config)
        .unwrap()
        .handle()
        .await
        .unwrap();
    assert_eq!(report.counts.total(), 3);
}

#[tokio::test]
async fn job_on_empty_summary_log() {
    let report = DiffJob::new(fixture("empty_summary.dif"), DiffConfig::default_config())
        .unwrap()
        .handle()
        .await
        .unwrap();
    assert!(report.is_empty());
    assert!(report.mismatches.is_empty());
}
