//! # Test Case Assembler
//!
//! Pairs the extracted test case names with the raw blocks produced by the segmenter and builds the
//! final [`TestCaseRecord`]s.
//!
//! The first raw block is the preamble and is always discarded. Every other block is cleaned
//! (lines trimmed, blank lines and `#...#` banner lines dropped) and carries an embedded name on its
//! post-processing line, which is used as the join key.
//!
//! Assembly fails open: a name without a block, or a block without a name, is logged and recorded
//! as an [`AssemblyMismatch`] while the remaining records are still produced.

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::parsers::name_parser::find_ignore_ascii_case;
use crate::splitter::split_and_classify;
use crate::types::{AssemblyMismatch, TestCaseRecord};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Records in name order plus every non-fatal mismatch found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub records: Vec<TestCaseRecord>,
    pub mismatches: Vec<AssemblyMismatch>,
}

/// A raw block after cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanBlock {
    /// Position in the segmenter output.
    pub index: usize,
    pub embedded_name: String,
    pub raw: String,
}

/// A matched name/block pair waiting to be split and classified.
#[derive(Debug)]
struct PendingRecord {
    position: usize,
    name: String,
    raw: String,
}

/// Clean a raw block and pull out its embedded name.
pub fn clean_block(index: usize, block: &str, config: &DiffConfig) -> CleanBlock {
    let sep = config.separator_char;
    let marker = config.post_processing.as_str();
    let mut embedded_name: Option<String> = None;
    let mut kept: Vec<&str> = Vec::new();

    for line in block.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(sep) && line.ends_with(sep) {
            continue;
        }
        if embedded_name.is_none() && line.contains(marker) {
            embedded_name = Some(line.replace(marker, "").trim().to_string());
            continue;
        }
        kept.push(line);
    }

    CleanBlock {
        index,
        embedded_name: embedded_name.unwrap_or_default(),
        raw: kept.join("\n"),
    }
}

fn names_match_exact(name: &str, embedded: &str) -> bool {
    name.eq_ignore_ascii_case(embedded)
}

fn names_match_containing(name: &str, embedded: &str) -> bool {
    !embedded.is_empty() && find_ignore_ascii_case(name, embedded).is_some()
}

/// Claim the first unclaimed block accepted by `matches`.
fn claim<F>(blocks: &[CleanBlock], claimed: &mut [bool], matches: F) -> Option<usize>
where
    F: Fn(&CleanBlock) -> bool,
{
    let j = blocks
        .iter()
        .enumerate()
        .position(|(j, b)| !claimed[j] && matches(b))?;
    claimed[j] = true;
    Some(j)
}

/// Match names to blocks. Sequential so that block claiming is deterministic.
fn pair(
    names: &[String],
    raw_blocks: &[String],
    config: &DiffConfig,
) -> (Vec<PendingRecord>, Vec<AssemblyMismatch>) {
    let mut mismatches = Vec::new();

    if raw_blocks.len() != names.len() + 1 {
        let mismatch = AssemblyMismatch::BlockCount {
            names: names.len(),
            blocks: raw_blocks.len(),
        };
        warn!("{}", mismatch);
        mismatches.push(mismatch);
    }

    let mut blocks: Vec<CleanBlock> = raw_blocks
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, b)| clean_block(i, b, config))
        .collect();
    let mut claimed = vec![false; blocks.len()];
    let mut matched: Vec<Option<usize>> = vec![None; names.len()];

    // Every exact match is claimed before any containing match.
    for (position, name) in names.iter().enumerate() {
        matched[position] = claim(&blocks, &mut claimed, |b| {
            names_match_exact(name, &b.embedded_name)
        });
    }
    for (position, name) in names.iter().enumerate() {
        if matched[position].is_none() {
            matched[position] = claim(&blocks, &mut claimed, |b| {
                names_match_containing(name, &b.embedded_name)
            });
        }
    }

    let mut pending = Vec::with_capacity(names.len());
    for (position, (name, found)) in names.iter().zip(matched).enumerate() {
        match found {
            Some(j) => pending.push(PendingRecord {
                position,
                name: name.clone(),
                raw: std::mem::take(&mut blocks[j].raw),
            }),
            None => {
                let mismatch = AssemblyMismatch::MissingBlock { name: name.clone() };
                error!("Current handling test case: {name}. {mismatch}");
                mismatches.push(mismatch);
            }
        }
    }

    for (block, _) in blocks.iter().zip(&claimed).filter(|(_, c)| !**c) {
        let mismatch = AssemblyMismatch::UnclaimedBlock {
            index: block.index,
            embedded_name: block.embedded_name.clone(),
        };
        warn!("{}", mismatch);
        mismatches.push(mismatch);
    }

    (pending, mismatches)
}

fn build_record(pending: PendingRecord, config: &DiffConfig) -> TestCaseRecord {
    let split = split_and_classify(&pending.raw, config);
    TestCaseRecord::new(
        pending.name,
        pending.raw,
        split.baseline,
        split.actual,
        split.outcome,
    )
}

/// Assemble records sequentially.
pub fn assemble(names: &[String], raw_blocks: &[String], config: &DiffConfig) -> Assembly {
    let (pending, mismatches) = pair(names, raw_blocks, config);
    let records = pending
        .into_iter()
        .map(|p| build_record(p, config))
        .collect();
    Assembly {
        records,
        mismatches,
    }
}

/// Assemble records with splitting and classification spread over blocking workers.
///
/// Each worker builds into its own vector; results are merged by name position so the output
/// order matches [`assemble`].
pub async fn assemble_concurrent(
    names: Vec<String>,
    raw_blocks: Vec<String>,
    config: Arc<DiffConfig>,
) -> Result<Assembly, DiffError> {
    let pair_config = Arc::clone(&config);
    let (pending, mismatches) =
        tokio::task::spawn_blocking(move || pair(&names, &raw_blocks, &pair_config)).await?;

    let workers = config.assembly_workers.max(1);
    let chunk_size = pending.len().div_ceil(workers).max(1);
    debug!(
        records = pending.len(),
        workers, chunk_size, "assembling records concurrently"
    );

    let mut chunks: Vec<Vec<PendingRecord>> = Vec::new();
    let mut iter = pending.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(chunk_size).collect());
    }

    let handles = chunks.into_iter().map(|chunk| {
        let config = Arc::clone(&config);
        tokio::task::spawn_blocking(move || {
            chunk
                .into_iter()
                .map(|p| (p.position, build_record(p, &config)))
                .collect::<Vec<_>>()
        })
    });

    let mut built: Vec<(usize, TestCaseRecord)> = Vec::new();
    for result in futures::future::join_all(handles).await {
        built.extend(result?);
    }
    built.sort_by_key(|(position, _)| *position);

    Ok(Assembly {
        records: built.into_iter().map(|(_, r)| r).collect(),
        mismatches,
    })
}
