//!
//! Log Segmenter Module
//!
//! Streams a diff log line by line and partitions it into the validation-summary names block and
//! one raw block per test case.
//!
//! # Structure of a diff log
//!
//! ```text
//! ... anything ...
//! Validation Results            <- header sentinel
//! Case_A completed in 1.2 s
//! Case_B completed in 0.4 s
//! End of Summary                <- footer sentinel, names block ends here (inclusive)
//! ... discarded ...
//! Post Processing...            <- preamble block
//! Post Processing... Case_A     <- one block per test case
//! ...
//! ```
//!
//! The segmenter is an explicit state machine. [`SegmenterState::step`] is a pure transition
//! function returning the next state and the buffer action to apply; [`LogSegmenter`] owns the
//! buffer and applies those actions.
//!
//! # Error Handling
//!
//! Returns [`DiffError::MalformedLog`] when the footer appears before the header or when the input
//! ends without a footer.

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::traits::parser::Parser;
use tracing::debug;

/// Segmenter position in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    SeekingHeader,
    SeekingFooter,
    /// Past the summary. `in_block` is true once the first post-processing marker was seen.
    Segmenting { in_block: bool },
}

/// What the segmenter does with its buffer for the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    /// Append the line to the buffer.
    Accumulate,
    /// Append the line, then move the buffer into the names block.
    CaptureNames,
    /// Capture the names block, then start the first raw block with this line.
    CaptureNamesAndStartBlock,
    /// Reset the buffer to just this line.
    StartFirstBlock,
    /// Emit the buffer as a raw block, then restart it with this line.
    EmitAndStartBlock,
}

impl SegmenterState {
    /// Compute the transition for one input line.
    ///
    /// # Errors
    ///
    /// [`DiffError::MalformedLog`] if the footer sentinel is found before the header sentinel.
    pub fn step(
        self,
        line: &str,
        config: &DiffConfig,
    ) -> Result<(SegmenterState, SegmentAction), DiffError> {
        match self {
            SegmenterState::SeekingHeader => {
                let header = line.contains(config.validation_header.as_str());
                if line.contains(config.end_of_summary.as_str()) {
                    if !header {
                        return Err(DiffError::MalformedLog(format!(
                            "`{}` found before `{}`",
                            config.end_of_summary, config.validation_header
                        )));
                    }
                    return Ok(Self::after_footer(line, config));
                }
                if header {
                    Ok((SegmenterState::SeekingFooter, SegmentAction::Accumulate))
                } else {
                    Ok((SegmenterState::SeekingHeader, SegmentAction::Accumulate))
                }
            }
            SegmenterState::SeekingFooter => {
                if line.contains(config.end_of_summary.as_str()) {
                    Ok(Self::after_footer(line, config))
                } else {
                    Ok((SegmenterState::SeekingFooter, SegmentAction::Accumulate))
                }
            }
            SegmenterState::Segmenting { in_block } => {
                if !line.contains(config.post_processing.as_str()) {
                    return Ok((self, SegmentAction::Accumulate));
                }
                let action = if in_block {
                    SegmentAction::EmitAndStartBlock
                } else {
                    SegmentAction::StartFirstBlock
                };
                Ok((SegmenterState::Segmenting { in_block: true }, action))
            }
        }
    }

    fn after_footer(line: &str, config: &DiffConfig) -> (SegmenterState, SegmentAction) {
        if line.contains(config.post_processing.as_str()) {
            (
                SegmenterState::Segmenting { in_block: true },
                SegmentAction::CaptureNamesAndStartBlock,
            )
        } else {
            (
                SegmenterState::Segmenting { in_block: false },
                SegmentAction::CaptureNames,
            )
        }
    }
}

/// Output of a completed segmentation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    /// Every line from the start of the log through the footer line, newline-terminated.
    pub names_block: String,
    /// Raw per-test-case blocks; the first is the preamble.
    pub raw_blocks: Vec<String>,
}

/// Streaming, single-pass segmenter.
pub struct LogSegmenter<'c> {
    config: &'c DiffConfig,
    state: SegmenterState,
    buffer: String,
    names_block: Option<String>,
    raw_blocks: Vec<String>,
    lines_seen: usize,
}

impl<'c> LogSegmenter<'c> {
    pub fn new(config: &'c DiffConfig) -> Self {
        Self {
            config,
            state: SegmenterState::SeekingHeader,
            buffer: String::new(),
            names_block: None,
            raw_blocks: Vec::new(),
            lines_seen: 0,
        }
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Feed the next line (without its terminator).
    pub fn push_line(&mut self, line: &str) -> Result<(), DiffError> {
        self.lines_seen += 1;
        let (next, action) = self.state.step(line, self.config).map_err(|e| match e {
            DiffError::MalformedLog(msg) => {
                DiffError::MalformedLog(format!("{msg} (line {})", self.lines_seen))
            }
            other => other,
        })?;

        if self.state == SegmenterState::SeekingHeader && next == SegmenterState::SeekingFooter {
            debug!(line = self.lines_seen, "validation header found");
        }

        match action {
            SegmentAction::Accumulate => self.append(line),
            SegmentAction::CaptureNames => {
                self.append(line);
                self.capture_names();
            }
            SegmentAction::CaptureNamesAndStartBlock => {
                self.append(line);
                self.capture_names();
                self.append(line);
            }
            SegmentAction::StartFirstBlock => {
                self.buffer.clear();
                self.append(line);
            }
            SegmentAction::EmitAndStartBlock => {
                self.raw_blocks.push(std::mem::take(&mut self.buffer));
                self.append(line);
            }
        }

        self.state = next;
        Ok(())
    }

    /// Emit the trailing block and return the segments.
    ///
    /// # Errors
    ///
    /// [`DiffError::MalformedLog`] if the footer sentinel never appeared.
    pub fn finish(mut self) -> Result<Segments, DiffError> {
        let names_block = match (self.state, self.names_block.take()) {
            (SegmenterState::Segmenting { .. }, Some(names)) => names,
            (SegmenterState::SeekingHeader, _) => {
                return Err(DiffError::MalformedLog(format!(
                    "`{}` and `{}` not found",
                    self.config.validation_header, self.config.end_of_summary
                )));
            }
            _ => {
                return Err(DiffError::MalformedLog(format!(
                    "`{}` not found",
                    self.config.end_of_summary
                )));
            }
        };

        self.raw_blocks.push(self.buffer);
        debug!(
            lines = self.lines_seen,
            blocks = self.raw_blocks.len(),
            "segmentation finished"
        );
        Ok(Segments {
            names_block,
            raw_blocks: self.raw_blocks,
        })
    }

    fn append(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    fn capture_names(&mut self) {
        debug!(line = self.lines_seen, "end of summary found, names block captured");
        self.names_block = Some(std::mem::take(&mut self.buffer));
    }
}

/// Segment a complete sequence of lines.
pub fn segment<I, S>(lines: I, config: &DiffConfig) -> Result<Segments, DiffError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = LogSegmenter::new(config);
    for line in lines {
        segmenter.push_line(line.as_ref())?;
    }
    segmenter.finish()
}

pub struct SegmentParser;

impl<'a> Parser<&'a str, Segments> for SegmentParser {
    fn parse(&self, input: &'a str, config: &DiffConfig) -> Result<Segments, DiffError> {
        segment(input.lines(), config)
    }
}
