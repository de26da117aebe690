use std::fmt;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Caption block segmentation, repair and serialization

// @const: SRT timestamp regex (HH:MM:SS,mmm)
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})[,.](\d{3})$").unwrap()
});

/// True for a line consisting solely of digits after trimming.
///
/// These lines anchor caption blocks during segmentation and are rewritten
/// with fresh sequence numbers on output.
pub fn is_index_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds.
///
/// Only used for diagnostics and merge-span reporting; the pipeline itself
/// treats timestamps as opaque text and never validates them.
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let caps = TIMESTAMP_REGEX
        .captures(timestamp.trim())
        .ok_or_else(|| anyhow!("Invalid timestamp format: {}", timestamp))?;

    let hours: u64 = caps[1].parse().context("Failed to parse hours")?;
    let minutes: u64 = caps[2].parse().context("Failed to parse minutes")?;
    let seconds: u64 = caps[3].parse().context("Failed to parse seconds")?;
    let millis: u64 = caps[4].parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
}

/// Format a millisecond offset as an SRT timestamp (HH:MM:SS,mmm).
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// A caption's display range, kept as the raw timestamp text on both sides
/// of the `-->` arrow.
///
/// Merge arithmetic is purely textual: repairing a caption splices the start
/// of one range onto the end of another without ever interpreting either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingRange {
    /// Start timestamp text
    pub start: String,

    /// End timestamp text
    pub end: String,
}

impl TimingRange {
    /// Split a timing line on the `-->` arrow.
    pub fn parse(line: &str) -> Option<Self> {
        let (start, end) = line.split_once("-->")?;
        Some(TimingRange {
            start: start.trim().to_string(),
            end: end.trim().to_string(),
        })
    }

    /// Start offset in milliseconds, when the timestamp parses.
    pub fn start_ms(&self) -> Result<u64> {
        parse_timestamp(&self.start)
    }

    /// End offset in milliseconds, when the timestamp parses.
    pub fn end_ms(&self) -> Result<u64> {
        parse_timestamp(&self.end)
    }
}

impl fmt::Display for TimingRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} --> {}", self.start, self.end)
    }
}

/// One caption: a contiguous run of non-blank lines.
///
/// Canonical shape is index line, timing line, then one or more text lines.
/// A block with fewer than three lines is malformed — its text was lost
/// upstream (spam-stripped or emptied by a failed translation) — and becomes
/// a candidate for merging during repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionBlock {
    lines: Vec<String>,
}

impl CaptionBlock {
    /// Wrap an ordered run of non-blank lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        CaptionBlock { lines }
    }

    /// The block's lines, in display order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines in the block.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// A well-formed block has index, timing and at least one text line.
    pub fn is_well_formed(&self) -> bool {
        self.lines.len() >= 3
    }

    /// Position of the timing line, if the block has one.
    fn timing_pos(&self) -> Option<usize> {
        self.lines.iter().position(|line| line.contains("-->"))
    }

    /// The block's display range, if it has a parseable timing line.
    pub fn timing(&self) -> Option<TimingRange> {
        self.timing_pos()
            .and_then(|pos| TimingRange::parse(&self.lines[pos]))
    }

    /// Rewrite the timing line with a new range.
    ///
    /// Returns false when the block has no timing line to rewrite.
    pub fn set_timing(&mut self, timing: &TimingRange) -> bool {
        match self.timing_pos() {
            Some(pos) => {
                self.lines[pos] = timing.to_string();
                true
            }
            None => false,
        }
    }

    /// Index of the first text line: everything after the timing line, or
    /// after the index line when no timing line exists, or the whole block
    /// for free-text content with neither anchor.
    fn text_start(&self) -> usize {
        if let Some(pos) = self.timing_pos() {
            return pos + 1;
        }
        if self.lines.first().is_some_and(|line| is_index_line(line)) {
            return 1;
        }
        0
    }

    /// The caption's text lines.
    pub fn text_lines(&self) -> &[String] {
        &self.lines[self.text_start().min(self.lines.len())..]
    }

    /// Whether the block carries any text at all.
    pub fn has_text(&self) -> bool {
        self.text_lines().iter().any(|line| !line.trim().is_empty())
    }

    /// The caption's text, lines joined with newlines.
    pub fn text(&self) -> String {
        self.text_lines().join("\n")
    }

    /// Replace the caption's text, keeping index and timing lines intact.
    ///
    /// Blank lines in the replacement are dropped; blank lines never appear
    /// inside a block. Replacing the text with an empty string leaves the
    /// block malformed, which the repair pass then folds into its successor.
    pub fn set_text(&mut self, text: &str) {
        let keep = self.text_start().min(self.lines.len());
        self.lines.truncate(keep);
        self.lines.extend(
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.to_string()),
        );
    }
}

impl fmt::Display for CaptionBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// An ordered sequence of caption blocks cut from one document.
#[derive(Debug, Default)]
pub struct CaptionDocument {
    /// Caption blocks in display order
    pub blocks: Vec<CaptionBlock>,
}

impl CaptionDocument {
    /// Split document text into caption blocks.
    ///
    /// A digit-only line (after trimming) opens a new block, closing any open
    /// one. Every other non-blank line is appended to the open block. Blank
    /// lines are dropped and never appear inside a block. A document with no
    /// digit-only line yields a single block; an empty document yields none.
    pub fn segment(content: &str) -> Self {
        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if is_index_line(trimmed) && !current.is_empty() {
                blocks.push(CaptionBlock::from_lines(std::mem::take(&mut current)));
            }
            current.push(trimmed.to_string());
        }
        if !current.is_empty() {
            blocks.push(CaptionBlock::from_lines(current));
        }

        debug!("Segmented document into {} caption blocks", blocks.len());
        CaptionDocument { blocks }
    }

    /// Number of caption blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Merge malformed blocks into their successors.
    ///
    /// A single forward pass builds a fresh sequence (the input sequence is
    /// never mutated while being walked). A malformed block's timing start is
    /// remembered and its lines dropped; the next surviving well-formed block
    /// has its range rewritten to open at that remembered start, absorbing the
    /// lost caption's display duration. Through a chain of malformed blocks
    /// the FIRST start wins. A malformed final block has no successor to
    /// absorb it: it is dropped when it carries no text, passed through
    /// unchanged when it does.
    ///
    /// Returns the number of blocks removed.
    pub fn repair(&mut self) -> usize {
        let blocks = std::mem::take(&mut self.blocks);
        let total = blocks.len();
        let mut repaired: Vec<CaptionBlock> = Vec::with_capacity(total);
        let mut pending_start: Option<String> = None;
        let mut removed = 0;

        for (idx, mut block) in blocks.into_iter().enumerate() {
            let is_last = idx + 1 == total;

            if block.is_well_formed() {
                if let Some(start) = pending_start.take() {
                    match block.timing() {
                        Some(mut timing) => {
                            timing.start = start;
                            if let (Ok(start_ms), Ok(end_ms)) = (timing.start_ms(), timing.end_ms()) {
                                if start_ms > end_ms {
                                    warn!("Merged timing range is inverted: {}", timing);
                                }
                            }
                            block.set_timing(&timing);
                        }
                        None => {
                            warn!("Caption block {} has no timing line to extend", idx + 1);
                        }
                    }
                }
                repaired.push(block);
            } else if is_last {
                if block.has_text() {
                    repaired.push(block);
                } else {
                    debug!("Dropping trailing caption block with no text");
                    removed += 1;
                }
            } else {
                removed += 1;
                if pending_start.is_none() {
                    if let Some(timing) = block.timing() {
                        pending_start = Some(timing.start);
                    }
                }
            }
        }

        self.blocks = repaired;
        removed
    }

    /// Serialize the blocks back to SRT text.
    ///
    /// Index lines are renumbered sequentially from 1 so merges never leave
    /// gaps visible to players. Lines within a block are joined with single
    /// newlines, consecutive blocks are separated by exactly one blank line,
    /// and the final output carries no trailing whitespace. Running the
    /// result back through `segment` and `render` reproduces it unchanged.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (seq, block) in self.blocks.iter().enumerate() {
            if seq > 0 {
                out.push('\n');
            }
            for (i, line) in block.lines().iter().enumerate() {
                if i == 0 && is_index_line(line) {
                    out.push_str(&(seq + 1).to_string());
                } else {
                    out.push_str(line);
                }
                out.push('\n');
            }
        }

        out.trim_end().to_string()
    }

    /// The document's overall display span in milliseconds, when the first
    /// and last blocks carry parseable timing lines. Diagnostics only.
    pub fn timing_span_ms(&self) -> Option<(u64, u64)> {
        let first = self.blocks.first()?.timing()?.start_ms().ok()?;
        let last = self.blocks.last()?.timing()?.end_ms().ok()?;
        Some((first, last))
    }
}
