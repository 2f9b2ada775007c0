//! Candidate vote block segmentation.
//!
//! A block ends at an anchor run: contiguous tally lines (`AYES:`, `Status:`,
//! `Motion carried`, ...), their name-list continuation lines, and single
//! blank lines between tally lines. Everything between the previous run and
//! this one is the block's lead; the last `context_window` bytes of the lead,
//! widened to a line start, are its context.
//!
//! Runs are consumed greedily and never overlap: once a block has taken an
//! anchor run, scanning resumes on the line after it.

use std::ops::Range;

use crate::normalize::NormalizedText;
use crate::patterns::{AnchorLine, CompiledPatternSet};

/// A candidate vote block. All ranges are 0-based cleaned line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBlock<'t> {
    /// Position in the block sequence, starting at 0.
    pub index: usize,
    /// Text since the previous anchor run.
    pub lead: &'t str,
    /// Trailing window of the lead.
    pub context: &'t str,
    /// The anchor run itself.
    pub anchor: &'t str,
    pub context_lines: Range<usize>,
    pub anchor_lines: Range<usize>,
}

/// Splits normalized minutes into candidate blocks.
#[derive(Debug)]
pub struct Segmenter<'t> {
    text: &'t str,
    lines: Vec<&'t str>,
    offsets: Vec<usize>,
    kinds: Vec<Option<AnchorLine>>,
    context_window: usize,
}

impl<'t> Segmenter<'t> {
    #[must_use]
    pub fn new(
        normalized: &'t NormalizedText,
        patterns: &CompiledPatternSet,
        context_window: usize,
    ) -> Self {
        let text = normalized.as_str();
        let lines: Vec<&str> = text.split('\n').collect();
        let offsets = build_line_offsets(text);
        let kinds = lines.iter().map(|line| patterns.classify(line)).collect();
        Self {
            text,
            lines,
            offsets,
            kinds,
            context_window,
        }
    }

    /// A fresh pass over the blocks. Each call starts from the top.
    #[must_use]
    pub fn blocks(&self) -> Blocks<'_, 't> {
        Blocks {
            segmenter: self,
            cursor: 0,
            index: 0,
        }
    }

    fn line_start(&self, line: usize) -> usize {
        self.offsets.get(line).copied().unwrap_or(self.text.len())
    }

    /// Byte offset just past the end of `line` (excluding its newline).
    fn line_end(&self, line: usize) -> usize {
        self.line_start(line) + self.lines.get(line).map_or(0, |l| l.len())
    }

    /// End (exclusive) of the anchor run starting at `start`.
    fn anchor_run(&self, start: usize) -> usize {
        let mut seen = Vec::new();
        let mut end = start;
        let mut current = start;

        while current < self.lines.len() {
            match self.kinds[current] {
                Some(kind) => {
                    if let AnchorLine::Bucket(position) = kind {
                        if seen.contains(&position) {
                            // A repeated bucket starts the next vote.
                            break;
                        }
                        seen.push(position);
                    }
                    end = current + 1;
                    current += 1;
                    if kind.is_terminal() {
                        break;
                    }
                }
                None if self.lines[current].is_empty() => {
                    let next_is_anchor = self
                        .kinds
                        .get(current + 1)
                        .copied()
                        .flatten()
                        .is_some_and(|next| match next {
                            AnchorLine::Bucket(position) => !seen.contains(&position),
                            AnchorLine::Status | AnchorLine::Carried => true,
                        });
                    if !next_is_anchor {
                        break;
                    }
                    current += 1;
                }
                None if self.is_continuation(current) => {
                    end = current + 1;
                    current += 1;
                }
                None => break,
            }
        }
        end
    }

    /// A name list wrapped onto the next line.
    fn is_continuation(&self, line: usize) -> bool {
        let Some(previous) = line.checked_sub(1).map(|l| self.lines[l].trim_end()) else {
            return false;
        };
        let dangling = previous.ends_with(',')
            || previous.ends_with(';')
            || previous.ends_with('&')
            || previous.to_ascii_lowercase().ends_with(" and");
        dangling && !self.lines[line].contains(':')
    }

    fn context_start(&self, lead_start_line: usize, anchor_line: usize) -> usize {
        let anchor_offset = self.line_start(anchor_line);
        let floor = anchor_offset.saturating_sub(self.context_window);
        // Widen to the start of the line the window boundary falls in.
        let mut line = self.offsets.partition_point(|&offset| offset <= floor);
        line = line.saturating_sub(1);
        line.clamp(lead_start_line, anchor_line)
    }
}

/// Lazy iterator over candidate blocks in document order.
#[derive(Debug)]
pub struct Blocks<'s, 't> {
    segmenter: &'s Segmenter<'t>,
    cursor: usize,
    index: usize,
}

impl<'t> Iterator for Blocks<'_, 't> {
    type Item = CandidateBlock<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let seg = self.segmenter;
        let lead_start = self.cursor;
        let anchor_start =
            (lead_start..seg.lines.len()).find(|&line| seg.kinds[line].is_some())?;
        let anchor_end = seg.anchor_run(anchor_start);
        let context_start = seg.context_start(lead_start, anchor_start);

        let text = seg.text;
        let lead_from = seg.line_start(lead_start);
        let anchor_from = seg.line_start(anchor_start);
        let anchor_to = seg.line_end(anchor_end - 1);
        let context_from = seg.line_start(context_start);

        let block = CandidateBlock {
            index: self.index,
            lead: text[lead_from..anchor_from].trim_end(),
            context: text[context_from..anchor_from].trim_end(),
            anchor: &text[anchor_from..anchor_to],
            context_lines: context_start..anchor_start,
            anchor_lines: anchor_start..anchor_end,
        };

        tracing::trace!(
            block = block.index,
            lines = ?block.anchor_lines,
            "candidate block"
        );

        // Anchor runs always consume at least one line, so this terminates.
        self.cursor = anchor_end;
        self.index += 1;
        Some(block)
    }
}

/// Byte offset of the start of each line.
fn build_line_offsets(text: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    offsets.extend(
        text.bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i + 1),
    );
    offsets
}
