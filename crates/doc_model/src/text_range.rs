//! Text ranges in the flattened document text and their mapping back to runs
//!
//! Document text is the concatenation of every paragraph's text with no
//! separator between paragraphs. A [`TextRange`] addresses that flat text by
//! character offset; a [`RunLocation`] addresses the same character inside the
//! paragraph/run structure.

use crate::{DocModelError, Paragraph, Result};
use serde::{Deserialize, Serialize};

/// A contiguous span of the flattened document text, in characters.
///
/// Ranges are snapshots: they are only meaningful against the text they were
/// computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    /// Character offset of the first character
    pub start: usize,
    /// Number of characters
    pub length: usize,
}

impl TextRange {
    /// Create a new range
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset one past the last character, saturating at `usize::MAX`
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// Check if the range is degenerate
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check whether `offset` falls inside this range
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Check whether two ranges share at least one character
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Extract the characters covered by this range, if it fits in `text`
    pub fn slice(&self, text: &str) -> Option<String> {
        let slice: String = text.chars().skip(self.start).take(self.length).collect();
        if slice.chars().count() == self.length {
            Some(slice)
        } else {
            None
        }
    }
}

/// Position of a single character inside the paragraph/run structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLocation {
    /// Paragraph index within the document
    pub paragraph: usize,
    /// Run index within the paragraph
    pub run: usize,
    /// Character offset within the run
    pub offset: usize,
}

impl RunLocation {
    pub fn new(paragraph: usize, run: usize, offset: usize) -> Self {
        Self { paragraph, run, offset }
    }
}

/// Where one run sits in the flat text
#[derive(Debug, Clone, Copy)]
struct RunSpan {
    paragraph: usize,
    run: usize,
    start: usize,
    len: usize,
}

impl RunSpan {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

fn run_spans(paragraphs: &[Paragraph]) -> Vec<RunSpan> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for (p, para) in paragraphs.iter().enumerate() {
        for (r, run) in para.runs().iter().enumerate() {
            let len = run.char_count();
            spans.push(RunSpan { paragraph: p, run: r, start: offset, len });
            offset += len;
        }
    }
    spans
}

/// Map a flat character offset to the run holding that character
pub(crate) fn locate(paragraphs: &[Paragraph], offset: usize) -> Option<RunLocation> {
    run_spans(paragraphs)
        .into_iter()
        .find(|span| span.len > 0 && offset >= span.start && offset < span.end())
        .map(|span| RunLocation::new(span.paragraph, span.run, offset - span.start))
}

/// A piece of an edit confined to one run
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunEdit {
    pub location: RunLocation,
    /// Characters removed starting at `location.offset`
    pub remove: usize,
    /// Text inserted at `location.offset`
    pub insert: Option<String>,
}

/// Validate `edits` against the current text and map each one onto runs.
///
/// Edits must be non-empty, in bounds, sorted by start and non-overlapping.
/// The returned plan is in ascending document order; nothing is mutated here.
pub(crate) fn plan_edits(
    paragraphs: &[Paragraph],
    edits: &[(TextRange, String)],
) -> Result<Vec<RunEdit>> {
    let spans = run_spans(paragraphs);
    let len = spans.last().map(RunSpan::end).unwrap_or(0);

    let mut previous_end = 0;
    for (range, _) in edits {
        if range.is_empty() {
            return Err(DocModelError::EmptyRange(range.start));
        }
        let end = match range.start.checked_add(range.length) {
            Some(end) if end <= len => end,
            end => {
                return Err(DocModelError::RangeOutOfBounds {
                    start: range.start,
                    end: end.unwrap_or(usize::MAX),
                    len,
                })
            }
        };
        if range.start < previous_end {
            return Err(DocModelError::UnorderedRanges(range.start));
        }
        previous_end = end;
    }

    let mut plan = Vec::new();
    for (range, replacement) in edits {
        let first = spans.partition_point(|span| span.end() <= range.start);
        let mut insert = Some(replacement.clone());

        for span in spans[first..].iter().take_while(|span| span.start < range.end()) {
            if span.len == 0 {
                continue;
            }
            let local_start = range.start.saturating_sub(span.start);
            let local_end = range.end().min(span.end()) - span.start;
            plan.push(RunEdit {
                location: RunLocation::new(span.paragraph, span.run, local_start),
                remove: local_end - local_start,
                insert: insert.take(),
            });
        }
    }

    Ok(plan)
}

/// Apply a plan produced by [`plan_edits`].
///
/// Pieces are applied last-to-first so earlier locations stay valid.
pub(crate) fn apply_edits(paragraphs: &mut [Paragraph], plan: Vec<RunEdit>) {
    for edit in plan.into_iter().rev() {
        let Some(run) = paragraphs
            .get_mut(edit.location.paragraph)
            .and_then(|para| para.run_mut(edit.location.run))
        else {
            continue;
        };

        let start = byte_offset(&run.text, edit.location.offset);
        let end = byte_offset(&run.text, edit.location.offset + edit.remove);
        let replacement = edit.insert.as_deref().unwrap_or("");
        run.text.replace_range(start..end, replacement);
    }
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
