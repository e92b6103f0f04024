//! Paragraph - a block of content containing runs

use crate::TextRun;
use serde::{Deserialize, Serialize};

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A paragraph containing text runs plus block-level formatting.
///
/// Runs are kept in document order and never reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    runs: Vec<TextRun>,
    /// Text alignment
    pub alignment: Alignment,
    /// Line spacing as a multiple of line height
    pub line_spacing: f32,
    /// Left indent in points
    pub left_indent: f32,
    /// Right indent in points
    pub right_indent: f32,
    /// Space before paragraph in points
    pub spacing_before: f32,
    /// Space after paragraph in points
    pub spacing_after: f32,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            alignment: Alignment::Left,
            line_spacing: 1.0,
            left_indent: 0.0,
            right_indent: 0.0,
            spacing_before: 0.0,
            spacing_after: 0.0,
        }
    }

    /// Create a paragraph holding a single default-formatted run
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut para = Self::new();
        para.add_run(TextRun::new(text));
        para
    }

    /// Create a paragraph from a list of runs
    pub fn with_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        let mut para = Self::new();
        para.runs.extend(runs);
        para
    }

    /// Set the alignment
    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the line spacing multiple
    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set left and right indents
    pub fn indents(mut self, left: f32, right: f32) -> Self {
        self.left_indent = left;
        self.right_indent = right;
        self
    }

    /// Set spacing before and after
    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    /// Append a run
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Remove the run at `index`, if present
    pub fn remove_run(&mut self, index: usize) -> Option<TextRun> {
        if index < self.runs.len() {
            Some(self.runs.remove(index))
        } else {
            None
        }
    }

    /// All runs in document order
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Get a run by index
    pub fn run(&self, index: usize) -> Option<&TextRun> {
        self.runs.get(index)
    }

    pub(crate) fn run_mut(&mut self, index: usize) -> Option<&mut TextRun> {
        self.runs.get_mut(index)
    }

    /// Concatenated text of all runs, with no separators
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when there are no runs or every run is empty
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }

    /// Number of characters across all runs
    pub fn char_count(&self) -> usize {
        self.runs.iter().map(TextRun::char_count).sum()
    }

    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_defaults() {
        let para = Paragraph::new();
        assert_eq!(para.alignment, Alignment::Left);
        assert_eq!(para.line_spacing, 1.0);
        assert_eq!(para.left_indent, 0.0);
        assert_eq!(para.spacing_after, 0.0);
        assert!(para.is_empty());
    }

    #[test]
    fn test_text_concatenates_runs_without_separator() {
        let para = Paragraph::with_runs([
            TextRun::new("Hello "),
            TextRun::new("bold").bold(true),
            TextRun::new(" world"),
        ]);
        assert_eq!(para.text(), "Hello bold world");
        assert_eq!(para.char_count(), 16);
        assert_eq!(para.word_count(), 3);
    }

    #[test]
    fn test_is_empty_with_empty_runs() {
        let mut para = Paragraph::with_runs([TextRun::new(""), TextRun::new("")]);
        assert!(para.is_empty());
        para.add_run(TextRun::new("x"));
        assert!(!para.is_empty());
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        let para = Paragraph::with_text("  one\ttwo   three \n");
        assert_eq!(para.word_count(), 3);
        assert_eq!(Paragraph::with_text("   ").word_count(), 0);
    }

    #[test]
    fn test_remove_run() {
        let mut para = Paragraph::with_runs([TextRun::new("a"), TextRun::new("b")]);
        assert_eq!(para.remove_run(0).map(|r| r.text), Some("a".to_string()));
        assert!(para.remove_run(5).is_none());
        assert_eq!(para.text(), "b");
    }
}
