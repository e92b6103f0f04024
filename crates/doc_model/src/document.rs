//! Document root and document-level operations

use crate::text_range::{apply_edits, locate, plan_edits};
use crate::{DocModelError, Paragraph, Result, RunLocation, TextRange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default title for new documents
pub const UNTITLED: &str = "Untitled";

/// Derived document statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub paragraphs: usize,
    pub characters: usize,
    pub words: usize,
}

/// The root document: an ordered list of paragraphs plus metadata.
///
/// Every mutation goes through a method on this type so the modification
/// flag and timestamp stay consistent. Statistics are computed on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
    title: String,
    is_modified: bool,
    last_modified_at: DateTime<Utc>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            title: UNTITLED.to_string(),
            is_modified: false,
            last_modified_at: Utc::now(),
        }
    }

    /// Create a new empty document with a title
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::new()
        }
    }

    /// Create an unmodified document from existing paragraphs
    pub fn from_paragraphs(paragraphs: impl IntoIterator<Item = Paragraph>) -> Self {
        Self {
            paragraphs: paragraphs.into_iter().collect(),
            ..Self::new()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.mark_as_modified();
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    /// All paragraphs in document order
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Get a paragraph by index
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Append a paragraph
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
        self.mark_as_modified();
    }

    /// Insert a paragraph at `index`; `index == paragraph_count()` appends
    pub fn insert_paragraph(&mut self, index: usize, paragraph: Paragraph) -> Result<()> {
        if index > self.paragraphs.len() {
            return Err(DocModelError::IndexOutOfRange {
                index,
                count: self.paragraphs.len(),
            });
        }
        self.paragraphs.insert(index, paragraph);
        self.mark_as_modified();
        Ok(())
    }

    /// Remove and return the paragraph at `index`
    pub fn remove_paragraph(&mut self, index: usize) -> Result<Paragraph> {
        self.check_index(index)?;
        let removed = self.paragraphs.remove(index);
        self.mark_as_modified();
        Ok(removed)
    }

    /// Mutate one paragraph in place
    pub fn edit_paragraph<R>(&mut self, index: usize, f: impl FnOnce(&mut Paragraph) -> R) -> Result<R> {
        self.check_index(index)?;
        let result = f(&mut self.paragraphs[index]);
        self.mark_as_modified();
        Ok(result)
    }

    /// Remove all paragraphs
    pub fn clear(&mut self) {
        self.paragraphs.clear();
        self.mark_as_modified();
    }

    /// Clear the modification flag
    pub fn mark_as_saved(&mut self) {
        self.is_modified = false;
    }

    /// Set the modification flag and advance the timestamp
    pub fn mark_as_modified(&mut self) {
        self.is_modified = true;
        self.last_modified_at = Utc::now();
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn character_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::char_count).sum()
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(Paragraph::word_count).sum()
    }

    /// All derived counts at once
    pub fn statistics(&self) -> DocumentStatistics {
        DocumentStatistics {
            paragraphs: self.paragraph_count(),
            characters: self.character_count(),
            words: self.word_count(),
        }
    }

    /// Flattened document text: paragraph texts concatenated with no separator
    pub fn text(&self) -> String {
        self.paragraphs.iter().map(Paragraph::text).collect()
    }

    /// Map a flat character offset to its paragraph, run and local offset
    pub fn locate(&self, offset: usize) -> Option<RunLocation> {
        locate(&self.paragraphs, offset)
    }

    /// Replace several ranges of the flattened text in one pass.
    ///
    /// Ranges must be sorted, non-overlapping, non-empty and in bounds; they are
    /// all validated and mapped to runs before any text changes, so on error
    /// the document is untouched. Replacement text takes the style of the run
    /// where its range starts. Returns the number of ranges replaced.
    pub fn replace_ranges(&mut self, edits: &[(TextRange, String)]) -> Result<usize> {
        if edits.is_empty() {
            return Ok(0);
        }
        let plan = plan_edits(&self.paragraphs, edits)?;
        apply_edits(&mut self.paragraphs, plan);
        self.mark_as_modified();
        Ok(edits.len())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.paragraphs.len() {
            Ok(())
        } else {
            Err(DocModelError::IndexOutOfRange {
                index,
                count: self.paragraphs.len(),
            })
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
