//! Search and replace against a [`Document`]
//!
//! Matches are found in the flattened document text. Replacements are mapped
//! back onto paragraph runs so the surrounding formatting survives.

use crate::find_replace::select_scope;
use crate::{ReplaceOutcome, ReplaceScope, Result, SearchEngine, SearchOptions};
use doc_model::{Document, TextRange};

impl SearchEngine {
    /// Find all matches in the document's flattened text
    pub fn find_in_document(
        &self,
        document: &Document,
        pattern: &str,
        options: &SearchOptions,
    ) -> Result<Vec<TextRange>> {
        self.find_all(&document.text(), pattern, options)
    }

    /// Replace one or all matches inside the document.
    ///
    /// Matching finishes before the document is touched; a failed search
    /// leaves it unchanged. A successful replacement marks it modified.
    pub fn replace_in_document(
        &self,
        document: &mut Document,
        pattern: &str,
        replacement: &str,
        options: &SearchOptions,
        scope: ReplaceScope,
    ) -> Result<ReplaceOutcome> {
        let text = document.text();
        let located = self.locate_matches(&text, pattern, options, Some(replacement))?;
        let selected = select_scope(located, scope)?;

        let edits: Vec<(TextRange, String)> = selected
            .iter()
            .map(|m| (m.range, m.replacement(replacement).to_string()))
            .collect();
        let replaced = document.replace_ranges(&edits)?;

        tracing::debug!(
            "Replaced {} matches of '{}' in document '{}'",
            replaced,
            pattern,
            document.title()
        );

        Ok(ReplaceOutcome {
            text: document.text(),
            replaced,
            ranges: edits.into_iter().map(|(range, _)| range).collect(),
        })
    }
}
