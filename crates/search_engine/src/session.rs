//! Search session - caller-held match list and navigation
//!
//! A session owns the current pattern, options and match list for one
//! document. It moves between two states:
//! - `Idle`: nothing searched yet, the last search found nothing, or results
//!   were cleared / invalidated by a replace-all
//! - `HasResults`: one or more matches with a current index
//!
//! A failed search leaves existing results alone; only `clear_results`, a
//! successful search or a replace changes them.
//!
//! Replacements act on the search that produced the results. Editing the
//! pattern or options afterwards does not retarget them, and a document whose
//! text changed since that search must be searched again first.

use crate::{
    validate_search, ReplaceScope, Result, SearchEngine, SearchError, SearchEvent,
    SearchNotifier, SearchOptions, SearchSettings,
};
use doc_model::{Document, TextRange};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    HasResults { current: usize },
}

/// The request and document text the current matches were computed from
#[derive(Debug, Clone)]
struct SearchedWith {
    pattern: String,
    options: SearchOptions,
    text: String,
}

/// Caller-side search state for one document
#[derive(Debug, Default)]
pub struct SearchSession {
    engine: SearchEngine,
    notifier: SearchNotifier,
    pattern: String,
    replacement: String,
    options: SearchOptions,
    matches: Vec<TextRange>,
    current: Option<usize>,
    searched: Option<SearchedWith>,
    status: String,
}

impl SearchSession {
    /// Create a session using the given engine
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Create a session with engine limits and default options from settings
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            engine: SearchEngine::from_settings(settings),
            options: settings.default_options,
            ..Self::default()
        }
    }

    /// Register a callback for highlight and replace events
    pub fn subscribe(&mut self, callback: impl Fn(&SearchEvent) + Send + Sync + 'static) {
        self.notifier.subscribe(callback);
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn set_replacement(&mut self, replacement: impl Into<String>) {
        self.replacement = replacement.into();
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    pub fn state(&self) -> SessionState {
        match self.current {
            Some(current) if !self.matches.is_empty() => SessionState::HasResults { current },
            _ => SessionState::Idle,
        }
    }

    /// All matches from the last successful search
    pub fn matches(&self) -> &[TextRange] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_match(&self) -> Option<TextRange> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Human-readable status of the last operation
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn can_navigate(&self) -> bool {
        matches!(self.state(), SessionState::HasResults { .. })
    }

    pub fn can_replace(&self) -> bool {
        self.can_navigate()
    }

    /// Search the document with the session's pattern and options.
    ///
    /// Returns the number of matches. On failure the previous results stay as
    /// they were and the status carries the reason.
    pub fn perform_search(&mut self, document: &Document) -> Result<usize> {
        let found = validate_search(&self.engine, &self.pattern, &self.options)
            .into_result()
            .and_then(|_| self.engine.find_in_document(document, &self.pattern, &self.options));

        match found {
            Ok(matches) => {
                self.searched = Some(SearchedWith {
                    pattern: self.pattern.clone(),
                    options: self.options,
                    text: document.text(),
                });
                self.set_results(matches, 0);
                self.highlight_current();
                Ok(self.matches.len())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Advance to the next match, wrapping to the first
    pub fn find_next(&mut self) -> Option<TextRange> {
        let SessionState::HasResults { current } = self.state() else {
            return None;
        };
        self.current = Some((current + 1) % self.matches.len());
        self.update_status();
        self.highlight_current()
    }

    /// Step back to the previous match, wrapping to the last
    pub fn find_previous(&mut self) -> Option<TextRange> {
        let SessionState::HasResults { current } = self.state() else {
            return None;
        };
        self.current = Some(if current == 0 {
            self.matches.len() - 1
        } else {
            current - 1
        });
        self.update_status();
        self.highlight_current()
    }

    /// Replace the highlighted match, then search again against the new text.
    ///
    /// The current index is kept (clamped), so it now points at the match
    /// that followed the replaced one.
    pub fn replace_current(&mut self, document: &mut Document) -> Result<usize> {
        let SessionState::HasResults { current } = self.state() else {
            return Err(self.fail(SearchError::InvalidRequest("No match selected".to_string())));
        };
        let searched = self.searched_for(document)?;

        self.notifier.emit(SearchEvent::ReplaceRequested {
            pattern: searched.pattern.clone(),
            replacement: self.replacement.clone(),
            replace_all: false,
        });

        let outcome = self
            .engine
            .replace_in_document(
                document,
                &searched.pattern,
                &self.replacement,
                &searched.options,
                ReplaceScope::Single(current),
            )
            .map_err(|e| self.fail(e))?;

        match self.engine.find_in_document(document, &searched.pattern, &searched.options) {
            Ok(matches) => {
                self.searched = Some(SearchedWith {
                    text: document.text(),
                    ..searched
                });
                self.set_results(matches, current);
                self.highlight_current();
            }
            Err(e) => {
                self.clear_results();
                self.fail(e);
            }
        }

        Ok(outcome.replaced)
    }

    /// Replace every match of the last search; the session returns to `Idle`
    pub fn replace_all(&mut self, document: &mut Document) -> Result<usize> {
        if !self.can_replace() {
            return Err(self.fail(SearchError::InvalidRequest("No matches to replace".to_string())));
        }
        let searched = self.searched_for(document)?;

        self.notifier.emit(SearchEvent::ReplaceRequested {
            pattern: searched.pattern.clone(),
            replacement: self.replacement.clone(),
            replace_all: true,
        });

        let outcome = self
            .engine
            .replace_in_document(
                document,
                &searched.pattern,
                &self.replacement,
                &searched.options,
                ReplaceScope::All,
            )
            .map_err(|e| self.fail(e))?;

        self.clear_results();
        self.status = format!("Replaced {} occurrence(s)", outcome.replaced);
        Ok(outcome.replaced)
    }

    /// Drop all results and return to `Idle`
    pub fn clear_results(&mut self) {
        self.matches.clear();
        self.current = None;
        self.searched = None;
        self.status.clear();
    }

    /// Preview text around the current match
    pub fn current_context(&self, document: &Document) -> Option<String> {
        self.current_match()
            .map(|range| self.engine.context(&document.text(), &range))
    }

    /// The search behind the current results, provided `document` still has
    /// the text it ran against
    fn searched_for(&mut self, document: &Document) -> Result<SearchedWith> {
        let text = document.text();
        if let Some(searched) = self.searched.as_ref().filter(|s| s.text == text) {
            return Ok(searched.clone());
        }
        Err(self.fail(SearchError::InvalidRequest(
            "Document changed since the last search".to_string(),
        )))
    }

    fn set_results(&mut self, matches: Vec<TextRange>, index: usize) {
        self.current = if matches.is_empty() {
            None
        } else {
            Some(index.min(matches.len() - 1))
        };
        self.matches = matches;
        self.update_status();
    }

    fn update_status(&mut self) {
        self.status = match self.current {
            Some(i) => format!("Match {} of {}", i + 1, self.matches.len()),
            None => "No matches found".to_string(),
        };
    }

    fn highlight_current(&self) -> Option<TextRange> {
        let range = self.current_match()?;
        self.notifier.emit(SearchEvent::HighlightRequested(range));
        Some(range)
    }

    fn fail(&mut self, error: SearchError) -> SearchError {
        tracing::warn!("{}", error);
        self.status = error.to_string();
        error
    }
}
