//! Find and Replace Engine
//!
//! This module provides the search core:
//! - SearchOptions for configuring search behavior
//! - SearchEngine for locating matches in flat text as [`TextRange`]s
//! - Single and bulk replacement computed against one text snapshot
//!
//! Literal search compares character by character. Regex search uses the
//! linear-time `regex` engine with Unicode case folding and word boundaries;
//! compilation is size-limited and evaluation runs on a worker thread under a
//! wall-clock budget, so a pathological pattern turns into a
//! [`SearchError::TimedOut`] instead of blocking the caller.
//!
//! Both paths share one definition of a word character (letter, digit or
//! underscore), so whole-word results agree between them.

use crate::{SearchError, SearchSettings, Result};
use doc_model::TextRange;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Options for find operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Case-sensitive search
    pub case_sensitive: bool,
    /// Match whole words only
    pub whole_word: bool,
    /// Use regex pattern
    pub use_regex: bool,
}

impl SearchOptions {
    /// Create a new SearchOptions with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case sensitivity
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    /// Set whole word matching
    pub fn whole_word(mut self, value: bool) -> Self {
        self.whole_word = value;
        self
    }

    /// Enable regex mode
    pub fn regex(mut self, value: bool) -> Self {
        self.use_regex = value;
        self
    }
}

/// Which matches a replace operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaceScope {
    /// The match at this 0-based index in find order
    Single(usize),
    /// Every match
    All,
}

/// Result of a replace operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOutcome {
    /// The text after replacement
    pub text: String,
    /// Number of replacements made
    pub replaced: usize,
    /// Replaced spans, measured against the original text
    pub ranges: Vec<TextRange>,
}

/// A match located in the searched text
#[derive(Debug, Clone)]
pub(crate) struct Located {
    pub range: TextRange,
    pub bytes: Range<usize>,
    /// Replacement with capture references expanded (regex only)
    pub expansion: Option<String>,
}

impl Located {
    pub fn replacement<'a>(&'a self, literal: &'a str) -> &'a str {
        self.expansion.as_deref().unwrap_or(literal)
    }
}

/// Stateless search service.
///
/// Holds only limits; every call works on the text snapshot passed in.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    regex_budget: Duration,
    regex_size_limit: usize,
    context_chars: usize,
}

impl SearchEngine {
    /// Create an engine with default limits
    pub fn new() -> Self {
        Self::from_settings(&SearchSettings::default())
    }

    /// Create an engine using limits from settings
    pub fn from_settings(settings: &SearchSettings) -> Self {
        Self {
            regex_budget: Duration::from_millis(settings.regex_timeout_ms),
            regex_size_limit: settings.regex_size_limit,
            context_chars: settings.context_chars,
        }
    }

    /// Override the wall-clock budget for regex evaluation
    pub fn with_regex_budget(mut self, budget: Duration) -> Self {
        self.regex_budget = budget;
        self
    }

    pub fn regex_budget(&self) -> Duration {
        self.regex_budget
    }

    /// Find all non-overlapping matches, in ascending order.
    ///
    /// An empty pattern yields no matches. Zero-width regex matches are skipped.
    pub fn find_all(&self, text: &str, pattern: &str, options: &SearchOptions) -> Result<Vec<TextRange>> {
        let located = self.locate_matches(text, pattern, options, None)?;
        tracing::debug!("find_all '{}' found {} matches", pattern, located.len());
        Ok(located.into_iter().map(|m| m.range).collect())
    }

    /// Replace one match or all matches in `text`.
    ///
    /// All matches are computed against the original text before the output is
    /// built, so earlier replacements never shift later ones. For regex
    /// patterns `$1`, `${name}` and `$$` in `replacement` are expanded; literal
    /// patterns insert `replacement` verbatim.
    pub fn replace(
        &self,
        text: &str,
        pattern: &str,
        replacement: &str,
        options: &SearchOptions,
        scope: ReplaceScope,
    ) -> Result<ReplaceOutcome> {
        let located = self.locate_matches(text, pattern, options, Some(replacement))?;
        let selected = select_scope(located, scope)?;

        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        for m in &selected {
            output.push_str(&text[last..m.bytes.start]);
            output.push_str(m.replacement(replacement));
            last = m.bytes.end;
        }
        output.push_str(&text[last..]);

        tracing::debug!("replace '{}' replaced {} matches", pattern, selected.len());
        Ok(ReplaceOutcome {
            text: output,
            replaced: selected.len(),
            ranges: selected.into_iter().map(|m| m.range).collect(),
        })
    }

    /// Get context around a match for preview
    pub fn context(&self, text: &str, range: &TextRange) -> String {
        let chars: Vec<char> = text.chars().collect();
        let start = range.start.min(chars.len());
        let end = range.end().min(chars.len());

        let context_start = start.saturating_sub(self.context_chars);
        let context_end = (end + self.context_chars).min(chars.len());

        let mut context: String = chars[context_start..context_end].iter().collect();

        if context_start > 0 {
            context = format!("...{}", context);
        }
        if context_end < chars.len() {
            context = format!("{}...", context);
        }

        context
    }

    /// Compile a pattern the way regex search would
    pub(crate) fn compile(&self, pattern: &str, options: &SearchOptions) -> Result<Regex> {
        let source = if options.whole_word {
            format!(r"\b(?:{})\b", pattern)
        } else {
            pattern.to_string()
        };

        RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .size_limit(self.regex_size_limit)
            .build()
            .map_err(|e| SearchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Locate matches, expanding `replacement` per match on the regex path
    pub(crate) fn locate_matches(
        &self,
        text: &str,
        pattern: &str,
        options: &SearchOptions,
        replacement: Option<&str>,
    ) -> Result<Vec<Located>> {
        if pattern.is_empty() {
            return Ok(Vec::new());
        }

        if options.use_regex {
            let regex = self.compile(pattern, options)?;
            let spans = self.run_regex(regex, text, replacement)?;
            let located = to_char_ranges(text, spans);
            if options.whole_word {
                Ok(retain_whole_words(text, located))
            } else {
                Ok(located)
            }
        } else {
            Ok(find_literal(text, pattern, options))
        }
    }

    /// Scan on a worker thread, giving up once the budget is spent
    fn run_regex(&self, regex: Regex, text: &str, replacement: Option<&str>) -> Result<Vec<RegexSpan>> {
        let budget_ms = self.regex_budget.as_millis() as u64;
        let deadline = Instant::now() + self.regex_budget;
        let haystack = text.to_owned();
        let replacement = replacement.map(str::to_owned);
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("regex-search".to_string())
            .spawn(move || {
                let _ = tx.send(scan_regex(&regex, &haystack, replacement.as_deref(), deadline));
            })
            .map_err(|e| SearchError::Internal(format!("failed to start regex worker: {}", e)))?;

        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Some(spans)) => Ok(spans),
            Ok(None) | Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Regex evaluation exceeded {} ms budget", budget_ms);
                Err(SearchError::TimedOut { budget_ms })
            }
            Err(RecvTimeoutError::Disconnected) => Err(SearchError::Internal(
                "regex worker stopped unexpectedly".to_string(),
            )),
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the matches a replace scope targets
pub(crate) fn select_scope(located: Vec<Located>, scope: ReplaceScope) -> Result<Vec<Located>> {
    match scope {
        ReplaceScope::All => Ok(located),
        ReplaceScope::Single(_) if located.is_empty() => Ok(located),
        ReplaceScope::Single(index) => {
            let count = located.len();
            located
                .into_iter()
                .nth(index)
                .map(|m| vec![m])
                .ok_or(SearchError::MatchOutOfRange { index, count })
        }
    }
}

/// Word characters: letters, digits and underscore
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when neither neighbour of a match is a word character
fn bounded_by_non_words(before: Option<char>, after: Option<char>) -> bool {
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Drop regex matches whose neighbours are word characters.
///
/// `\b` in the compiled pattern covers most cases, but its `\w` also counts
/// combining marks and connector punctuation, which [`is_word_char`] does not.
fn retain_whole_words(text: &str, located: Vec<Located>) -> Vec<Located> {
    let chars: Vec<char> = text.chars().collect();
    located
        .into_iter()
        .filter(|m| {
            let before = m.range.start.checked_sub(1).map(|i| chars[i]);
            let after = chars.get(m.range.end()).copied();
            bounded_by_non_words(before, after)
        })
        .collect()
}

fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    a == b || (!case_sensitive && a.to_lowercase().eq(b.to_lowercase()))
}

/// Find literal (non-regex) matches, left to right, non-overlapping
fn find_literal(text: &str, pattern: &str, options: &SearchOptions) -> Vec<Located> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let needle: Vec<char> = pattern.chars().collect();
    let len = needle.len();
    let mut results = Vec::new();

    if len == 0 || chars.len() < len {
        return results;
    }

    let byte_at = |index: usize| chars.get(index).map(|&(byte, _)| byte).unwrap_or(text.len());

    let mut index = 0;
    while index + len <= chars.len() {
        let matched = chars[index..index + len]
            .iter()
            .zip(&needle)
            .all(|(&(_, c), &p)| chars_equal(c, p, options.case_sensitive));

        let accepted = matched
            && (!options.whole_word
                || bounded_by_non_words(
                    index.checked_sub(1).map(|i| chars[i].1),
                    chars.get(index + len).map(|&(_, c)| c),
                ));

        if accepted {
            results.push(Located {
                range: TextRange::new(index, len),
                bytes: byte_at(index)..byte_at(index + len),
                expansion: None,
            });
            index += len;
        } else {
            index += 1;
        }
    }

    results
}

/// A regex match in byte offsets
#[derive(Debug)]
struct RegexSpan {
    bytes: Range<usize>,
    expansion: Option<String>,
}

/// Collect non-overlapping matches; `None` when the deadline passes first
fn scan_regex(regex: &Regex, text: &str, replacement: Option<&str>, deadline: Instant) -> Option<Vec<RegexSpan>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        if Instant::now() >= deadline {
            return None;
        }

        let (bytes, expansion) = match replacement {
            Some(replacement) => {
                let Some(caps) = regex.captures_at(text, pos) else { break };
                let Some(whole) = caps.get(0) else { break };
                let mut expanded = String::new();
                caps.expand(replacement, &mut expanded);
                (whole.start()..whole.end(), Some(expanded))
            }
            None => {
                let Some(m) = regex.find_at(text, pos) else { break };
                (m.start()..m.end(), None)
            }
        };

        if bytes.is_empty() {
            // Zero-width: step one character past it
            match text[bytes.start..].chars().next() {
                Some(c) => pos = bytes.start + c.len_utf8(),
                None => break,
            }
            continue;
        }

        pos = bytes.end;
        spans.push(RegexSpan { bytes, expansion });
    }

    Some(spans)
}

fn to_char_ranges(text: &str, spans: Vec<RegexSpan>) -> Vec<Located> {
    let boundaries: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
    let char_at = |byte: usize| boundaries.partition_point(|&b| b < byte);

    spans
        .into_iter()
        .map(|span| {
            let start = char_at(span.bytes.start);
            let end = char_at(span.bytes.end);
            Located {
                range: TextRange::new(start, end - start),
                bytes: span.bytes,
                expansion: span.expansion,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SearchEngine {
        SearchEngine::new()
    }

    fn literal() -> SearchOptions {
        SearchOptions::new()
    }

    fn regex() -> SearchOptions {
        SearchOptions::new().regex(true)
    }

    #[test]
    fn test_search_options_builder() {
        let options = SearchOptions::new()
            .case_sensitive(true)
            .whole_word(true)
            .regex(false);

        assert!(options.case_sensitive);
        assert!(options.whole_word);
        assert!(!options.use_regex);
    }

    #[test]
    fn test_find_all_case_sensitivity() {
        let results = engine()
            .find_all("Hello hello", "hello", &literal().case_sensitive(true))
            .unwrap();
        assert_eq!(results, vec![TextRange::new(6, 5)]);

        let results = engine().find_all("Hello hello", "hello", &literal()).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 5), TextRange::new(6, 5)]);
    }

    #[test]
    fn test_find_all_whole_word() {
        let results = engine()
            .find_all("catalog cat", "cat", &literal().whole_word(true))
            .unwrap();
        assert_eq!(results, vec![TextRange::new(8, 3)]);

        let results = engine().find_all("test testing tested test", "test", &literal()).unwrap();
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_whole_word_treats_underscore_as_word_char() {
        let results = engine()
            .find_all("my_cat cat_ (cat)", "cat", &literal().whole_word(true))
            .unwrap();
        assert_eq!(results, vec![TextRange::new(13, 3)]);
    }

    #[test]
    fn test_find_all_non_overlapping() {
        let results = engine().find_all("aaaa", "aa", &literal()).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 2), TextRange::new(2, 2)]);
    }

    #[test]
    fn test_find_empty_pattern_and_text() {
        assert!(engine().find_all("Hello world", "", &literal()).unwrap().is_empty());
        assert!(engine().find_all("", "x", &literal()).unwrap().is_empty());
        assert!(engine().find_all("Hello world", "", &regex()).unwrap().is_empty());
    }

    #[test]
    fn test_find_no_match() {
        assert!(engine().find_all("Hello world", "xyz", &literal()).unwrap().is_empty());
    }

    #[test]
    fn test_offsets_are_in_characters() {
        let results = engine().find_all("über über", "über", &literal()).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 4), TextRange::new(5, 4)]);

        let results = engine().find_all("über über", "b.r", &regex()).unwrap();
        assert_eq!(results, vec![TextRange::new(1, 3), TextRange::new(6, 3)]);
    }

    #[test]
    fn test_case_insensitive_non_ascii_literal() {
        let results = engine().find_all("ÉCOLE école", "école", &literal()).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_regex_basic() {
        let results = engine().find_all("a1 b22 c333", r"\d+", &regex()).unwrap();
        assert_eq!(
            results,
            vec![TextRange::new(1, 1), TextRange::new(4, 2), TextRange::new(8, 3)]
        );
    }

    #[test]
    fn test_regex_case_and_whole_word() {
        let text = "Cat concat cat";
        let results = engine().find_all(text, "cat", &regex().case_sensitive(true)).unwrap();
        assert_eq!(results, vec![TextRange::new(7, 3), TextRange::new(11, 3)]);

        let results = engine().find_all(text, "cat", &regex().whole_word(true)).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 3), TextRange::new(11, 3)]);

        let results = engine().find_all(text, "cat|con", &regex().whole_word(true)).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 3), TextRange::new(11, 3)]);
    }

    #[test]
    fn test_regex_whole_word_uses_unicode_word_chars() {
        let options = regex().whole_word(true);
        assert!(engine().find_all("école", "cole", &options).unwrap().is_empty());
        assert!(engine().find_all("naïve", "ve", &options).unwrap().is_empty());
        assert_eq!(
            engine().find_all("une école", "école", &options).unwrap(),
            vec![TextRange::new(4, 5)]
        );

        let literal = engine().find_all("école", "cole", &literal().whole_word(true)).unwrap();
        assert!(literal.is_empty());
    }

    #[test]
    fn test_regex_case_folding_matches_literal_path() {
        let from_regex = engine().find_all("ÉCOLE", "école", &regex()).unwrap();
        let from_literal = engine().find_all("ÉCOLE", "école", &literal()).unwrap();
        assert_eq!(from_regex, vec![TextRange::new(0, 5)]);
        assert_eq!(from_regex, from_literal);

        let sensitive = engine().find_all("ÉCOLE", "école", &regex().case_sensitive(true)).unwrap();
        assert!(sensitive.is_empty());
    }

    #[test]
    fn test_regex_zero_width_matches_are_skipped() {
        let results = engine().find_all("baaac", "a*", &regex()).unwrap();
        assert_eq!(results, vec![TextRange::new(1, 3)]);

        let results = engine().find_all("abc", "^", &regex()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_regex_is_search_failure() {
        let err = engine().find_all("text", "(unclosed", &regex()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidPattern { .. }));
        assert!(err.is_user_error());
        assert!(err.to_string().starts_with("Search failed"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal_without_regex_flag() {
        let results = engine().find_all("a.b axb (x)", "a.b", &literal()).unwrap();
        assert_eq!(results, vec![TextRange::new(0, 3)]);
        let results = engine().find_all("a.b axb (x)", "(x)", &literal()).unwrap();
        assert_eq!(results, vec![TextRange::new(8, 3)]);
    }

    #[test]
    fn test_regex_budget_exhausted_times_out() {
        let engine = SearchEngine::new().with_regex_budget(Duration::ZERO);
        let err = engine.find_all("aaaa", "a+", &regex()).unwrap_err();
        assert_eq!(err, SearchError::TimedOut { budget_ms: 0 });
    }

    #[test]
    fn test_replace_all_literal() {
        let outcome = engine()
            .replace("cat dog cat bird cat", "cat", "fish", &literal(), ReplaceScope::All)
            .unwrap();
        assert_eq!(outcome.text, "fish dog fish bird fish");
        assert_eq!(outcome.replaced, 3);
        assert_eq!(outcome.ranges[2], TextRange::new(17, 3));
    }

    #[test]
    fn test_replace_single() {
        let outcome = engine()
            .replace("one two one three one", "one", "1", &literal(), ReplaceScope::Single(1))
            .unwrap();
        assert_eq!(outcome.text, "one two 1 three one");
        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.ranges, vec![TextRange::new(8, 3)]);
    }

    #[test]
    fn test_replace_single_out_of_range() {
        let err = engine()
            .replace("one one", "one", "1", &literal(), ReplaceScope::Single(2))
            .unwrap_err();
        assert_eq!(err, SearchError::MatchOutOfRange { index: 2, count: 2 });
    }

    #[test]
    fn test_replace_without_matches_is_noop() {
        let outcome = engine()
            .replace("nothing here", "xyz", "abc", &literal(), ReplaceScope::Single(0))
            .unwrap();
        assert_eq!(outcome.text, "nothing here");
        assert_eq!(outcome.replaced, 0);
    }

    #[test]
    fn test_replace_literal_does_not_expand_references() {
        let outcome = engine()
            .replace("price", "price", "$1 each", &literal(), ReplaceScope::All)
            .unwrap();
        assert_eq!(outcome.text, "$1 each");
    }

    #[test]
    fn test_replace_regex_expands_captures() {
        let outcome = engine()
            .replace(
                "John Smith, Jane Doe",
                r"(\w+) (\w+)",
                "$2 $1",
                &regex(),
                ReplaceScope::All,
            )
            .unwrap();
        assert_eq!(outcome.text, "Smith John, Doe Jane");

        let outcome = engine()
            .replace("2024-01-05", r"(?P<y>\d{4})-(\d\d)", "${y}/$$", &regex(), ReplaceScope::All)
            .unwrap();
        assert_eq!(outcome.text, "2024/$-05");
    }

    #[test]
    fn test_replace_growing_text_keeps_offsets() {
        let outcome = engine()
            .replace("a-a-a", "a", "long", &literal(), ReplaceScope::All)
            .unwrap();
        assert_eq!(outcome.text, "long-long-long");
    }

    #[test]
    fn test_replace_invalid_regex_fails_without_output() {
        let result = engine().replace("text", "[", "x", &regex(), ReplaceScope::All);
        assert!(matches!(result, Err(SearchError::InvalidPattern { .. })));
    }

    #[test]
    fn test_context() {
        let text = "The quick brown fox jumps over the lazy dog.";
        let engine = engine();
        let results = engine.find_all(text, "fox", &literal()).unwrap();
        assert_eq!(results.len(), 1);

        let context = engine.context(text, &results[0]);
        assert!(context.contains("fox"));
        assert!(context.ends_with("..."));
        assert!(!context.starts_with("..."));
    }
}
