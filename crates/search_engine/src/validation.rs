//! Validation of find/replace input
//!
//! Pure functions: each call builds a fresh report from its arguments.

use crate::{SearchEngine, SearchError, SearchOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input fields of a find/replace request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SearchField {
    Pattern,
}

/// Field-level validation problems; empty means the input is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: BTreeMap<SearchField, String>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The problem with a field, if any
    pub fn error_for(&self, field: SearchField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (SearchField, &str)> {
        self.errors.iter().map(|(field, reason)| (*field, reason.as_str()))
    }

    fn reject(&mut self, field: SearchField, reason: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| reason.into());
    }

    /// Convert into a result, joining reasons into one message
    pub fn into_result(self) -> Result<(), SearchError> {
        if self.is_ok() {
            return Ok(());
        }
        let message = self
            .errors
            .into_values()
            .collect::<Vec<_>>()
            .join("; ");
        Err(SearchError::InvalidRequest(message))
    }
}

/// Validate a search request against the limits of `engine`
pub fn validate_search(engine: &SearchEngine, pattern: &str, options: &SearchOptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    if pattern.is_empty() {
        report.reject(SearchField::Pattern, "Search text is required");
    } else if options.use_regex {
        if let Err(e) = engine.compile(pattern, options) {
            let reason = match e {
                SearchError::InvalidPattern { reason, .. } => reason,
                other => other.to_string(),
            };
            report.reject(SearchField::Pattern, format!("Invalid regular expression: {}", reason));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchSettings;

    fn validate(pattern: &str, options: &SearchOptions) -> ValidationReport {
        validate_search(&SearchEngine::new(), pattern, options)
    }

    #[test]
    fn test_valid_search() {
        assert!(validate("hello", &SearchOptions::new()).is_ok());
        assert!(validate(r"\d+", &SearchOptions::new().regex(true)).is_ok());
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let report = validate("", &SearchOptions::new());
        assert_eq!(report.error_for(SearchField::Pattern), Some("Search text is required"));
        assert_eq!(report.errors().count(), 1);
        assert!(matches!(report.into_result(), Err(SearchError::InvalidRequest(_))));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let report = validate("(abc", &SearchOptions::new().regex(true));
        assert!(!report.is_ok());
        assert!(report
            .error_for(SearchField::Pattern)
            .unwrap()
            .starts_with("Invalid regular expression"));

        // Same text is fine as a literal
        assert!(validate("(abc", &SearchOptions::new()).is_ok());
    }

    #[test]
    fn test_validation_uses_engine_size_limit() {
        let options = SearchOptions::new().regex(true);
        let tiny = SearchEngine::from_settings(&SearchSettings {
            regex_size_limit: 10,
            ..SearchSettings::default()
        });

        assert!(validate("[a-z]{50}", &options).is_ok());
        let report = validate_search(&tiny, "[a-z]{50}", &options);
        assert!(report
            .error_for(SearchField::Pattern)
            .unwrap()
            .starts_with("Invalid regular expression"));

        // Literal patterns never touch the regex limits
        assert!(validate_search(&tiny, "[a-z]{50}", &SearchOptions::new()).is_ok());
    }

    #[test]
    fn test_reports_are_independent() {
        let bad = validate("", &SearchOptions::new());
        let good = validate("x", &SearchOptions::new());
        assert!(!bad.is_ok());
        assert!(good.is_ok());
    }
}
