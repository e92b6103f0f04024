//! Search settings
//!
//! Limits and defaults for the search engine, persisted as JSON.

use crate::{SearchOptions, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Wall-clock budget for evaluating one regex search, in milliseconds
    pub regex_timeout_ms: u64,
    /// Approximate cap on compiled regex size, in bytes
    pub regex_size_limit: usize,
    /// Characters of context shown on each side of a match preview
    pub context_chars: usize,
    /// Options a new search session starts with
    pub default_options: SearchOptions,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            regex_timeout_ms: 250,
            regex_size_limit: 10 * (1 << 20),
            context_chars: 20,
            default_options: SearchOptions::default(),
        }
    }
}

impl SearchSettings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<SearchSettings>(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Failed to parse search settings {:?}, using defaults: {}", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
