//! Text run - a contiguous span of text with consistent formatting

use serde::{Deserialize, Serialize};

/// Default font family for new runs
pub const DEFAULT_FONT_FAMILY: &str = "Segoe UI";
/// Default font size in points
pub const DEFAULT_FONT_SIZE: f32 = 12.0;
/// Default text color
pub const DEFAULT_COLOR: &str = "#000000";

/// A text run - contiguous text with consistent formatting.
///
/// Attributes are plain scalars. Cloning a run yields a fully independent copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content of this run
    pub text: String,
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub font_size: f32,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    /// Text color as a `#RRGGBB` literal
    pub color: String,
}

impl TextRun {
    /// Create a new run with default formatting
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            is_bold: false,
            is_italic: false,
            is_underline: false,
            color: DEFAULT_COLOR.to_string(),
        }
    }

    /// Set bold
    pub fn bold(mut self, value: bool) -> Self {
        self.is_bold = value;
        self
    }

    /// Set italic
    pub fn italic(mut self, value: bool) -> Self {
        self.is_italic = value;
        self
    }

    /// Set underline
    pub fn underline(mut self, value: bool) -> Self {
        self.is_underline = value;
        self
    }

    /// Set the font family
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Set the font size in points
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the text color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Number of characters in this run
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if this run has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check whether two runs share the same formatting
    pub fn same_style(&self, other: &TextRun) -> bool {
        self.font_family == other.font_family
            && self.font_size == other.font_size
            && self.is_bold == other.is_bold
            && self.is_italic == other.is_italic
            && self.is_underline == other.is_underline
            && self.color == other.color
    }
}

impl Default for TextRun {
    fn default() -> Self {
        Self::new("")
    }
}
