//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocModelError {
    #[error("Paragraph index {index} out of range (paragraph count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Text range {start}..{end} out of bounds (document length {len})")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Text range at offset {0} overlaps or precedes the previous range")]
    UnorderedRanges(usize),

    #[error("Empty text range at offset {0}")]
    EmptyRange(usize),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
