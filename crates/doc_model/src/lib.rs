//! Document Model - paragraphs of styled text runs
//!
//! This crate provides the text model the search engine works against: a
//! [`Document`] holding [`Paragraph`]s, each holding [`TextRun`]s, plus
//! [`TextRange`] for addressing the flattened document text.

mod document;
mod error;
mod paragraph;
mod run;
mod text_range;

pub use document::*;
pub use error::*;
pub use paragraph::*;
pub use run::*;
pub use text_range::{RunLocation, TextRange};
