//! Search Engine - find/replace over document text
//!
//! This crate implements literal, whole-word, case-(in)sensitive and regular
//! expression search over the flattened text of a [`doc_model::Document`],
//! single and bulk replacement, and the caller-side session state used to
//! step through matches.

mod document_search;
mod error;
mod events;
mod find_replace;
mod session;
mod settings;
mod validation;

pub use error::*;
pub use events::*;
pub use find_replace::{ReplaceOutcome, ReplaceScope, SearchEngine, SearchOptions};
pub use session::*;
pub use settings::*;
pub use validation::*;
