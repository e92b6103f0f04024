//! doc-search - find and replace over a plain-text document
//!
//! Each line of the input file becomes one paragraph. Offsets printed are
//! character offsets into the paragraphs joined without separators.

use anyhow::{Context, Result};
use clap::Parser;
use doc_model::{Document, Paragraph};
use search_engine::{ReplaceScope, SearchEngine, SearchOptions, SearchSettings};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "doc-search", about = "Find and replace in a document")]
struct Args {
    /// Text file to search, one paragraph per line
    file: PathBuf,

    /// Search pattern
    pattern: String,

    /// Replace matches with this text
    #[arg(long)]
    replace: Option<String>,

    /// Replace every match instead of a single one
    #[arg(long, requires = "replace")]
    all: bool,

    /// Index of the match to replace
    #[arg(long, default_value_t = 0)]
    index: usize,

    #[arg(long)]
    case_sensitive: bool,

    #[arg(long)]
    whole_word: bool,

    /// Treat the pattern as a regular expression
    #[arg(long)]
    regex: bool,

    /// Search settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => SearchSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => SearchSettings::default(),
    };
    let engine = SearchEngine::from_settings(&settings);
    let options = SearchOptions::new()
        .case_sensitive(args.case_sensitive || settings.default_options.case_sensitive)
        .whole_word(args.whole_word || settings.default_options.whole_word)
        .regex(args.regex || settings.default_options.use_regex);

    let mut document = load_document(&args.file)?;
    tracing::info!(
        "Loaded {:?}: {} paragraphs, {} characters",
        args.file,
        document.paragraph_count(),
        document.character_count()
    );

    match &args.replace {
        None => {
            let text = document.text();
            let matches = engine.find_all(&text, &args.pattern, &options)?;
            for range in &matches {
                println!("{}\t{}\t{}", range.start, range.length, engine.context(&text, range));
            }
            println!("{} match(es)", matches.len());
        }
        Some(replacement) => {
            let scope = if args.all {
                ReplaceScope::All
            } else {
                ReplaceScope::Single(args.index)
            };
            let outcome =
                engine.replace_in_document(&mut document, &args.pattern, replacement, &options, scope)?;
            for paragraph in document.paragraphs() {
                println!("{}", paragraph.text());
            }
            println!("{} replacement(s)", outcome.replaced);
        }
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut document = Document::from_paragraphs(content.lines().map(Paragraph::with_text));
    if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
        document.set_title(name);
    }
    document.mark_as_saved();
    Ok(document)
}
