//! Subcommand implementations.

pub mod batch;
pub mod cards;
pub mod eval;
pub mod init;
pub mod serve;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use satzcheck_core::deck::{self, CardStore, Deck};
use satzcheck_core::engine::Evaluator;
use satzcheck_core::rules::RuleSet;
use satzcheck_parsers::{create_parser, load_config_from};

/// Load the decks named by `--deck`, or fall back to the built-in deck.
pub fn load_decks(path: Option<&Path>) -> Result<Vec<Deck>> {
    match path {
        None => Ok(vec![Deck::builtin()]),
        Some(p) if p.is_dir() => deck::load_deck_directory(p),
        Some(p) => Ok(vec![deck::parse_deck(p)?]),
    }
}

pub fn load_store(path: Option<&Path>) -> Result<CardStore> {
    Ok(CardStore::from_decks(&load_decks(path)?))
}

/// Build the evaluator from the parser config (file, well-known paths, or
/// defaults).
pub fn build_evaluator(config_path: Option<PathBuf>) -> Result<Arc<Evaluator>> {
    let config = load_config_from(config_path.as_deref())?;
    let parser = create_parser(&config);
    Ok(Arc::new(Evaluator::new(parser, Arc::new(RuleSet::default()))))
}
