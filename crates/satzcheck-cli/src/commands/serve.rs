//! The `satzcheck serve` command.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use satzcheck_server::AppState;

pub async fn execute(addr: String, deck: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid bind address: {addr}"))?;

    let store = Arc::new(super::load_store(deck.as_deref())?);
    anyhow::ensure!(!store.list().is_empty(), "no flashcards loaded");

    let evaluator = super::build_evaluator(config)?;
    info!(cards = store.list().len(), %addr, "deck loaded, starting server");

    satzcheck_server::serve(addr, AppState { store, evaluator }).await
}
