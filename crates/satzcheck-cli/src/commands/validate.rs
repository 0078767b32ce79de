//! The `satzcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use satzcheck_core::deck::validate_deck;

pub fn execute(deck_path: PathBuf) -> Result<()> {
    let decks = super::load_decks(Some(&deck_path))?;

    let mut total_warnings = 0;

    for deck in &decks {
        println!("Deck: {} ({} cards)", deck.name, deck.cards.len());

        let warnings = validate_deck(deck);
        for w in &warnings {
            let prefix = w
                .card_id
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All decks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
