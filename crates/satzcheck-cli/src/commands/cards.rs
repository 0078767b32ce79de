//! The `satzcheck cards` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(deck: Option<PathBuf>) -> Result<()> {
    let decks = super::load_decks(deck.as_deref())?;

    for deck in &decks {
        println!("Deck: {} ({} cards)", deck.name, deck.cards.len());

        let mut table = Table::new();
        table.set_header(vec!["ID", "Focus", "English", "German"]);
        for card in &deck.cards {
            table.add_row(vec![
                Cell::new(card.id),
                Cell::new(format!("{:?}", card.grammar_focus)),
                Cell::new(&card.english_prompt),
                Cell::new(&card.target_german),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
