//! Flashcard deck loading and the in-memory card store.
//!
//! Decks live in TOML files (a `[deck]` header plus `[[cards]]` entries)
//! and are validated on load. The store is read-only: the pipeline only
//! ever reads `target_german` and `grammar_focus` for the requested card.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Flashcard, GrammarFocus};

/// Intermediate TOML structure for deck files.
#[derive(Debug, Deserialize)]
struct TomlDeckFile {
    deck: TomlDeckHeader,
    #[serde(default)]
    cards: Vec<TomlCard>,
}

#[derive(Debug, Deserialize)]
struct TomlDeckHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlCard {
    id: u32,
    english_prompt: String,
    target_german: String,
    grammar_focus: String,
}

/// A named collection of flashcards.
#[derive(Debug, Clone)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cards: Vec<Flashcard>,
}

/// Parse a single TOML file into a `Deck`.
pub fn parse_deck(path: &Path) -> Result<Deck> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck file: {}", path.display()))?;
    parse_deck_str(&content, path)
}

/// Parse a TOML string into a `Deck` (useful for testing).
pub fn parse_deck_str(content: &str, path: &Path) -> Result<Deck> {
    let file: TomlDeckFile = toml::from_str(content)
        .with_context(|| format!("failed to parse deck file: {}", path.display()))?;

    let mut cards = Vec::with_capacity(file.cards.len());
    for card in file.cards {
        let grammar_focus: GrammarFocus = card
            .grammar_focus
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("card {} in {}", card.id, path.display()))?;
        cards.push(Flashcard {
            id: card.id,
            english_prompt: card.english_prompt,
            target_german: card.target_german,
            grammar_focus,
        });
    }

    Ok(Deck {
        id: file.deck.id,
        name: file.deck.name,
        description: file.deck.description,
        cards,
    })
}

/// Load all `.toml` decks in a directory, sorted by file name.
pub fn load_deck_directory(dir: &Path) -> Result<Vec<Deck>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read deck directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    paths.iter().map(|p| parse_deck(p)).collect()
}

/// A non-fatal problem found while validating a deck.
#[derive(Debug)]
pub struct DeckWarning {
    pub card_id: Option<u32>,
    pub message: String,
}

/// Validate a deck, returning warnings (never failing).
pub fn validate_deck(deck: &Deck) -> Vec<DeckWarning> {
    let mut warnings = Vec::new();

    if deck.cards.is_empty() {
        warnings.push(DeckWarning {
            card_id: None,
            message: "deck contains no cards".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for card in &deck.cards {
        if !seen.insert(card.id) {
            warnings.push(DeckWarning {
                card_id: Some(card.id),
                message: format!("duplicate card id {}", card.id),
            });
        }
        if card.target_german.trim().is_empty() {
            warnings.push(DeckWarning {
                card_id: Some(card.id),
                message: "target_german is empty".to_string(),
            });
        }
        if card.english_prompt.trim().len() < 10 {
            warnings.push(DeckWarning {
                card_id: Some(card.id),
                message: "english_prompt is suspiciously short".to_string(),
            });
        }
    }

    warnings
}

impl Deck {
    /// The built-in A2 starter deck.
    pub fn builtin() -> Deck {
        let card = |id: u32, english: &str, german: &str, focus: GrammarFocus| Flashcard {
            id,
            english_prompt: english.to_string(),
            target_german: german.to_string(),
            grammar_focus: focus,
        };
        Deck {
            id: "a2-basics".to_string(),
            name: "A2 German Grammar Basics".to_string(),
            description: "Starter cards covering the targeted grammar concepts".to_string(),
            cards: vec![
                card(
                    1,
                    "I went home yesterday.",
                    "Ich bin gestern nach Hause gegangen.",
                    GrammarFocus::PerfektAuxiliary,
                ),
                card(
                    2,
                    "She has eaten already.",
                    "Sie hat schon gegessen.",
                    GrammarFocus::PerfektAuxiliary,
                ),
                card(
                    3,
                    "Today I am learning German.",
                    "Heute lerne ich Deutsch.",
                    GrammarFocus::MainClauseV2,
                ),
                card(
                    4,
                    "After work, he goes to the gym.",
                    "Nach der Arbeit geht er ins Fitnessstudio.",
                    GrammarFocus::MainClauseV2,
                ),
                card(
                    5,
                    "I know that he is coming tomorrow.",
                    "Ich weiß, dass er morgen kommt.",
                    GrammarFocus::SubordinateVerbFinal,
                ),
                card(
                    6,
                    "She says that she doesn't have time.",
                    "Sie sagt, dass sie keine Zeit hat.",
                    GrammarFocus::SubordinateVerbFinal,
                ),
                card(
                    7,
                    "The dog is sleeping on the couch.",
                    "Der Hund schläft auf der Couch.",
                    GrammarFocus::NounCapitalization,
                ),
                card(
                    8,
                    "I like the city very much.",
                    "Ich mag die Stadt sehr.",
                    GrammarFocus::NounCapitalization,
                ),
                card(
                    9,
                    "I am waiting for the bus.",
                    "Ich warte auf den Bus.",
                    GrammarFocus::AccusativeDative,
                ),
                card(
                    10,
                    "She is helping her friend.",
                    "Sie hilft ihrer Freundin.",
                    GrammarFocus::AccusativeDative,
                ),
            ],
        }
    }
}

/// Read-only in-memory prompt store.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<Flashcard>,
}

impl CardStore {
    pub fn new(cards: Vec<Flashcard>) -> CardStore {
        CardStore { cards }
    }

    pub fn from_decks(decks: &[Deck]) -> CardStore {
        CardStore {
            cards: decks.iter().flat_map(|d| d.cards.iter().cloned()).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&Flashcard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn list(&self) -> &[Flashcard] {
        &self.cards
    }
}
