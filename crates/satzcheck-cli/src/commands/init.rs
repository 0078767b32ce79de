//! The `satzcheck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("satzcheck.toml").exists() {
        println!("satzcheck.toml already exists, skipping.");
    } else {
        std::fs::write("satzcheck.toml", SAMPLE_CONFIG)?;
        println!("Created satzcheck.toml");
    }

    std::fs::create_dir_all("decks")?;
    let example_path = std::path::Path::new("decks/example.toml");
    if example_path.exists() {
        println!("decks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DECK)?;
        println!("Created decks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point satzcheck.toml at your parsing service (or keep the default)");
    println!("  2. Run: satzcheck validate --deck decks/example.toml");
    println!("  3. Run: satzcheck serve --deck decks");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# satzcheck configuration

[parser]
type = "http"
base_url = "http://localhost:8090"
timeout_secs = 30
"#;

const EXAMPLE_DECK: &str = r#"[deck]
id = "example"
name = "Example Deck"
description = "A small example deck to get started"

[[cards]]
id = 1
english_prompt = "I went home yesterday."
target_german = "Ich bin gestern nach Hause gegangen."
grammar_focus = "perfekt_auxiliary"

[[cards]]
id = 2
english_prompt = "Today I am learning German."
target_german = "Heute lerne ich Deutsch."
grammar_focus = "main_clause_v2"

[[cards]]
id = 3
english_prompt = "I know that he is coming tomorrow."
target_german = "Ich weiß, dass er morgen kommt."
grammar_focus = "subordinate_verb_final"
"#;
