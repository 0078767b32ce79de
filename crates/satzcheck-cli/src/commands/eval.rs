//! The `satzcheck eval` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use satzcheck_core::results::EvaluationResult;
use satzcheck_server::presenter;

pub async fn execute(
    card_id: u32,
    answer: &str,
    deck: Option<PathBuf>,
    config: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let store = super::load_store(deck.as_deref())?;
    let card = store
        .get(card_id)
        .with_context(|| format!("flashcard {card_id} not found in deck"))?;

    let evaluator = super::build_evaluator(config)?;
    let result = evaluator.evaluate(answer, card).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text(&card.english_prompt, answer, &result),
    }

    Ok(())
}

fn print_text(prompt: &str, answer: &str, result: &EvaluationResult) {
    println!("Prompt:  {prompt}");
    println!("Answer:  {answer}");
    println!(
        "Meaning conveyed: {}",
        if result.meaning_conveyed { "yes" } else { "no" }
    );
    println!();
    for item in presenter::feedback(result) {
        if item.spans.is_empty() {
            println!("  - {}", item.message);
        } else {
            let words: Vec<&str> = item
                .spans
                .iter()
                .filter_map(|&i| result.tokens.get(i).map(String::as_str))
                .collect();
            println!("  - {} [{}]", item.message, words.join(" "));
        }
    }
    if !result.errors.is_empty() {
        println!();
        println!("Correct sentence: {}", result.correct_sentence);
    }
}
