//! The `satzcheck batch` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Serialize;
use tracing::info;

use satzcheck_core::engine::Attempt;
use satzcheck_core::results::EvaluationResult;

#[derive(Serialize)]
struct BatchOutcome {
    flashcard_id: u32,
    user_german: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<EvaluationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn execute(
    attempts_path: PathBuf,
    deck: Option<PathBuf>,
    config: Option<PathBuf>,
    parallelism: usize,
    format: &str,
) -> Result<()> {
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let content = std::fs::read_to_string(&attempts_path)
        .with_context(|| format!("failed to read attempts: {}", attempts_path.display()))?;
    let attempts: Vec<Attempt> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse attempts: {}", attempts_path.display()))?;

    let store = super::load_store(deck.as_deref())?;
    let evaluator = super::build_evaluator(config)?;
    info!(attempts = attempts.len(), parallelism, "grading attempts");

    let outcomes: Vec<BatchOutcome> = evaluator
        .evaluate_batch(&attempts, &store, parallelism)
        .await
        .into_iter()
        .map(|(attempt, outcome)| match outcome {
            Ok(result) => BatchOutcome {
                flashcard_id: attempt.flashcard_id,
                user_german: attempt.user_german,
                result: Some(result),
                error: None,
            },
            Err(error) => BatchOutcome {
                flashcard_id: attempt.flashcard_id,
                user_german: attempt.user_german,
                result: None,
                error: Some(error.to_string()),
            },
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        _ => print_table(&outcomes),
    }

    Ok(())
}

fn print_table(outcomes: &[BatchOutcome]) {
    let mut table = Table::new();
    table.set_header(vec!["Card", "Attempt", "Meaning", "Errors", "First issue"]);

    for outcome in outcomes {
        let (meaning, errors, first) = match (&outcome.result, &outcome.error) {
            (Some(result), _) => (
                if result.meaning_conveyed { "yes" } else { "no" },
                result.errors.len().to_string(),
                result
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (None, Some(error)) => ("-", "-".to_string(), error.clone()),
            (None, None) => ("-", "-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(outcome.flashcard_id),
            Cell::new(&outcome.user_german),
            Cell::new(meaning),
            Cell::new(errors),
            Cell::new(first),
        ]);
    }

    println!("{table}");
}
