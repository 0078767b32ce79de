//! The evaluator: orchestrates one sentence pair through the pipeline.
//!
//! Parse both sentences, adapt, gate, run the checkers in fixed order into
//! a shared accumulator, aggregate. The pipeline itself is synchronous and
//! stateless; the only suspension point is the external parser call, so
//! any number of evaluations may run concurrently against one `Evaluator`.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::adapter;
use crate::aggregate::aggregate;
use crate::checks::{default_pipeline, CheckContext, Checker};
use crate::deck::CardStore;
use crate::error::{EvaluateError, ParserError};
use crate::gate::run_gate;
use crate::model::Flashcard;
use crate::results::{ErrorType, EvaluationResult, GrammarResult};
use crate::rules::RuleSet;
use crate::traits::DependencyParser;

/// One learner attempt, as read from a batch file or an HTTP request.
#[derive(Debug, Clone, Deserialize)]
pub struct Attempt {
    pub flashcard_id: u32,
    pub user_german: String,
}

pub struct Evaluator {
    parser: Arc<dyn DependencyParser>,
    rules: Arc<RuleSet>,
    checkers: Vec<Box<dyn Checker>>,
}

impl Evaluator {
    pub fn new(parser: Arc<dyn DependencyParser>, rules: Arc<RuleSet>) -> Evaluator {
        Evaluator {
            parser,
            rules,
            checkers: default_pipeline(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate one attempt against a flashcard.
    ///
    /// A parser failure on the learner's sentence is part of normal
    /// operation and comes back as `Ok` with a single blocking
    /// PARSE_FAILURE record; failing to parse the canonical reference is an
    /// operator fault and is returned as an error.
    pub async fn evaluate(
        &self,
        user_german: &str,
        card: &Flashcard,
    ) -> Result<EvaluationResult, EvaluateError> {
        let target = {
            let raw = self
                .parser
                .parse(&card.target_german)
                .await
                .map_err(|source| EvaluateError::Reference {
                    card_id: card.id,
                    source,
                })?;
            adapter::adapt(&raw).map_err(|source| EvaluateError::Reference {
                card_id: card.id,
                source,
            })?
        };

        let user = match self.parser.parse(user_german).await.and_then(|raw| {
            adapter::adapt(&raw)
        }) {
            Ok(sentence) => sentence,
            Err(error) => {
                warn!(%error, "user sentence could not be parsed");
                return Ok(parse_failure_result(user_german, &card.target_german, &error));
            }
        };

        Ok(self.evaluate_parsed(&user, &target, card))
    }

    /// The synchronous core: gate, checkers, aggregation. Exposed for
    /// benchmarks and for callers that already hold parsed sentences.
    pub fn evaluate_parsed(
        &self,
        user: &crate::model::ParsedSentence,
        target: &crate::model::ParsedSentence,
        card: &Flashcard,
    ) -> EvaluationResult {
        if let Some(blocking) = run_gate(user, target, &self.rules, &card.target_german) {
            debug!(error_type = ?blocking.error_type, "validity gate rejected attempt");
            return aggregate(user, target, &self.rules, &card.target_german, vec![blocking]);
        }

        let ctx = CheckContext {
            user,
            target,
            rules: &self.rules,
            card,
        };
        let mut findings = Vec::new();
        for checker in &self.checkers {
            let emitted = checker.inspect(&ctx);
            if !emitted.is_empty() {
                debug!(checker = checker.name(), count = emitted.len(), "findings emitted");
            }
            findings.extend(emitted);
        }

        aggregate(user, target, &self.rules, &card.target_german, findings)
    }

    /// Evaluate many attempts concurrently. Requests share nothing but the
    /// read-only rule tables, so parallelism is bounded only by the
    /// semaphore (and the parser backend).
    pub async fn evaluate_batch(
        self: &Arc<Self>,
        attempts: &[Attempt],
        store: &CardStore,
        parallelism: usize,
    ) -> Vec<(Attempt, Result<EvaluationResult, EvaluateError>)> {
        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));
        let mut futures = FuturesUnordered::new();

        for (position, attempt) in attempts.iter().enumerate() {
            let evaluator = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            let attempt = attempt.clone();
            let card = store.get(attempt.flashcard_id).cloned();

            futures.push(async move {
                let outcome = match card {
                    Some(card) => {
                        let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
                        evaluator.evaluate(&attempt.user_german, &card).await
                    }
                    None => Err(EvaluateError::UnknownCard {
                        card_id: attempt.flashcard_id,
                    }),
                };
                (position, attempt, outcome)
            });
        }

        let mut slots: Vec<Option<(Attempt, Result<EvaluationResult, EvaluateError>)>> =
            (0..attempts.len()).map(|_| None).collect();
        while let Some((position, attempt, outcome)) = futures.next().await {
            if let Err(error) = &outcome {
                warn!(%error, card_id = attempt.flashcard_id, "batch attempt failed");
            }
            slots[position] = Some((attempt, outcome));
        }
        slots.into_iter().flatten().collect()
    }
}

/// The response for an attempt whose parse failed outright. Tokens fall
/// back to whitespace splitting so the UI can still display the input.
fn parse_failure_result(
    user_german: &str,
    target_text: &str,
    error: &ParserError,
) -> EvaluationResult {
    let tokens: Vec<String> = user_german
        .split_whitespace()
        .map(str::to_string)
        .collect();
    EvaluationResult {
        meaning_conveyed: false,
        correct_sentence: target_text.to_string(),
        tokens,
        errors: vec![GrammarResult::blocking(
            ErrorType::ParseFailure,
            format!(
                "Your sentence could not be analyzed. The correct sentence is: {target_text}"
            ),
        )
        .with_details(error.to_string())],
    }
}
