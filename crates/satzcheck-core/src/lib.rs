//! satzcheck-core — Deterministic German grammar evaluation.
//!
//! This crate defines the data model, the rule-based checker pipeline, and
//! the evaluator that scores a learner's German sentence against a
//! flashcard's canonical answer.

pub mod adapter;
pub mod aggregate;
pub mod checks;
pub mod deck;
pub mod engine;
pub mod error;
pub mod gate;
pub mod model;
pub mod results;
pub mod rules;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;
