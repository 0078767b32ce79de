//! Grammar checkers.
//!
//! Each checker implements [`Checker`] and is composed into an ordered
//! pipeline. Checkers are pure functions over the parse: they share no
//! state, emit zero or more findings, and never block the request —
//! blocking decisions belong to the validity gate.

pub mod consistency;
pub mod morphology;
pub mod spelling;
pub mod structure;

use crate::model::{Flashcard, ParsedSentence};
use crate::results::GrammarResult;
use crate::rules::RuleSet;

/// Everything a checker may look at for one evaluation.
pub struct CheckContext<'a> {
    pub user: &'a ParsedSentence,
    pub target: &'a ParsedSentence,
    pub rules: &'a RuleSet,
    pub card: &'a Flashcard,
}

/// A single grammar inspection over a parsed sentence pair.
pub trait Checker: Send + Sync {
    /// Stable checker name for logging.
    fn name(&self) -> &'static str;

    /// Inspect the attempt and emit findings. Absence of the targeted
    /// structure is not a fault: checkers silently emit nothing when the
    /// construction they look for does not occur.
    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult>;
}

/// The fixed checker order: spelling, then structure, then morphology,
/// then consistency. Emission order is the tie-break for equal priorities,
/// so this order is part of the pipeline's observable behavior.
pub fn default_pipeline() -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(spelling::SpellingChecker),
        Box::new(structure::MainClauseV2),
        Box::new(structure::SubordinateVerbFinal),
        Box::new(morphology::NounCapitalization),
        Box::new(morphology::PerfektAuxiliary),
        Box::new(morphology::PrepositionCase),
        Box::new(consistency::TokenCount),
    ]
}
