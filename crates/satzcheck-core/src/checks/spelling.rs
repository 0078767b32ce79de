//! Spelling checker.
//!
//! Flags content tokens the parser could not resolve against its lexicon.
//! One non-blocking finding per token, no correction suggestions — the
//! pipeline is deterministic and has no generative step.

use crate::results::{ErrorType, GrammarResult};

use super::{CheckContext, Checker};

pub struct SpellingChecker;

impl Checker for SpellingChecker {
    fn name(&self) -> &'static str {
        "spelling"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        ctx.user
            .tokens()
            .iter()
            .filter(|t| t.is_alpha() && t.pos.is_content() && t.oov)
            .map(|t| {
                GrammarResult::new(
                    ErrorType::Spelling,
                    format!("'{}' may be misspelled.", t.text),
                )
                .with_spans(vec![t.index])
                .with_details(t.text.clone())
            })
            .collect()
    }
}
