//! Consistency checker: token-count alignment against the reference.
//!
//! Flags likely missing or extra words without claiming to locate them,
//! so the finding carries no span.

use crate::results::{ErrorType, GrammarResult};

use super::{CheckContext, Checker};

pub struct TokenCount;

impl Checker for TokenCount {
    fn name(&self) -> &'static str {
        "token_count"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        let user_count = ctx.user.alpha_texts().len();
        let target_count = ctx.target.alpha_texts().len();
        let delta = user_count.abs_diff(target_count);
        if delta <= ctx.rules.token_tolerance {
            return Vec::new();
        }

        let message = if user_count < target_count {
            "Your sentence seems to be missing words compared to the expected answer."
        } else {
            "Your sentence has extra words compared to the expected answer."
        };

        vec![GrammarResult::new(ErrorType::TokenMismatch, message)
            .with_details(format!("{user_count} words vs {target_count} expected"))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DepRel, Pos};
    use crate::rules::RuleSet;
    use crate::testutil::{card, ctx_over, sent, tok};

    fn words(texts: &[&str]) -> crate::model::ParsedSentence {
        sent(
            texts
                .iter()
                .enumerate()
                .map(|(i, text)| tok(i, text, text, Pos::X, "", DepRel::Other("dep".into()), 0))
                .collect(),
        )
    }

    #[test]
    fn small_delta_is_tolerated() {
        let user = words(&["ich", "sehe", "den", "hund"]);
        let target = words(&["ich", "sehe", "den", "hund", "gern"]);
        let rules = RuleSet::default();
        let test_card = card();
        let ctx = ctx_over(&user, &target, &rules, &test_card);
        assert!(TokenCount.inspect(&ctx).is_empty());
    }

    #[test]
    fn large_deficit_is_flagged_without_span() {
        let user = words(&["ich", "sehe"]);
        let target = words(&["ich", "sehe", "den", "großen", "braunen", "hund"]);
        let rules = RuleSet::default();
        let test_card = card();
        let ctx = ctx_over(&user, &target, &rules, &test_card);
        let findings = TokenCount.inspect(&ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].error_type, ErrorType::TokenMismatch);
        assert!(findings[0].spans.is_empty());
        assert!(!findings[0].blocking);
        assert!(findings[0].message.contains("missing"));
    }
}
