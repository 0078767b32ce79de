//! Validity gate.
//!
//! Runs before any grammar-specific checker and decides whether the attempt
//! is evaluable at all. A blocking finding here short-circuits the whole
//! pipeline: the aggregator is invoked with only that finding, and no
//! downstream checker runs. This separates "the sentence cannot be graded"
//! from "the sentence has grammar errors".

use std::collections::BTreeMap;

use crate::model::{ParsedSentence, Pos};
use crate::results::{ErrorType, GrammarResult};
use crate::rules::RuleSet;

/// Fraction of reference content lemmas covered by the attempt.
pub fn lemma_coverage(user: &ParsedSentence, target: &ParsedSentence) -> f64 {
    let user_lemmas = user.lemma_counts();
    let target_lemmas = target.lemma_counts();
    let total: usize = target_lemmas.values().sum();
    if total == 0 {
        return 1.0;
    }
    let overlap: usize = target_lemmas
        .iter()
        .map(|(lemma, count)| user_lemmas.get(lemma).copied().unwrap_or(0).min(*count))
        .sum();
    overlap as f64 / total as f64
}

/// Whether the attempt shares a non-auxiliary verb lemma with the reference.
/// Vacuously true when the reference has no main verb.
pub fn shares_main_verb(user: &ParsedSentence, target: &ParsedSentence) -> bool {
    let target_verbs = target.main_verb_lemmas();
    if target_verbs.is_empty() {
        return true;
    }
    !target_verbs.is_disjoint(&user.main_verb_lemmas())
}

/// Count of attempt lemmas that exceed the reference's lemma counts.
fn extra_lemmas(user: &BTreeMap<String, usize>, target: &BTreeMap<String, usize>) -> usize {
    user.iter()
        .map(|(lemma, count)| count.saturating_sub(target.get(lemma).copied().unwrap_or(0)))
        .sum()
}

/// Run the gate. Returns the single blocking finding when the attempt is
/// not evaluable, `None` when grammar checks may proceed.
pub fn run_gate(
    user: &ParsedSentence,
    target: &ParsedSentence,
    rules: &RuleSet,
    target_text: &str,
) -> Option<GrammarResult> {
    let coverage_message = format!("The correct sentence is: {target_text}");

    // (a) Lexical coverage against the reference.
    let coverage = lemma_coverage(user, target);
    if coverage < rules.min_coverage {
        return Some(
            GrammarResult::blocking(ErrorType::InsufficientCoverage, coverage_message)
                .with_details(format!("coverage {coverage:.2}")),
        );
    }

    let user_lemmas = user.lemma_counts();
    let target_lemmas = target.lemma_counts();
    if extra_lemmas(&user_lemmas, &target_lemmas) > rules.max_extra_words {
        return Some(
            GrammarResult::blocking(ErrorType::InsufficientCoverage, coverage_message)
                .with_details("too many words outside the expected answer"),
        );
    }

    if !shares_main_verb(user, target) {
        return Some(
            GrammarResult::blocking(ErrorType::InsufficientCoverage, coverage_message)
                .with_details("main verb missing"),
        );
    }

    // Separate budgets for extra core words and extra modifiers.
    let mut extra_core = 0usize;
    let mut extra_modifiers = 0usize;
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for token in user.tokens().iter().filter(|t| t.is_alpha()) {
        let lemma = token.lemma_lower();
        let occurrence = seen.entry(lemma.clone()).or_insert(0);
        *occurrence += 1;
        if *occurrence <= target_lemmas.get(&lemma).copied().unwrap_or(0) {
            continue;
        }
        match token.pos {
            Pos::Noun | Pos::Propn | Pos::Verb => extra_core += 1,
            Pos::Adj | Pos::Adv => extra_modifiers += 1,
            _ => {}
        }
    }
    if extra_core > rules.max_extra_core || extra_modifiers > rules.max_extra_modifiers {
        return Some(
            GrammarResult::blocking(ErrorType::InsufficientCoverage, coverage_message)
                .with_details(format!(
                    "{extra_core} extra core words, {extra_modifiers} extra modifiers"
                )),
        );
    }

    // (b) The attempt must contain at least one finite verb.
    if user.finite_verb_indices().is_empty() {
        let whole_span: Vec<usize> = (0..user.len()).collect();
        return Some(
            GrammarResult::blocking(
                ErrorType::ParseFailure,
                format!(
                    "Your sentence could not be analyzed as a complete German sentence. \
                     The correct sentence is: {target_text}"
                ),
            )
            .with_spans(whole_span),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DepRel;
    use crate::testutil::{sent, tok};

    fn reference() -> ParsedSentence {
        // "Ich sehe den Hund."
        sent(vec![
            tok(0, "Ich", "ich", Pos::Pron, "Case=Nom", DepRel::Nsubj, 1),
            tok(1, "sehe", "sehen", Pos::Verb, "VerbForm=Fin", DepRel::Root, 1),
            tok(2, "den", "der", Pos::Det, "Case=Acc", DepRel::Det, 3),
            tok(3, "Hund", "Hund", Pos::Noun, "Case=Acc", DepRel::Obj, 1),
            tok(4, ".", ".", Pos::Punct, "", DepRel::Punct, 1),
        ])
    }

    fn gibberish() -> ParsedSentence {
        sent(vec![
            tok(0, "asdf", "asdf", Pos::X, "", DepRel::Root, 0),
            tok(1, "qwer", "qwer", Pos::X, "", DepRel::Other("dep".into()), 0),
        ])
    }

    #[test]
    fn gibberish_fails_coverage_with_single_blocking_result() {
        let rules = RuleSet::default();
        let target = reference();
        let result = run_gate(&gibberish(), &target, &rules, "Ich sehe den Hund.").unwrap();
        assert_eq!(result.error_type, ErrorType::InsufficientCoverage);
        assert!(result.blocking);
        assert!(result.message.contains("Ich sehe den Hund."));
    }

    #[test]
    fn matching_attempt_passes() {
        let rules = RuleSet::default();
        let target = reference();
        let user = reference();
        assert!(run_gate(&user, &target, &rules, "Ich sehe den Hund.").is_none());
    }

    #[test]
    fn verbless_attempt_is_a_parse_failure_citing_whole_span() {
        let rules = RuleSet::default();
        let target = reference();
        // Covers the reference lexically but has no finite verb.
        let user = sent(vec![
            tok(0, "Ich", "ich", Pos::Pron, "Case=Nom", DepRel::Nsubj, 3),
            tok(1, "sehen", "sehen", Pos::Verb, "VerbForm=Inf", DepRel::Root, 1),
            tok(2, "den", "der", Pos::Det, "Case=Acc", DepRel::Det, 3),
            tok(3, "Hund", "Hund", Pos::Noun, "Case=Acc", DepRel::Obj, 1),
        ]);
        let result = run_gate(&user, &target, &rules, "Ich sehe den Hund.").unwrap();
        assert_eq!(result.error_type, ErrorType::ParseFailure);
        assert_eq!(result.spans, vec![0, 1, 2, 3]);
    }

    #[test]
    fn missing_main_verb_blocks() {
        let rules = RuleSet::default();
        let target = reference();
        // High lexical overlap but a different verb.
        let user = sent(vec![
            tok(0, "Ich", "ich", Pos::Pron, "Case=Nom", DepRel::Nsubj, 1),
            tok(1, "esse", "essen", Pos::Verb, "VerbForm=Fin", DepRel::Root, 1),
            tok(2, "den", "der", Pos::Det, "Case=Acc", DepRel::Det, 3),
            tok(3, "Hund", "Hund", Pos::Noun, "Case=Acc", DepRel::Obj, 1),
            tok(4, ".", ".", Pos::Punct, "", DepRel::Punct, 1),
        ]);
        let result = run_gate(&user, &target, &rules, "Ich sehe den Hund.").unwrap();
        assert_eq!(result.error_type, ErrorType::InsufficientCoverage);
        assert_eq!(result.details.as_deref(), Some("main verb missing"));
    }

    #[test]
    fn coverage_is_one_for_empty_reference() {
        let user = gibberish();
        let target = sent(vec![tok(0, ".", ".", Pos::Punct, "", DepRel::Root, 0)]);
        assert!((lemma_coverage(&user, &target) - 1.0).abs() < f64::EPSILON);
    }
}
