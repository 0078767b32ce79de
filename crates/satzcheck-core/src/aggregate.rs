//! Result aggregation: blocking short-circuit, severity ranking,
//! truncation, meaning verdict, and the near-miss encouragement record.

use crate::gate::{lemma_coverage, shares_main_verb};
use crate::model::ParsedSentence;
use crate::results::{
    ErrorType, EvaluationResult, GrammarResult, MAX_REPORTED_ERRORS,
};
use crate::rules::RuleSet;

/// Build the final response from everything the checkers emitted.
///
/// A blocking finding suppresses all non-blocking ones and forces
/// `meaning_conveyed = false`. Otherwise findings are stable-sorted by the
/// fixed priority table (emission order breaks ties) and truncated to
/// [`MAX_REPORTED_ERRORS`]. The meaning verdict is computed independently
/// of the error list from coarse lexical overlap.
pub fn aggregate(
    user: &ParsedSentence,
    target: &ParsedSentence,
    rules: &RuleSet,
    target_text: &str,
    findings: Vec<GrammarResult>,
) -> EvaluationResult {
    let tokens = user.texts();

    if findings.iter().any(|f| f.blocking) {
        let errors: Vec<GrammarResult> = findings.into_iter().filter(|f| f.blocking).collect();
        return EvaluationResult {
            meaning_conveyed: false,
            correct_sentence: target_text.to_string(),
            tokens,
            errors,
        };
    }

    let mut errors = findings;
    errors.sort_by_key(|f| f.priority);
    errors.truncate(MAX_REPORTED_ERRORS);

    // Encouragement only: deviations already explained by a grammar rule
    // must not be double-reported.
    if errors.is_empty() {
        if let Some(record) = near_miss(user, target, target_text) {
            errors.push(record);
        }
    }

    EvaluationResult {
        meaning_conveyed: meaning_conveyed(user, target, rules),
        correct_sentence: target_text.to_string(),
        tokens,
        errors,
    }
}

/// Coarse lexical/structural meaning verdict: enough of the reference's
/// lemmas are covered and the main verb matches. Not a semantic model.
pub fn meaning_conveyed(
    user: &ParsedSentence,
    target: &ParsedSentence,
    rules: &RuleSet,
) -> bool {
    lemma_coverage(user, target) >= rules.min_coverage && shares_main_verb(user, target)
}

/// Word-for-word comparison against the reference. Any positional deviation
/// that no grammar rule claimed produces a single NEAR_MISS encouragement
/// record.
fn near_miss(
    user: &ParsedSentence,
    target: &ParsedSentence,
    target_text: &str,
) -> Option<GrammarResult> {
    let user_words = user.alpha_texts();
    let target_words = target.alpha_texts();

    let mismatches = user_words
        .iter()
        .zip(target_words.iter())
        .filter(|(u, t)| u != t)
        .count();
    let length_delta = user_words.len().abs_diff(target_words.len());

    if mismatches + length_delta > 0 {
        Some(GrammarResult::new(
            ErrorType::NearMiss,
            format!("Very close! The correct sentence is: {target_text}"),
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DepRel, Pos};
    use crate::testutil::{sent, tok};

    fn simple_sentence(texts: &[(&str, &str)]) -> ParsedSentence {
        sent(
            texts
                .iter()
                .enumerate()
                .map(|(i, (text, lemma))| {
                    let pos = if *lemma == "sehen" || *lemma == "schlafen" {
                        Pos::Verb
                    } else {
                        Pos::Noun
                    };
                    let feats = if pos == Pos::Verb { "VerbForm=Fin" } else { "" };
                    tok(i, text, lemma, pos, feats, DepRel::Other("dep".into()), 0)
                })
                .collect(),
        )
    }

    fn fixture() -> (ParsedSentence, ParsedSentence) {
        let user = simple_sentence(&[("ich", "ich"), ("sehe", "sehen"), ("Hund", "Hund")]);
        let target = simple_sentence(&[("Ich", "ich"), ("sehe", "sehen"), ("Hund", "Hund")]);
        (user, target)
    }

    fn finding(error_type: ErrorType) -> GrammarResult {
        GrammarResult::new(error_type, "x")
    }

    #[test]
    fn blocking_finding_is_exclusive_and_fails_meaning() {
        let (user, target) = fixture();
        let rules = RuleSet::default();
        let findings = vec![
            finding(ErrorType::Spelling),
            GrammarResult::blocking(ErrorType::InsufficientCoverage, "blocked"),
            finding(ErrorType::NounCapitalization),
        ];
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings);
        assert!(!result.meaning_conveyed);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].blocking);
        assert_eq!(result.errors[0].error_type, ErrorType::InsufficientCoverage);
    }

    #[test]
    fn findings_are_sorted_by_priority_then_emission_order() {
        let (user, target) = fixture();
        let rules = RuleSet::default();
        let first_cap = finding(ErrorType::NounCapitalization).with_details("first");
        let second_cap = finding(ErrorType::NounCapitalization).with_details("second");
        let findings = vec![
            finding(ErrorType::Spelling),
            first_cap.clone(),
            finding(ErrorType::V2Order),
            second_cap.clone(),
        ];
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings);
        let order: Vec<ErrorType> = result.errors.iter().map(|e| e.error_type).collect();
        assert_eq!(
            order,
            vec![
                ErrorType::V2Order,
                ErrorType::NounCapitalization,
                ErrorType::NounCapitalization,
                ErrorType::Spelling,
            ]
        );
        // Stable sort keeps emission order within equal priorities.
        assert_eq!(result.errors[1].details.as_deref(), Some("first"));
        assert_eq!(result.errors[2].details.as_deref(), Some("second"));
    }

    #[test]
    fn error_list_is_capped_at_five() {
        let (user, target) = fixture();
        let rules = RuleSet::default();
        let findings = (0..8).map(|_| finding(ErrorType::Spelling)).collect();
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings);
        assert_eq!(result.errors.len(), 5);
    }

    #[test]
    fn unexplained_deviation_becomes_a_near_miss() {
        let user = simple_sentence(&[("ich", "ich"), ("sah", "sehen"), ("Hund", "Hund")]);
        let target = simple_sentence(&[("Ich", "ich"), ("sehe", "sehen"), ("Hund", "Hund")]);
        let rules = RuleSet::default();
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", vec![]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::NearMiss);
        assert!(result.errors[0].message.contains("Very close"));
    }

    #[test]
    fn near_miss_is_suppressed_when_a_rule_matched() {
        let user = simple_sentence(&[("ich", "ich"), ("sah", "sehen"), ("Hund", "Hund")]);
        let target = simple_sentence(&[("Ich", "ich"), ("sehe", "sehen"), ("Hund", "Hund")]);
        let rules = RuleSet::default();
        let findings = vec![finding(ErrorType::Spelling)];
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error_type, ErrorType::Spelling);
    }

    #[test]
    fn clean_attempt_yields_no_errors_and_meaning_true() {
        let (user, target) = fixture();
        let rules = RuleSet::default();
        let result = aggregate(&user, &target, &rules, "Ich sehe den Hund.", vec![]);
        assert!(result.meaning_conveyed);
        assert!(result.errors.is_empty());
        assert_eq!(result.correct_sentence, "Ich sehe den Hund.");
        assert_eq!(result.tokens, vec!["ich", "sehe", "Hund"]);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let (user, target) = fixture();
        let rules = RuleSet::default();
        let findings = || {
            vec![
                finding(ErrorType::Spelling),
                finding(ErrorType::V2Order),
                finding(ErrorType::TokenMismatch),
            ]
        };
        let a = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings());
        let b = aggregate(&user, &target, &rules, "Ich sehe den Hund.", findings());
        assert_eq!(a, b);
    }
}
