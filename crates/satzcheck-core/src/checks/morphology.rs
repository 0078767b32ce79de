//! Morphological checkers: noun capitalization, Perfekt auxiliary
//! selection, and case after governing prepositions.

use tracing::debug;

use crate::model::{Case, DepRel, ParsedSentence, Pos, Token};
use crate::results::{messages, ErrorType, GrammarResult};
use crate::rules::PrepCase;

use super::{CheckContext, Checker};

/// Every common or proper noun must start with an uppercase letter.
///
/// One finding per violating token; merging repeated violations into one
/// display item is the presentation layer's concern.
pub struct NounCapitalization;

impl Checker for NounCapitalization {
    fn name(&self) -> &'static str {
        "noun_capitalization"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        ctx.user
            .tokens()
            .iter()
            .filter(|t| t.pos.is_nominal() && !t.oov && starts_lowercase(t))
            .map(|t| {
                GrammarResult::new(
                    ErrorType::NounCapitalization,
                    format!(
                        "{} Capitalize: '{}'.",
                        messages::NOUN_CAPITALIZATION,
                        t.text
                    ),
                )
                .with_spans(vec![t.index])
                .with_details(t.text.clone())
            })
            .collect()
    }
}

fn starts_lowercase(token: &Token) -> bool {
    token
        .text
        .chars()
        .next()
        .map(char::is_lowercase)
        .unwrap_or(false)
}

/// Perfekt auxiliary selection: *sein* for the motion/change-of-state verb
/// class, *haben* otherwise.
pub struct PerfektAuxiliary;

impl Checker for PerfektAuxiliary {
    fn name(&self) -> &'static str {
        "perfekt_auxiliary"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        let user = ctx.user;

        let Some(participle) = user
            .tokens()
            .iter()
            .rev()
            .find(|t| t.pos.is_verbal() && t.morph.is_participle())
        else {
            return Vec::new();
        };
        let Some(auxiliary) = user
            .tokens()
            .iter()
            .rev()
            .find(|t| t.pos == Pos::Aux && t.morph.is_finite())
        else {
            return Vec::new();
        };

        let actual_lemma = auxiliary.lemma_lower();
        // Only sein/haben form the Perfekt; werden marks future or passive.
        if actual_lemma != "sein" && actual_lemma != "haben" {
            return Vec::new();
        }

        let expected_lemma = ctx.rules.perfekt_auxiliary(&participle.lemma_lower());
        if actual_lemma == expected_lemma {
            return Vec::new();
        }

        let person = auxiliary.morph.person().unwrap_or(3);
        let plural = auxiliary.morph.is_plural();
        let expected_form = ctx
            .rules
            .conjugate_aux(expected_lemma, person, plural)
            .unwrap_or(expected_lemma);

        let mut spans = vec![auxiliary.index, participle.index];
        spans.sort_unstable();

        vec![GrammarResult::new(
            ErrorType::AuxSelection,
            format!(
                "This verb forms the Perfekt with '{expected_lemma}': expected '{expected_form}', \
                 but you used '{}'.",
                auxiliary.text
            ),
        )
        .with_spans(spans)
        .with_details(format!("{} -> {expected_form}", auxiliary.text))]
    }
}

/// Case after governing prepositions.
///
/// Always-accusative and always-dative prepositions come from a fixed
/// table. Two-way prepositions are resolved by the directed-motion
/// heuristic in [`crate::rules::RuleSet::required_case`]; that rule is
/// best-effort and known to misjudge some location/direction readings.
pub struct PrepositionCase;

impl Checker for PrepositionCase {
    fn name(&self) -> &'static str {
        "preposition_case"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        let user = ctx.user;
        let root_lemma = user
            .root_verb_index()
            .and_then(|i| user.get(i))
            .map(|t| t.lemma_lower());
        let mut findings = Vec::new();

        for prep in user
            .tokens()
            .iter()
            .filter(|t| t.pos == Pos::Adp && t.dep == DepRel::Case)
        {
            let lemma = prep.lemma_lower();
            let Some(required) = ctx.rules.required_case(&lemma, root_lemma.as_deref()) else {
                continue;
            };
            if ctx.rules.preposition_case(&lemma) == Some(PrepCase::TwoWay) {
                debug!(
                    preposition = %prep.text,
                    required = %required,
                    "two-way preposition resolved via verb class"
                );
            }

            let Some((actual, carrier)) = governed_case(user, prep) else {
                continue;
            };
            if actual == required {
                continue;
            }

            let mut spans = vec![prep.index, carrier.index];
            spans.sort_unstable();
            findings.push(
                GrammarResult::new(
                    ErrorType::AccusativeDative,
                    format!(
                        "The preposition '{}' takes the {required} case here, but '{}' is in the \
                         {actual} case.",
                        prep.text, carrier.text
                    ),
                )
                .with_spans(spans)
                .with_details(carrier.text.clone()),
            );
        }

        findings
    }
}

/// The case actually used in the noun phrase a preposition attaches to:
/// read from the governed noun, falling back to its determiner.
fn governed_case<'a>(
    sentence: &'a ParsedSentence,
    prep: &Token,
) -> Option<(Case, &'a Token)> {
    let noun = sentence.get(prep.head)?;
    if let Some(case) = noun.morph.case() {
        return Some((case, noun));
    }
    sentence
        .children(noun.index)
        .find(|t| t.dep == DepRel::Det)
        .and_then(|det| det.morph.case().map(|case| (case, det)))
}
