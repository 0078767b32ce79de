//! Structural word-order checkers: main-clause V2 and subordinate
//! verb-final position.

use std::collections::BTreeSet;

use crate::model::{DepRel, ParsedSentence, Pos, Token};
use crate::results::{messages, ErrorType, GrammarResult};

use super::{CheckContext, Checker};

/// Main-clause verb-second check.
///
/// The finite verb must sit after exactly one constituent, not necessarily
/// one token: a full subject NP in the Vorfeld counts as a single
/// constituent. When the subject stands before the verb, anything else in
/// the Vorfeld that does not belong to the subject NP is a violation.
pub struct MainClauseV2;

impl Checker for MainClauseV2 {
    fn name(&self) -> &'static str {
        "main_clause_v2"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        let user = ctx.user;
        let Some(finite) = user.finite_verb_indices().first().copied() else {
            return Vec::new();
        };

        // Verb-second only binds main clauses; a finite verb whose clause
        // governs a subordinating conjunction is checked by the
        // verb-final rule instead.
        if let Some(head) = clause_head(user, finite) {
            if user
                .children(head)
                .any(|t| t.dep == DepRel::Mark || t.pos == Pos::Sconj)
            {
                return Vec::new();
            }
        }

        let vorfeld: Vec<&Token> = user
            .tokens()
            .iter()
            .filter(|t| t.index < finite && !t.is_punct())
            .collect();
        if vorfeld.is_empty() {
            return Vec::new();
        }

        // The subject may attach to the finite verb or to the clause root
        // (participle constructions put it on the root).
        let Some(subject) = find_subject(user, finite) else {
            return Vec::new();
        };

        // Subject after the verb (inversion) is a different construction;
        // this check only covers the subject-initial pattern.
        if subject >= finite {
            return Vec::new();
        }

        let subject_np: BTreeSet<usize> = user.subtree(subject).into_iter().collect();
        let offending: Vec<usize> = vorfeld
            .iter()
            .filter(|t| {
                !subject_np.contains(&t.index)
                    && !ctx.rules.vorfeld_modifiers.contains(&t.text.to_lowercase())
            })
            .map(|t| t.index)
            .collect();
        if offending.is_empty() {
            return Vec::new();
        }

        let offending_text: Vec<&str> = offending
            .iter()
            .filter_map(|&i| user.get(i).map(|t| t.text.as_str()))
            .collect();
        let mut spans = offending;
        spans.push(finite);
        spans.sort_unstable();

        vec![GrammarResult::new(ErrorType::V2Order, messages::MAIN_CLAUSE_V2)
            .with_spans(spans)
            .with_details(offending_text.join(" "))]
    }
}

/// Subordinate-clause verb-final check.
///
/// A clause is subordinate when its head governs a subordinating
/// conjunction (`mark` relation or SCONJ). The clause's finite verb must be
/// the last non-punctuation token of the clause's subtree. Sentences
/// without a subordinate clause silently produce nothing.
pub struct SubordinateVerbFinal;

impl Checker for SubordinateVerbFinal {
    fn name(&self) -> &'static str {
        "subordinate_verb_final"
    }

    fn inspect(&self, ctx: &CheckContext<'_>) -> Vec<GrammarResult> {
        let user = ctx.user;
        let mut findings = Vec::new();

        for finite in user.finite_verb_indices() {
            let Some(clause_head) = clause_head(user, finite) else {
                continue;
            };
            let governs_conjunction = user
                .children(clause_head)
                .any(|t| t.dep == DepRel::Mark || t.pos == Pos::Sconj);
            if !governs_conjunction {
                continue;
            }

            let clause = user.subtree(clause_head);
            let Some(last) = clause
                .iter()
                .rev()
                .find(|&&i| user.get(i).is_some_and(|t| !t.is_punct()))
                .copied()
            else {
                continue;
            };
            if last != finite {
                findings.push(
                    GrammarResult::new(ErrorType::VerbFinal, messages::SUBORDINATE_VERB_FINAL)
                        .with_spans(vec![finite, last])
                        .with_details(
                            user.get(finite).map(|t| t.text.clone()).unwrap_or_default(),
                        ),
                );
            }
        }

        findings
    }
}

/// Head of the clause a finite verb belongs to: the verb itself, or its
/// governor when the verb is a dependent auxiliary.
fn clause_head(sentence: &ParsedSentence, finite: usize) -> Option<usize> {
    let token = sentence.get(finite)?;
    if token.dep.is_auxiliary() {
        Some(token.head)
    } else {
        Some(finite)
    }
}

fn find_subject(sentence: &ParsedSentence, finite: usize) -> Option<usize> {
    let candidates: Vec<usize> = match sentence.root_verb_index() {
        Some(root) if root != finite => vec![finite, root],
        _ => vec![finite],
    };
    for head in candidates {
        if let Some(subject) = sentence
            .children(head)
            .find(|t| t.dep == DepRel::Nsubj)
            .map(|t| t.index)
        {
            return Some(subject);
        }
    }
    None
}
