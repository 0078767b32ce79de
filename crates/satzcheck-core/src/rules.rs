//! Fixed rule tables and tunable thresholds.
//!
//! Everything here is read-only after construction: build one `RuleSet` at
//! process start, wrap it in an `Arc`, and share it across all concurrent
//! evaluations. Thresholds are plain fields so deployments can tune the
//! heuristic parts (notably the two-way preposition rule) without touching
//! checker code.

use std::collections::BTreeSet;

use crate::model::Case;

/// Case requirement of a preposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepCase {
    Accusative,
    Dative,
    /// Wechselpräposition: accusative with direction, dative with location.
    TwoWay,
}

/// Verbs that form the Perfekt with *sein* (motion / change of state).
const SEIN_VERBS: &[&str] = &[
    "sein",
    "werden",
    "bleiben",
    "sterben",
    "passieren",
    "geschehen",
    "gelingen",
    "misslingen",
    "wachsen",
    "verschwinden",
    "gehen",
    "kommen",
    "fahren",
    "laufen",
    "fliegen",
    "reisen",
    "rennen",
    "steigen",
    "fallen",
    "ziehen",
    "wandern",
    "aufstehen",
    "hinsetzen",
    "ankommen",
    "abfahren",
    "aussteigen",
    "einsteigen",
    "zurückkommen",
    "mitkommen",
    "weggehen",
    "einschlafen",
    "aufwachen",
    "erwachen",
    "altern",
    "verwelken",
];

/// Verbs of directed motion or placement, used to resolve two-way
/// prepositions toward the accusative.
const MOTION_VERBS: &[&str] = &[
    "gehen", "kommen", "fahren", "laufen", "fliegen", "reisen", "rennen", "steigen", "fallen",
    "ziehen", "wandern", "springen", "legen", "stellen", "setzen", "hängen", "stecken", "werfen",
];

const ACCUSATIVE_PREPS: &[&str] = &["bis", "durch", "entlang", "für", "gegen", "ohne", "um"];

const DATIVE_PREPS: &[&str] = &[
    "ab", "aus", "bei", "gegenüber", "mit", "nach", "seit", "von", "zu",
];

const TWO_WAY_PREPS: &[&str] = &[
    "an", "auf", "hinter", "in", "neben", "über", "unter", "vor", "zwischen",
];

/// Read-only rule tables plus the tunable thresholds of the pipeline.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub sein_verbs: BTreeSet<String>,
    pub motion_verbs: BTreeSet<String>,
    pub accusative_preps: BTreeSet<String>,
    pub dative_preps: BTreeSet<String>,
    pub two_way_preps: BTreeSet<String>,
    /// Minimum fraction of reference lemmas the attempt must cover.
    pub min_coverage: f64,
    /// Maximum content words absent from the reference.
    pub max_extra_words: usize,
    /// Budget for extra core words (nouns, verbs, proper nouns).
    pub max_extra_core: usize,
    /// Budget for extra modifiers (adjectives, adverbs).
    pub max_extra_modifiers: usize,
    /// Allowed token-count delta before TOKEN_MISMATCH fires.
    pub token_tolerance: usize,
    /// Degree words tolerated inside the Vorfeld next to the subject.
    pub vorfeld_modifiers: BTreeSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        let to_set = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        RuleSet {
            sein_verbs: to_set(SEIN_VERBS),
            motion_verbs: to_set(MOTION_VERBS),
            accusative_preps: to_set(ACCUSATIVE_PREPS),
            dative_preps: to_set(DATIVE_PREPS),
            two_way_preps: to_set(TWO_WAY_PREPS),
            min_coverage: 0.6,
            max_extra_words: 2,
            max_extra_core: 1,
            max_extra_modifiers: 2,
            token_tolerance: 2,
            vorfeld_modifiers: to_set(&["nur", "sehr", "mit"]),
        }
    }
}

impl RuleSet {
    /// The auxiliary lemma a verb forms its Perfekt with.
    pub fn perfekt_auxiliary(&self, participle_lemma: &str) -> &'static str {
        if self.sein_verbs.contains(participle_lemma) {
            "sein"
        } else {
            "haben"
        }
    }

    /// Look up the case requirement of a preposition lemma, if governed.
    pub fn preposition_case(&self, lemma: &str) -> Option<PrepCase> {
        if self.accusative_preps.contains(lemma) {
            Some(PrepCase::Accusative)
        } else if self.dative_preps.contains(lemma) {
            Some(PrepCase::Dative)
        } else if self.two_way_preps.contains(lemma) {
            Some(PrepCase::TwoWay)
        } else {
            None
        }
    }

    /// Resolve a preposition's required case. Two-way prepositions use the
    /// directed-motion heuristic: accusative when the clause's main verb is
    /// in the motion class, dative otherwise. Known to produce occasional
    /// false positives; tune via [`RuleSet::motion_verbs`].
    pub fn required_case(&self, prep_lemma: &str, root_verb_lemma: Option<&str>) -> Option<Case> {
        match self.preposition_case(prep_lemma)? {
            PrepCase::Accusative => Some(Case::Accusative),
            PrepCase::Dative => Some(Case::Dative),
            PrepCase::TwoWay => {
                let motion = root_verb_lemma
                    .map(|lemma| self.motion_verbs.contains(lemma))
                    .unwrap_or(false);
                if motion {
                    Some(Case::Accusative)
                } else {
                    Some(Case::Dative)
                }
            }
        }
    }

    /// Present-tense form of *sein* or *haben* for the given person/number.
    pub fn conjugate_aux(&self, lemma: &str, person: u8, plural: bool) -> Option<&'static str> {
        let form = match (lemma, person, plural) {
            ("sein", 1, false) => "bin",
            ("sein", 2, false) => "bist",
            ("sein", 3, false) => "ist",
            ("sein", 2, true) => "seid",
            ("sein", _, true) => "sind",
            ("haben", 1, false) => "habe",
            ("haben", 2, false) => "hast",
            ("haben", 3, false) => "hat",
            ("haben", 2, true) => "habt",
            ("haben", _, true) => "haben",
            _ => return None,
        };
        Some(form)
    }
}
