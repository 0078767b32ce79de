//! Core data model types for satzcheck.
//!
//! These are the fundamental types the evaluation pipeline operates on:
//! the normalized token model produced by the adapter, the parsed sentence
//! it belongs to, and the flashcard records that supply reference sentences.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse universal part-of-speech tags, as emitted by the dependency parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pos {
    Noun,
    Propn,
    Verb,
    Aux,
    Adj,
    Adv,
    Det,
    Pron,
    Adp,
    Sconj,
    Cconj,
    Part,
    Num,
    Intj,
    Punct,
    Sym,
    /// Anything the parser could not classify.
    X,
}

impl Pos {
    /// Content-word classes considered for lexical coverage and spelling.
    pub fn is_content(self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn | Pos::Verb | Pos::Adj | Pos::Adv)
    }

    pub fn is_nominal(self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn)
    }

    pub fn is_verbal(self) -> bool {
        matches!(self, Pos::Verb | Pos::Aux)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pos::Noun => "NOUN",
            Pos::Propn => "PROPN",
            Pos::Verb => "VERB",
            Pos::Aux => "AUX",
            Pos::Adj => "ADJ",
            Pos::Adv => "ADV",
            Pos::Det => "DET",
            Pos::Pron => "PRON",
            Pos::Adp => "ADP",
            Pos::Sconj => "SCONJ",
            Pos::Cconj => "CCONJ",
            Pos::Part => "PART",
            Pos::Num => "NUM",
            Pos::Intj => "INTJ",
            Pos::Punct => "PUNCT",
            Pos::Sym => "SYM",
            Pos::X => "X",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Pos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOUN" => Ok(Pos::Noun),
            "PROPN" => Ok(Pos::Propn),
            "VERB" => Ok(Pos::Verb),
            "AUX" => Ok(Pos::Aux),
            "ADJ" => Ok(Pos::Adj),
            "ADV" => Ok(Pos::Adv),
            "DET" => Ok(Pos::Det),
            "PRON" => Ok(Pos::Pron),
            "ADP" => Ok(Pos::Adp),
            "SCONJ" => Ok(Pos::Sconj),
            "CCONJ" => Ok(Pos::Cconj),
            "PART" => Ok(Pos::Part),
            "NUM" => Ok(Pos::Num),
            "INTJ" => Ok(Pos::Intj),
            "PUNCT" => Ok(Pos::Punct),
            "SYM" => Ok(Pos::Sym),
            "X" => Ok(Pos::X),
            other => Err(format!("unknown POS tag: {other}")),
        }
    }
}

/// Syntactic dependency relations used by the checkers.
///
/// Relations the pipeline does not pattern-match on are preserved verbatim
/// in `Other` so spans and debug output stay faithful to the parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DepRel {
    Root,
    Nsubj,
    Obj,
    Iobj,
    Obl,
    Det,
    Case,
    Mark,
    Aux,
    AuxPass,
    Cop,
    Advmod,
    Amod,
    Nmod,
    Conj,
    Cc,
    Punct,
    Other(String),
}

impl DepRel {
    pub fn parse_rel(s: &str) -> DepRel {
        match s.to_lowercase().as_str() {
            "root" => DepRel::Root,
            "nsubj" | "sb" => DepRel::Nsubj,
            "obj" | "oa" => DepRel::Obj,
            "iobj" | "da" => DepRel::Iobj,
            "obl" => DepRel::Obl,
            "det" => DepRel::Det,
            "case" => DepRel::Case,
            "mark" => DepRel::Mark,
            "aux" => DepRel::Aux,
            "aux:pass" => DepRel::AuxPass,
            "cop" => DepRel::Cop,
            "advmod" => DepRel::Advmod,
            "amod" => DepRel::Amod,
            "nmod" => DepRel::Nmod,
            "conj" => DepRel::Conj,
            "cc" => DepRel::Cc,
            "punct" => DepRel::Punct,
            other => DepRel::Other(other.to_string()),
        }
    }

    /// Relations that mark a token as a dependent auxiliary of its clause head.
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, DepRel::Aux | DepRel::AuxPass | DepRel::Cop)
    }
}

/// Grammatical case, as read from the morphological `Case` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    Nominative,
    Accusative,
    Dative,
    Genitive,
}

impl Case {
    pub fn parse_feature(value: &str) -> Option<Case> {
        match value {
            "Nom" => Some(Case::Nominative),
            "Acc" => Some(Case::Accusative),
            "Dat" => Some(Case::Dative),
            "Gen" => Some(Case::Genitive),
            _ => None,
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Case::Nominative => "nominative",
            Case::Accusative => "accusative",
            Case::Dative => "dative",
            Case::Genitive => "genitive",
        };
        write!(f, "{s}")
    }
}

/// Morphological features of a token (`Case=Acc|Number=Sing|…`).
///
/// Stored as an ordered map so identical parses always compare and iterate
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Morph(BTreeMap<String, String>);

impl Morph {
    /// Parse a CoNLL-U style feature string. `_` and the empty string mean
    /// "no features".
    pub fn parse(feats: &str) -> Morph {
        let mut map = BTreeMap::new();
        if feats.is_empty() || feats == "_" {
            return Morph(map);
        }
        for pair in feats.split('|') {
            if let Some((key, value)) = pair.split_once('=') {
                map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Morph(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn case(&self) -> Option<Case> {
        self.get("Case").and_then(Case::parse_feature)
    }

    pub fn is_finite(&self) -> bool {
        self.get("VerbForm") == Some("Fin")
    }

    pub fn is_participle(&self) -> bool {
        self.get("VerbForm") == Some("Part")
    }

    pub fn person(&self) -> Option<u8> {
        self.get("Person").and_then(|p| p.parse().ok())
    }

    pub fn is_plural(&self) -> bool {
        self.get("Number") == Some("Plur")
    }

    pub fn pron_type(&self) -> Option<&str> {
        self.get("PronType")
    }
}

/// One word or punctuation unit of a parsed sentence.
///
/// Immutable once produced by the adapter; `index` is stable and used for
/// UI highlighting spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// 0-based position in the sentence.
    pub index: usize,
    pub text: String,
    pub lemma: String,
    pub pos: Pos,
    pub morph: Morph,
    pub dep: DepRel,
    /// Index of the governing token; equals `index` for the root.
    pub head: usize,
    /// True when the parser could not resolve the token against its lexicon.
    pub oov: bool,
}

impl Token {
    pub fn is_alpha(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }

    pub fn is_punct(&self) -> bool {
        self.pos == Pos::Punct
    }

    pub fn is_finite_verb(&self) -> bool {
        self.pos.is_verbal() && self.morph.is_finite()
    }

    pub fn lemma_lower(&self) -> String {
        self.lemma.to_lowercase()
    }
}

/// An ordered, immutable sequence of tokens with a derived root verb.
///
/// Owned exclusively by the evaluation call that created it; never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct ParsedSentence {
    tokens: Vec<Token>,
    root_verb_index: Option<usize>,
}

impl ParsedSentence {
    pub fn new(tokens: Vec<Token>) -> ParsedSentence {
        let root_verb_index = tokens
            .iter()
            .find(|t| t.dep == DepRel::Root && t.pos.is_verbal())
            .or_else(|| tokens.iter().find(|t| t.is_finite_verb()))
            .map(|t| t.index);
        ParsedSentence {
            tokens,
            root_verb_index,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn root_verb_index(&self) -> Option<usize> {
        self.root_verb_index
    }

    /// Token texts, in order, for UI alignment.
    pub fn texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Direct dependents of the token at `index`.
    pub fn children(&self, index: usize) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(move |t| t.head == index && t.index != index)
    }

    /// All token indices governed (transitively) by `index`, including
    /// `index` itself, in sentence order.
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        let mut members = BTreeSet::new();
        let mut queue = vec![index];
        while let Some(current) = queue.pop() {
            if !members.insert(current) {
                continue;
            }
            for child in self.children(current) {
                queue.push(child.index);
            }
        }
        members.into_iter().collect()
    }

    /// Indices of all finite verbs (VERB or AUX with `VerbForm=Fin`).
    pub fn finite_verb_indices(&self) -> Vec<usize> {
        self.tokens
            .iter()
            .filter(|t| t.is_finite_verb())
            .map(|t| t.index)
            .collect()
    }

    /// Lowercased lemma counts over alphabetic tokens.
    pub fn lemma_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for token in self.tokens.iter().filter(|t| t.is_alpha()) {
            *counts.entry(token.lemma_lower()).or_insert(0) += 1;
        }
        counts
    }

    /// Lemmas of non-auxiliary verbs, used for the shared-main-verb check.
    pub fn main_verb_lemmas(&self) -> BTreeSet<String> {
        self.tokens
            .iter()
            .filter(|t| t.pos == Pos::Verb && !t.dep.is_auxiliary())
            .map(|t| t.lemma_lower())
            .collect()
    }

    /// Lowercased texts of alphabetic tokens, in order.
    pub fn alpha_texts(&self) -> Vec<String> {
        self.tokens
            .iter()
            .filter(|t| t.is_alpha())
            .map(|t| t.text.to_lowercase())
            .collect()
    }
}

/// The grammar concept a flashcard targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarFocus {
    PerfektAuxiliary,
    MainClauseV2,
    SubordinateVerbFinal,
    NounCapitalization,
    AccusativeDative,
}

impl fmt::Display for GrammarFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrammarFocus::PerfektAuxiliary => "perfekt_auxiliary",
            GrammarFocus::MainClauseV2 => "main_clause_v2",
            GrammarFocus::SubordinateVerbFinal => "subordinate_verb_final",
            GrammarFocus::NounCapitalization => "noun_capitalization",
            GrammarFocus::AccusativeDative => "accusative_dative",
        };
        write!(f, "{s}")
    }
}

impl FromStr for GrammarFocus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "perfekt_auxiliary" | "perfekt_auxiliary_sein_vs_haben" => {
                Ok(GrammarFocus::PerfektAuxiliary)
            }
            "main_clause_v2" | "verb_position_main_clause_v2" => Ok(GrammarFocus::MainClauseV2),
            "subordinate_verb_final" | "verb_position_subordinate_clause" => {
                Ok(GrammarFocus::SubordinateVerbFinal)
            }
            "noun_capitalization" => Ok(GrammarFocus::NounCapitalization),
            "accusative_dative" | "accusative_dative_prepositions"
            | "accusative_vs_dative_prepositions" => Ok(GrammarFocus::AccusativeDative),
            other => Err(format!("unknown grammar focus: {other}")),
        }
    }
}

/// A single flashcard: an English prompt with its canonical German answer.
///
/// Read-only reference data; the pipeline never creates or mutates cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    /// Unique identifier of the flashcard.
    pub id: u32,
    /// English text shown to the learner.
    pub english_prompt: String,
    /// Canonical German translation.
    pub target_german: String,
    /// Grammar concept this card targets.
    pub grammar_focus: GrammarFocus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sent, tok};

    #[test]
    fn pos_display_and_parse() {
        assert_eq!(Pos::Noun.to_string(), "NOUN");
        assert_eq!("noun".parse::<Pos>().unwrap(), Pos::Noun);
        assert_eq!("SCONJ".parse::<Pos>().unwrap(), Pos::Sconj);
        assert!("VERBISH".parse::<Pos>().is_err());
    }

    #[test]
    fn deprel_parse_keeps_unknown_relations() {
        assert_eq!(DepRel::parse_rel("nsubj"), DepRel::Nsubj);
        assert_eq!(DepRel::parse_rel("aux:pass"), DepRel::AuxPass);
        assert_eq!(
            DepRel::parse_rel("advcl"),
            DepRel::Other("advcl".to_string())
        );
    }

    #[test]
    fn morph_feature_parsing() {
        let m = Morph::parse("Case=Acc|Number=Sing|Person=3|VerbForm=Fin");
        assert_eq!(m.case(), Some(Case::Accusative));
        assert!(m.is_finite());
        assert!(!m.is_plural());
        assert_eq!(m.person(), Some(3));
        assert!(Morph::parse("_").get("Case").is_none());
    }

    #[test]
    fn subtree_collects_transitive_dependents() {
        // "der Hund schläft" — det(1←0), nsubj(2←1), root(2)
        let s = sent(vec![
            tok(0, "der", "der", Pos::Det, "Case=Nom", DepRel::Det, 1),
            tok(1, "Hund", "Hund", Pos::Noun, "Case=Nom", DepRel::Nsubj, 2),
            tok(
                2,
                "schläft",
                "schlafen",
                Pos::Verb,
                "VerbForm=Fin",
                DepRel::Root,
                2,
            ),
        ]);
        assert_eq!(s.subtree(1), vec![0, 1]);
        assert_eq!(s.subtree(2), vec![0, 1, 2]);
        assert_eq!(s.root_verb_index(), Some(2));
        assert_eq!(s.finite_verb_indices(), vec![2]);
    }

    #[test]
    fn lemma_counts_lowercase_alpha_only() {
        let s = sent(vec![
            tok(0, "Der", "der", Pos::Det, "", DepRel::Det, 1),
            tok(1, "Hund", "Hund", Pos::Noun, "", DepRel::Nsubj, 2),
            tok(
                2,
                "schläft",
                "schlafen",
                Pos::Verb,
                "VerbForm=Fin",
                DepRel::Root,
                2,
            ),
            tok(3, ".", ".", Pos::Punct, "", DepRel::Punct, 2),
        ]);
        let counts = s.lemma_counts();
        assert_eq!(counts.get("hund"), Some(&1));
        assert_eq!(counts.get("."), None);
        assert_eq!(s.main_verb_lemmas().into_iter().collect::<Vec<_>>(), vec![
            "schlafen".to_string()
        ]);
    }

    #[test]
    fn grammar_focus_accepts_long_forms() {
        assert_eq!(
            "perfekt_auxiliary_sein_vs_haben"
                .parse::<GrammarFocus>()
                .unwrap(),
            GrammarFocus::PerfektAuxiliary
        );
        assert_eq!(
            "verb_position_main_clause_v2".parse::<GrammarFocus>().unwrap(),
            GrammarFocus::MainClauseV2
        );
        assert!("conjunctive_ii".parse::<GrammarFocus>().is_err());
    }
}
