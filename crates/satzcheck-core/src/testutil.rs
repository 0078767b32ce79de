//! Shared fixtures for the unit tests in this crate.

use crate::checks::CheckContext;
use crate::model::{DepRel, Flashcard, GrammarFocus, Morph, ParsedSentence, Pos, Token};
use crate::rules::RuleSet;

pub(crate) fn tok(
    index: usize,
    text: &str,
    lemma: &str,
    pos: Pos,
    feats: &str,
    dep: DepRel,
    head: usize,
) -> Token {
    Token {
        index,
        text: text.to_string(),
        lemma: lemma.to_string(),
        pos,
        morph: Morph::parse(feats),
        dep,
        head,
        oov: false,
    }
}

pub(crate) fn tok_oov(
    index: usize,
    text: &str,
    lemma: &str,
    pos: Pos,
    feats: &str,
    dep: DepRel,
    head: usize,
) -> Token {
    Token {
        oov: true,
        ..tok(index, text, lemma, pos, feats, dep, head)
    }
}

pub(crate) fn sent(tokens: Vec<Token>) -> ParsedSentence {
    ParsedSentence::new(tokens)
}

pub(crate) fn card() -> Flashcard {
    Flashcard {
        id: 1,
        english_prompt: "I see the dog.".to_string(),
        target_german: "Ich sehe den Hund.".to_string(),
        grammar_focus: GrammarFocus::NounCapitalization,
    }
}

pub(crate) fn ctx_over<'a>(
    user: &'a ParsedSentence,
    target: &'a ParsedSentence,
    rules: &'a RuleSet,
    card: &'a Flashcard,
) -> CheckContext<'a> {
    CheckContext {
        user,
        target,
        rules,
        card,
    }
}
