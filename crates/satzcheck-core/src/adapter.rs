//! Parsed sentence adapter.
//!
//! Normalizes the raw output of a parsing backend into the immutable token
//! model. This is the only place raw parser output is trusted-but-verified:
//! anything structurally broken is rejected with a `ParserError`, which the
//! evaluator reports as a single blocking PARSE_FAILURE finding.

use crate::error::ParserError;
use crate::model::{DepRel, Morph, ParsedSentence, Pos, Token};
use crate::traits::RawParse;

/// Normalize raw parser output into a [`ParsedSentence`].
///
/// Token indices are assigned contiguously from sentence order. Unknown POS
/// tags degrade to [`Pos::X`]; unknown dependency relations are preserved
/// verbatim. Head indices outside the sentence are a hard failure.
pub fn adapt(raw: &RawParse) -> Result<ParsedSentence, ParserError> {
    if raw.tokens.is_empty() {
        return Err(ParserError::EmptyParse);
    }

    let len = raw.tokens.len();
    let mut tokens = Vec::with_capacity(len);

    for (index, raw_token) in raw.tokens.iter().enumerate() {
        if raw_token.text.trim().is_empty() {
            return Err(ParserError::Malformed(format!(
                "token {index} has empty text"
            )));
        }
        if raw_token.head >= len {
            return Err(ParserError::Malformed(format!(
                "token {index} has head {} outside sentence of length {len}",
                raw_token.head
            )));
        }

        let lemma = if raw_token.lemma.is_empty() {
            raw_token.text.to_lowercase()
        } else {
            raw_token.lemma.clone()
        };

        tokens.push(Token {
            index,
            text: raw_token.text.clone(),
            lemma,
            pos: raw_token.upos.parse().unwrap_or(Pos::X),
            morph: Morph::parse(&raw_token.feats),
            dep: DepRel::parse_rel(&raw_token.deprel),
            head: raw_token.head,
            oov: raw_token.oov,
        });
    }

    Ok(ParsedSentence::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RawToken;

    fn raw(text: &str, upos: &str, deprel: &str, head: usize) -> RawToken {
        RawToken {
            text: text.to_string(),
            lemma: text.to_lowercase(),
            upos: upos.to_string(),
            feats: String::new(),
            deprel: deprel.to_string(),
            head,
            oov: false,
        }
    }

    #[test]
    fn empty_parse_is_rejected() {
        let err = adapt(&RawParse { tokens: vec![] }).unwrap_err();
        assert!(matches!(err, ParserError::EmptyParse));
    }

    #[test]
    fn out_of_range_head_is_rejected() {
        let raw_parse = RawParse {
            tokens: vec![raw("Hallo", "INTJ", "root", 7)],
        };
        let err = adapt(&raw_parse).unwrap_err();
        assert!(matches!(err, ParserError::Malformed(_)));
    }

    #[test]
    fn unknown_pos_degrades_to_x() {
        let raw_parse = RawParse {
            tokens: vec![raw("blorp", "WEIRD", "root", 0)],
        };
        let sentence = adapt(&raw_parse).unwrap();
        assert_eq!(sentence.get(0).unwrap().pos, Pos::X);
    }

    #[test]
    fn indices_are_contiguous_and_stable() {
        let raw_parse = RawParse {
            tokens: vec![
                raw("Ich", "PRON", "nsubj", 1),
                raw("schlafe", "VERB", "root", 1),
                raw(".", "PUNCT", "punct", 1),
            ],
        };
        let sentence = adapt(&raw_parse).unwrap();
        let indices: Vec<usize> = sentence.tokens().iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_lemma_falls_back_to_lowercased_text() {
        let mut token = raw("Hund", "NOUN", "root", 0);
        token.lemma = String::new();
        let sentence = adapt(&RawParse {
            tokens: vec![token],
        })
        .unwrap();
        assert_eq!(sentence.get(0).unwrap().lemma, "hund");
    }
}
