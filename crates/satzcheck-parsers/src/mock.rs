//! Mock parser for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use satzcheck_core::error::ParserError;
use satzcheck_core::traits::{DependencyParser, RawParse, RawToken};

/// An in-process parser for exercising the pipeline without a real model.
///
/// Returns canned parses keyed by exact sentence text. Unknown sentences
/// fall back to a flat whitespace tokenization with no usable annotations,
/// which the validity gate will reject as unanalyzable.
pub struct MockParser {
    parses: HashMap<String, RawParse>,
    call_count: AtomicU32,
}

impl MockParser {
    pub fn new() -> Self {
        Self {
            parses: HashMap::new(),
            call_count: AtomicU32::new(0),
        }
    }

    /// Register a canned parse for an exact sentence.
    pub fn insert(&mut self, text: &str, parse: RawParse) {
        self.parses.insert(text.to_string(), parse);
    }

    pub fn with_parses(parses: HashMap<String, RawParse>) -> Self {
        Self {
            parses,
            call_count: AtomicU32::new(0),
        }
    }

    /// Number of parse calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for MockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a fully annotated token for canned parses.
pub fn annotated(
    text: &str,
    lemma: &str,
    upos: &str,
    feats: &str,
    deprel: &str,
    head: usize,
) -> RawToken {
    RawToken {
        text: text.to_string(),
        lemma: lemma.to_string(),
        upos: upos.to_string(),
        feats: feats.to_string(),
        deprel: deprel.to_string(),
        head,
        oov: false,
    }
}

/// Same as [`annotated`] but marked out-of-vocabulary.
pub fn annotated_oov(
    text: &str,
    lemma: &str,
    upos: &str,
    feats: &str,
    deprel: &str,
    head: usize,
) -> RawToken {
    RawToken {
        oov: true,
        ..annotated(text, lemma, upos, feats, deprel, head)
    }
}

#[async_trait]
impl DependencyParser for MockParser {
    fn name(&self) -> &str {
        "mock"
    }

    async fn parse(&self, text: &str) -> Result<RawParse, ParserError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(parse) = self.parses.get(text) {
            return Ok(parse.clone());
        }

        let tokens: Vec<RawToken> = text
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| RawToken {
                text: word.to_string(),
                lemma: word.to_lowercase(),
                upos: "X".to_string(),
                feats: String::new(),
                deprel: "dep".to_string(),
                head: i,
                oov: true,
            })
            .collect();

        if tokens.is_empty() {
            return Err(ParserError::EmptyParse);
        }
        Ok(RawParse { tokens })
    }
}
