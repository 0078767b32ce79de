//! The dependency-parser trait and its wire types.
//!
//! Parsing (tokenization, POS tagging, morphology, dependency arcs) is an
//! external service. Implementations live in the `satzcheck-parsers` crate;
//! the trait and the raw output shape are defined here so the evaluator can
//! depend on them without pulling in any HTTP machinery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ParserError;

/// Trait for dependency-parsing backends.
#[async_trait]
pub trait DependencyParser: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Parse one sentence into raw tokens with POS, lemma, morphology and
    /// dependency information. No retries: a failure is terminal for the
    /// request.
    async fn parse(&self, text: &str) -> Result<RawParse, ParserError>;
}

/// Raw parser output for one sentence, before adaptation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawParse {
    pub tokens: Vec<RawToken>,
}

/// One token as produced by the parsing backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToken {
    pub text: String,
    pub lemma: String,
    /// Coarse universal POS tag (e.g. "NOUN").
    pub upos: String,
    /// CoNLL-U style feature string (e.g. "Case=Acc|Number=Sing").
    #[serde(default)]
    pub feats: String,
    /// Dependency relation to the head (e.g. "nsubj").
    pub deprel: String,
    /// 0-based index of the governing token; equals the token's own index
    /// for the root.
    pub head: usize,
    /// True when the backend could not resolve the token in its lexicon.
    #[serde(default)]
    pub oov: bool,
}
