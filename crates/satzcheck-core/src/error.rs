//! Parser and evaluation error types.
//!
//! `ParserError` is the contract of the `DependencyParser` trait: the
//! evaluator must turn every user-side parser failure into a blocking
//! PARSE_FAILURE finding, so the error is typed here rather than wrapped
//! in `anyhow` and string-matched later.

use thiserror::Error;

/// Errors that can occur when calling the external dependency parser.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The parser produced no tokens for the input.
    #[error("parser returned no tokens")]
    EmptyParse,

    /// The parser output could not be normalized into the token model.
    #[error("malformed parser output: {0}")]
    Malformed(String),

    /// The parsing service returned an error response.
    #[error("parser service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// The request timed out.
    #[error("parser request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

/// Errors an evaluation request can fail with.
///
/// A failure to parse the *learner's* sentence is not an error — it becomes
/// a blocking finding. These variants cover faults on the operator's side.
#[derive(Debug, Error)]
pub enum EvaluateError {
    /// The canonical reference sentence itself could not be parsed.
    #[error("reference sentence for card {card_id} could not be parsed: {source}")]
    Reference {
        card_id: u32,
        #[source]
        source: ParserError,
    },

    /// The requested flashcard does not exist.
    #[error("no flashcard with id {card_id}")]
    UnknownCard { card_id: u32 },
}
