//! Error records and the final evaluation response.
//!
//! `GrammarResult` is the single finding type every checker emits;
//! `EvaluationResult` is the one output the aggregator builds per request.

use serde::{Deserialize, Serialize};

/// Maximum number of error records reported to the learner at once.
pub const MAX_REPORTED_ERRORS: usize = 5;

/// The closed set of finding categories the pipeline can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    AccusativeDative,
    V2Order,
    VerbFinal,
    NounCapitalization,
    AuxSelection,
    Spelling,
    NearMiss,
    InsufficientCoverage,
    ParseFailure,
    TokenMismatch,
}

impl ErrorType {
    /// Fixed severity ranking; lower values sort first. This table totally
    /// orders the enum and is never recomputed at runtime.
    pub const fn priority(self) -> u8 {
        match self {
            ErrorType::ParseFailure => 0,
            ErrorType::InsufficientCoverage => 1,
            ErrorType::V2Order => 10,
            ErrorType::VerbFinal => 11,
            ErrorType::AuxSelection => 20,
            ErrorType::AccusativeDative => 21,
            ErrorType::NounCapitalization => 30,
            ErrorType::Spelling => 40,
            ErrorType::TokenMismatch => 50,
            ErrorType::NearMiss => 90,
        }
    }

    /// Categories that invalidate the whole attempt when emitted.
    pub const fn is_blocking_class(self) -> bool {
        matches!(
            self,
            ErrorType::ParseFailure | ErrorType::InsufficientCoverage
        )
    }
}

/// One grammar finding: what went wrong, where, and how severe it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarResult {
    pub error_type: ErrorType,
    /// Fixed English template, parameterized with the offending text.
    pub message: String,
    /// Token indices to highlight in the UI. Empty is allowed.
    #[serde(default)]
    pub spans: Vec<usize>,
    /// True only for findings that invalidate the whole attempt.
    #[serde(default)]
    pub blocking: bool,
    /// Severity rank copied from the fixed priority table.
    pub priority: u8,
    /// Raw offending text for debugging and UI tooltips.
    #[serde(default)]
    pub details: Option<String>,
}

impl GrammarResult {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> GrammarResult {
        GrammarResult {
            error_type,
            message: message.into(),
            spans: Vec::new(),
            blocking: false,
            priority: error_type.priority(),
            details: None,
        }
    }

    pub fn blocking(error_type: ErrorType, message: impl Into<String>) -> GrammarResult {
        GrammarResult {
            blocking: true,
            ..GrammarResult::new(error_type, message)
        }
    }

    pub fn with_spans(mut self, spans: Vec<usize>) -> GrammarResult {
        self.spans = spans;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> GrammarResult {
        self.details = Some(details.into());
        self
    }
}

/// The pipeline's single output per evaluation request. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Whether the learner's sentence conveys the reference meaning.
    pub meaning_conveyed: bool,
    /// The canonical reference sentence, echoed for display.
    pub correct_sentence: String,
    /// The learner's token texts, echoed for UI span alignment.
    pub tokens: Vec<String>,
    /// At most [`MAX_REPORTED_ERRORS`] findings, ascending priority.
    pub errors: Vec<GrammarResult>,
}

/// Fixed message templates shared by the checkers.
pub mod messages {
    pub const NOUN_CAPITALIZATION: &str = "In German, nouns must be capitalized.";
    pub const MAIN_CLAUSE_V2: &str =
        "In German main clauses, the conjugated verb must appear in the second position.";
    pub const SUBORDINATE_VERB_FINAL: &str =
        "This sentence has a subordinate clause, so the conjugated verb must appear at the end.";
    pub const WELL_DONE: &str = "No grammar errors detected. Well done.";
}
