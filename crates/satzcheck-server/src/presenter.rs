//! Display shaping for API responses.
//!
//! The pipeline reports one finding per offending token; the UI wants one
//! feedback line per rule. Capitalization findings in particular are merged
//! into a single line listing every lowercase noun.

use serde::Serialize;

use satzcheck_core::results::{messages, ErrorType, EvaluationResult, GrammarResult};

/// One display-ready feedback line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeedbackItem {
    pub message: String,
    pub spans: Vec<usize>,
}

/// Shape an evaluation result into feedback lines.
pub fn feedback(result: &EvaluationResult) -> Vec<FeedbackItem> {
    if result.errors.is_empty() {
        return vec![FeedbackItem {
            message: messages::WELL_DONE.to_string(),
            spans: Vec::new(),
        }];
    }

    let mut items = Vec::new();
    let mut capitalization: Vec<&GrammarResult> = Vec::new();

    for error in &result.errors {
        if error.error_type == ErrorType::NounCapitalization {
            capitalization.push(error);
        } else {
            items.push(FeedbackItem {
                message: error.message.clone(),
                spans: error.spans.clone(),
            });
        }
    }

    if !capitalization.is_empty() {
        let words: Vec<&str> = capitalization
            .iter()
            .filter_map(|e| e.details.as_deref())
            .collect();
        let mut spans: Vec<usize> = capitalization
            .iter()
            .flat_map(|e| e.spans.iter().copied())
            .collect();
        spans.sort_unstable();
        items.push(FeedbackItem {
            message: format!("{} Capitalize: {}", messages::NOUN_CAPITALIZATION, words.join(", ")),
            spans,
        });
    }

    items
}
