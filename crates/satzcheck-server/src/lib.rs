//! satzcheck-server — HTTP API over the evaluation pipeline.
//!
//! Three endpoints: list flashcards, fetch one flashcard, and evaluate an
//! attempt. State is a shared card store plus one evaluator; both are
//! read-only, so handlers never contend on a lock.

pub mod presenter;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use satzcheck_core::deck::CardStore;
use satzcheck_core::engine::{Attempt, Evaluator};
use satzcheck_core::error::EvaluateError;
use satzcheck_core::model::Flashcard;
use satzcheck_core::results::EvaluationResult;

use crate::presenter::{feedback, FeedbackItem};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CardStore>,
    pub evaluator: Arc<Evaluator>,
}

enum ApiError {
    NotFound(String),
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Upstream(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Deserialize)]
struct ListParams {
    first_n: Option<usize>,
}

async fn list_flashcards(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Flashcard>> {
    let cards = state.store.list();
    let cards = match params.first_n {
        Some(n) => &cards[..n.min(cards.len())],
        None => cards,
    };
    Json(cards.to_vec())
}

async fn get_flashcard(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Flashcard>, ApiError> {
    state
        .store
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {id} not found")))
}

/// Evaluation response: the full pipeline result plus display-ready
/// feedback lines.
#[derive(Serialize)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub feedback: Vec<FeedbackItem>,
}

async fn evaluate(
    State(state): State<AppState>,
    Json(attempt): Json<Attempt>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let card = state
        .store
        .get(attempt.flashcard_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("flashcard {} not found", attempt.flashcard_id)))?;

    match state.evaluator.evaluate(&attempt.user_german, &card).await {
        Ok(result) => {
            let feedback = feedback(&result);
            Ok(Json(EvaluateResponse { result, feedback }))
        }
        Err(error @ EvaluateError::UnknownCard { .. }) => Err(ApiError::NotFound(error.to_string())),
        Err(error @ EvaluateError::Reference { .. }) => {
            warn!(%error, card_id = card.id, "reference sentence could not be evaluated");
            Err(ApiError::Upstream(error.to_string()))
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/flashcards", get(list_flashcards))
        .route("/flashcards/{id}", get(get_flashcard))
        .route("/evaluate", post(evaluate))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "satzcheck API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use satzcheck_core::model::GrammarFocus;
    use satzcheck_core::rules::RuleSet;
    use satzcheck_parsers::mock::{annotated, MockParser};
    use satzcheck_core::traits::RawParse;

    fn dog_parse(capitalized: bool) -> RawParse {
        let (ich, hund) = if capitalized {
            ("Ich", "Hund")
        } else {
            ("ich", "hund")
        };
        RawParse {
            tokens: vec![
                annotated(ich, "ich", "PRON", "Case=Nom|Person=1|Number=Sing", "nsubj", 1),
                annotated(
                    "sehe",
                    "sehen",
                    "VERB",
                    "VerbForm=Fin|Person=1|Number=Sing",
                    "root",
                    1,
                ),
                annotated("den", "der", "DET", "Case=Acc", "det", 3),
                annotated(hund, "Hund", "NOUN", "Case=Acc", "obj", 1),
                annotated(".", ".", "PUNCT", "", "punct", 1),
            ],
        }
    }

    fn test_state() -> AppState {
        let mut parser = MockParser::new();
        parser.insert("Ich sehe den Hund.", dog_parse(true));
        parser.insert("ich sehe den hund", dog_parse(false));

        let store = Arc::new(CardStore::new(vec![Flashcard {
            id: 8,
            english_prompt: "I see the dog.".to_string(),
            target_german: "Ich sehe den Hund.".to_string(),
            grammar_focus: GrammarFocus::NounCapitalization,
        }]));
        let evaluator = Arc::new(Evaluator::new(
            Arc::new(parser),
            Arc::new(RuleSet::default()),
        ));
        AppState { store, evaluator }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn lists_flashcards() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::get("/flashcards").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["target_german"], "Ich sehe den Hund.");
    }

    #[tokio::test]
    async fn fetches_one_flashcard_and_404s_unknown() {
        let app = router(test_state());
        let found = app
            .clone()
            .oneshot(Request::get("/flashcards/8").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);

        let missing = app
            .oneshot(Request::get("/flashcards/99").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        let json = body_json(missing).await;
        assert!(json["error"].as_str().unwrap().contains("99"));
    }

    #[tokio::test]
    async fn evaluates_an_attempt() {
        let app = router(test_state());
        let request = Request::post("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"flashcard_id": 8, "user_german": "ich sehe den hund"})
                    .to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["meaning_conveyed"], true);
        assert_eq!(json["errors"][0]["error_type"], "NOUN_CAPITALIZATION");
        let feedback = json["feedback"].as_array().unwrap();
        assert!(feedback[0]["message"]
            .as_str()
            .unwrap()
            .contains("Capitalize: hund"));
    }

    #[tokio::test]
    async fn evaluate_404s_unknown_card() {
        let app = router(test_state());
        let request = Request::post("/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"flashcard_id": 404, "user_german": "egal"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
