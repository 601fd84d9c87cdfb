//! Intent endpoints: submit an intent, fetch the latest interaction

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::ApiState;
use crate::cache::InteractionRecord;
use crate::prompt::build_intent_prompt;

/// Readiness string served at `/`
pub const READY_MESSAGE: &str = "snooze bridge is running";

/// Build bridge router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/gemini", post(submit_intent))
        .route("/latest", get(latest))
        .with_state(state)
}

async fn home() -> &'static str {
    READY_MESSAGE
}

/// Successful intent response
#[derive(Debug, Serialize)]
pub struct IntentResponse {
    pub message: &'static str,
    pub input: String,
    pub response: String,
    pub tts_status: &'static str,
}

/// Message for any body without usable intent text
const NO_TEXT: &str = "No text provided";

/// Trimmed `text` field of a JSON object body, if it is a non-blank string
fn intent_text(body: &Value) -> Option<&str> {
    body.get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Generate a reply for an intent, vocalize it, and remember it
async fn submit_intent(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IntentResponse>, BridgeError> {
    let Json(body) = payload.map_err(|e| {
        tracing::debug!(rejection = %e.body_text(), "unreadable intent body");
        BridgeError::BadRequest(NO_TEXT.to_string())
    })?;

    let text = intent_text(&body).ok_or_else(|| BridgeError::BadRequest(NO_TEXT.to_string()))?;

    let record = process_intent(&state, text).await?;

    Ok(Json(IntentResponse {
        message: "Received text successfully!",
        input: record.input,
        response: record.response,
        tts_status: "completed",
    }))
}

/// Run one intent through the language model and the synthesis script
///
/// The cache is only updated once both steps succeed.
///
/// # Errors
///
/// Returns the first failure from generation or synthesis
pub async fn process_intent(state: &ApiState, text: &str) -> crate::Result<InteractionRecord> {
    tracing::info!(input = %text, model = state.generator.model(), "new intent received");

    let prompt = build_intent_prompt(text);
    let reply = state.generator.generate(&prompt).await?;

    tracing::info!(response = %reply, "reply generated");

    let run = state.speech.speak(&reply).await.inspect_err(|e| {
        tracing::warn!(error = %e, script = %state.speech.script().display(), "speech synthesis failed");
    })?;

    tracing::debug!(exit_code = run.exit_code, "speech synthesis completed");

    let record = InteractionRecord {
        input: text.to_string(),
        response: reply,
    };
    state.cache.record(record.clone()).await;

    Ok(record)
}

/// Body returned when nothing has been recorded yet
#[derive(Debug, Serialize)]
struct NoInteraction {
    message: &'static str,
}

/// Return the last successful interaction
async fn latest(State(state): State<Arc<ApiState>>) -> Response {
    match state.cache.latest().await {
        Some(record) => Json(record).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(NoInteraction {
                message: "No previous interaction yet.",
            }),
        )
            .into_response(),
    }
}

/// Bridge API errors
#[derive(Debug)]
pub enum BridgeError {
    BadRequest(String),
    Internal(String),
}

impl From<crate::Error> for BridgeError {
    fn from(e: crate::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let (status, error) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "intent request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
