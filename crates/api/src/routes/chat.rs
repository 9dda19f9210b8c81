//! `POST /chat`: one turn with the training agent.

use agent_core::ChatMessage;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ValidationError};
use crate::state::AppState;

/// A validated chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    /// Transcript returned by the previous turn.
    pub history: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Validate a decoded body. `message` is trimmed and must not be empty;
    /// `history` defaults to an empty transcript.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut object) = value else {
            return Err(ValidationError::body("Request body must be a JSON object"));
        };

        let message = match object.remove("message") {
            None => return Err(ValidationError::field("message", "field required")),
            Some(Value::String(text)) => text.trim().to_string(),
            Some(_) => return Err(ValidationError::field("message", "must be a string")),
        };
        if message.is_empty() {
            return Err(ValidationError::field("message", "must not be empty"));
        }

        let history = match object.remove("history") {
            None | Some(Value::Null) => Vec::new(),
            Some(history) => serde_json::from_value(history)
                .map_err(|e| ValidationError::field("history", e.to_string()))?,
        };

        Ok(Self { message, history })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

/// Chat endpoint.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    handle_chat(&state, &body?).await.map(Json)
}

async fn handle_chat(state: &AppState, body: &[u8]) -> Result<ChatResponse, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(ApiError::MalformedBody)?;
    let request = ChatRequest::from_value(value)?;

    info!(history = request.history.len(), "Chat turn received");
    let run = state
        .chat_agent
        .chat(&request.message, &request.history)
        .await
        .map_err(ApiError::Agent)?;

    Ok(ChatResponse {
        reply: run.output,
        history: run.messages,
    })
}
