//! Error types for the HTTP gateway.

use agent_core::AgentError;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use signal_sender::SignalError;
use thiserror::Error;

/// First rule a request body broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}{}", field_prefix(.field), .message)]
pub struct ValidationError {
    pub field: Option<&'static str>,
    pub message: String,
}

impl ValidationError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

fn field_prefix(field: &Option<&'static str>) -> String {
    field.map(|name| format!("{}: ", name)).unwrap_or_default()
}

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request body too large")]
    PayloadTooLarge(#[source] BytesRejection),

    #[error("Could not read request body")]
    UnreadableBody(#[source] BytesRejection),

    #[error("Invalid JSON body")]
    MalformedBody(#[source] serde_json::Error),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Signal API is not configured")]
    SignalNotConfigured,

    #[error("{0}")]
    Signal(#[from] SignalError),

    #[error("Summary generation failed")]
    Summary(#[source] AgentError),

    #[error("Agent request failed")]
    Agent(#[source] AgentError),
}

impl ApiError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::PayloadTooLarge(_)
            | ApiError::UnreadableBody(_)
            | ApiError::MalformedBody(_)
            | ApiError::Validation(_) => "validation_error",
            ApiError::SignalNotConfigured | ApiError::Signal(_) => "signal_error",
            ApiError::Summary(_) => "summary_error",
            ApiError::Agent(_) => "agent_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnreadableBody(_) | ApiError::MalformedBody(_) | ApiError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection)
        } else {
            ApiError::UnreadableBody(rejection)
        }
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Causes stay in the logs; clients only get the envelope.
        match &self {
            ApiError::PayloadTooLarge(err) | ApiError::UnreadableBody(err) => {
                tracing::warn!(error = %err, "Rejected request body")
            }
            ApiError::MalformedBody(err) => tracing::warn!(error = %err, "Rejected malformed body"),
            ApiError::Validation(err) => tracing::warn!(error = %err, "Rejected invalid request"),
            ApiError::SignalNotConfigured => tracing::warn!("Signal send requested but not configured"),
            ApiError::Signal(err) => tracing::error!(error = ?err, "Signal send failed"),
            ApiError::Summary(err) | ApiError::Agent(err) => {
                tracing::error!(error = %err, "Agent run failed")
            }
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
