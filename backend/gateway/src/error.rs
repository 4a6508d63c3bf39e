//! Mapping of request failures onto HTTP responses.
//!
//! Body shape: `{"error": "...", "details": "...", "stack": "..."}`, where
//! `details` and `stack` only appear for provider/transport failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use florascope_core::FloraError;
use florascope_logging::redact_secrets;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// The upload itself could not be read.
    BadRequest { status: StatusCode, message: String },
    Flora(FloraError),
}

impl From<FloraError> for ApiError {
    fn from(err: FloraError) -> Self {
        Self::Flora(err)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            Self::BadRequest { status, message } => (
                status,
                ErrorBody { error: message, details: None, stack: None },
            ),
            Self::Flora(FloraError::NoImage) => (
                StatusCode::BAD_REQUEST,
                ErrorBody { error: "No image provided".into(), details: None, stack: None },
            ),
            Self::Flora(FloraError::NotConfigured(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody { error: "API key is not set".into(), details: None, stack: None },
            ),
            Self::Flora(FloraError::RequestFailed { message, detail }) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: "Error processing request".into(),
                    details: Some(redact_secrets(&message)),
                    stack: detail.map(|d| redact_secrets(&d)),
                },
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                error = %body.error,
                details = body.details.as_deref().unwrap_or(""),
                stack = body.stack.as_deref().unwrap_or(""),
                "Identification request failed"
            );
        } else {
            warn!(status = status.as_u16(), error = %body.error, "Identification request rejected");
        }
        (status, Json(body)).into_response()
    }
}
