use crate::cache::FetchedPage;
use crate::constants::BODY_EXCERPT_CHARS;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Network-level failure (timeout, DNS, TLS). Never cached upstream.
    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),

    /// Non-2xx answer from a provider; the real status code is preserved.
    #[error("Upstream HTTP {status}: {body}")]
    UpstreamHttp { status: i32, body: String },

    /// A 2xx body that is empty or not parseable as the expected JSON.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    /// Classify a failed upstream fetch. A negative status code marks a
    /// local/network failure, anything else is a real provider status.
    pub fn from_page(page: &FetchedPage) -> Self {
        if page.status < 0 {
            AppError::UpstreamTransport(excerpt(&page.body))
        } else {
            AppError::UpstreamHttp {
                status: page.status,
                body: excerpt(&page.body),
            }
        }
    }
}

/// First [`BODY_EXCERPT_CHARS`] characters of a body, for error messages.
pub fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

// Convert AppError into HTTP responses (used by the passthrough and proxy
// endpoints; the itinerary endpoint converts errors into a success=false
// body instead).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::UpstreamTransport(ref e) => {
                tracing::warn!("Upstream transport error: {}", e);
                (StatusCode::BAD_GATEWAY, "Upstream transport error")
            }
            AppError::UpstreamHttp { status, ref body } => {
                tracing::warn!(status, "Upstream HTTP error: {}", body);
                (StatusCode::BAD_GATEWAY, "Upstream provider error")
            }
            AppError::MalformedResponse(ref e) => {
                tracing::warn!("Malformed upstream response: {}", e);
                (StatusCode::BAD_GATEWAY, "Malformed upstream response")
            }
            AppError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
