use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use claude_agent::ClaudeAgentError;
use zoom_core::error::ZoomError;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit status codes
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP status through the `anyhow::Error` chain for
/// request problems that have no `ZoomError` counterpart.
#[derive(Debug)]
struct StatusError(StatusCode, String);

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.1)
    }
}

impl std::error::Error for StatusError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusError(StatusCode::BAD_REQUEST, msg.into()).into())
    }

    /// Construct a 404 Not Found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(StatusError(StatusCode::NOT_FOUND, msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if let Some(s) = self.0.downcast_ref::<StatusError>() {
            return s.0;
        }
        if let Some(e) = self.0.downcast_ref::<ZoomError>() {
            return match e {
                ZoomError::NotInitialized
                | ZoomError::InvalidTaskLine(_)
                | ZoomError::InvalidLevel(_)
                | ZoomError::InvalidSlug(_)
                | ZoomError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                ZoomError::TaskNotFound { .. }
                | ZoomError::ProjectNotFound(_)
                | ZoomError::FileNotFound(_) => StatusCode::NOT_FOUND,
                ZoomError::ProjectExists(_) => StatusCode::CONFLICT,
                ZoomError::SectionNotFound { .. } | ZoomError::InvalidEncoding(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ZoomError::Io(_) | ZoomError::Walk(_) | ZoomError::Yaml(_) | ZoomError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }
        if let Some(e) = self.0.downcast_ref::<ClaudeAgentError>() {
            return match e {
                ClaudeAgentError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                ClaudeAgentError::MissingApiKey(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
