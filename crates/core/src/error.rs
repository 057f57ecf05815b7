//! Error types for the rummage domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy mirrors
//! how errors are handled at runtime: a `ToolError` is recovered locally by
//! feeding it back to the model as tool-result text, while a `ModelError`
//! aborts the current turn and returns control to the session loop.

use thiserror::Error;

/// The top-level error type for all rummage operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the remote language model service.
///
/// None of these are retried automatically; the in-flight turn is aborted
/// and the session stays alive for the next question.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by the model service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from a search tool backend.
///
/// These never abort a turn: the loop controller converts them into
/// tool-result text so the model can adapt or apologize.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Search failed: {tool_name} — {reason}")]
    SearchFailed { tool_name: String, reason: String },

    #[error("Malformed backend response: {tool_name} — {reason}")]
    MalformedResponse { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_displays_status() {
        let err = Error::Model(ModelError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_backend_reason() {
        let err = Error::Tool(ToolError::SearchFailed {
            tool_name: "wikipedia".into(),
            reason: "connection refused".into(),
        });
        assert!(err.to_string().contains("wikipedia"));
        assert!(err.to_string().contains("connection refused"));
    }
}
