//! Error Vocabulary
//!
//! Every failure the client can meet is funneled into one human-readable
//! message before it leaves a session component. [`normalize`] is the only
//! place that decides what that message says.

use serde_json::Value;
use thiserror::Error;

/// Message used when nothing more specific is known.
pub const GENERIC_FAILURE: &str = "Server connection failed.";

/// Failures of the HTTP primitive itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// Server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Parsed JSON body, if the server sent one.
        body: Option<Value>,
    },
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,
    /// A 2xx body that could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Application-level failure delivered with a 2xx status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}")]
pub struct SemanticError {
    /// Short error code (`error` field).
    pub code: String,
    /// Human description (`error_description` field).
    pub description: Option<String>,
}

/// Anything an operation can fail with before normalization.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// Already a display string.
    #[error("{0}")]
    Message(String),
    /// Transport-level failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Semantic failure inside a successful response.
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// Turn any failure into the text the UI shows.
///
/// Pure and total: never panics, always yields a message.
pub fn normalize(error: &ClientError) -> String {
    match error {
        ClientError::Message(msg) => msg.clone(),
        ClientError::Transport(TransportError::Status { status, body }) => body
            .as_ref()
            .and_then(|b| {
                field_text(b, "error_description").or_else(|| field_text(b, "error"))
            })
            .unwrap_or_else(|| format!("Error: {}", status)),
        ClientError::Semantic(semantic) => semantic
            .description
            .clone()
            .unwrap_or_else(|| semantic.code.clone()),
        ClientError::Transport(_) => GENERIC_FAILURE.to_string(),
    }
}

/// Non-empty text for a payload field. Non-string truthy values are
/// rendered as JSON.
pub(crate) fn field_text(payload: &Value, field: &str) -> Option<String> {
    match payload.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        v if is_truthy(v) && !v.is_string() => Some(v.to_string()),
        _ => None,
    }
}

/// Whether a JSON value counts as set.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A normalized failure, as surfaced to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ErrorMessage(String);

impl ErrorMessage {
    /// Wrap a ready-made message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ClientError> for ErrorMessage {
    fn from(err: ClientError) -> Self {
        Self(normalize(&err))
    }
}

impl From<TransportError> for ErrorMessage {
    fn from(err: TransportError) -> Self {
        ClientError::from(err).into()
    }
}

impl From<SemanticError> for ErrorMessage {
    fn from(err: SemanticError) -> Self {
        ClientError::from(err).into()
    }
}

// =============================================================================
// TESTS
// =============================================================================
