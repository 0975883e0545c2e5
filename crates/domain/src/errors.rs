//! Error types used throughout the client

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for SiteWit operations
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SiteWitError {
    /// The API answered with a non-2xx status.
    #[error("HTTP error {status}: {}", .details.summary())]
    Http { status: u16, details: ErrorDetails },

    /// Caller contract violation detected before any network call.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The response could not be mapped onto the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SiteWit operations
pub type Result<T> = std::result::Result<T, SiteWitError>;

/// Broad classes of failures, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or malformed scope credential (401, 403)
    Authentication,
    /// Field validation failure (400)
    Validation,
    /// Unknown resource id (404)
    NotFound,
    /// Conflicting state, e.g. cancelling a pre-purchased subscription (409)
    Conflict,
    /// Any other 4xx
    Client,
    /// 5xx
    Server,
    /// Connection or timeout failures
    Network,
    /// Local failures: bad arguments, config, decoding
    Local,
}

impl SiteWitError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                400 => ErrorCategory::Validation,
                404 => ErrorCategory::NotFound,
                409 => ErrorCategory::Conflict,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::Network(_) => ErrorCategory::Network,
            Self::InvalidArgument(_) | Self::Decode(_) | Self::Config(_) | Self::Internal(_) => {
                ErrorCategory::Local
            }
        }
    }

    /// HTTP status code, when the error came from the API.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured details returned by the API alongside the status.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Http { details, .. } => Some(details),
            _ => None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}

/// Error payload returned by the API for non-2xx responses.
///
/// The server typically answers with
/// `{"Message": "...", "ModelState": {"field": ["msg", ...]}}`; the full body
/// is retained in `body` so nothing the server said is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: Option<String>,
    pub model_state: BTreeMap<String, Vec<String>>,
    pub body: Value,
}

impl ErrorDetails {
    /// Build details from a raw response body.
    ///
    /// Non-JSON bodies are kept as a string in `body` and used as the message.
    pub fn from_body(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(body) => Self::from_value(body),
            Err(_) => Self {
                message: Some(trimmed.to_string()),
                model_state: BTreeMap::new(),
                body: Value::String(trimmed.to_string()),
            },
        }
    }

    pub fn from_value(body: Value) -> Self {
        let message = body
            .get("Message")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let model_state = body
            .get("ModelState")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, messages)| {
                        let messages = match messages {
                            Value::Array(items) => items
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect(),
                            Value::String(single) => vec![single.clone()],
                            _ => Vec::new(),
                        };
                        (field.clone(), messages)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { message, model_state, body }
    }

    /// Messages reported for a single field, if any.
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.model_state.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    fn summary(&self) -> String {
        let mut summary = self.message.clone().unwrap_or_else(|| "no details".to_string());
        for (field, messages) in &self.model_state {
            summary.push_str(&format!("; {}: {}", field, messages.join(", ")));
        }
        summary
    }
}
