//! Error types for the agent directory.

use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Main error type for the agent directory.
#[derive(Error, Debug)]
pub enum Error {
    /// Draft failed field validation while validation was enforced
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// The request could not complete (unreachable, timed out, unreadable body)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote resource answered with a non-2xx status
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Fetching the full collection failed
    #[error("Load error: {0}")]
    Load(#[source] Box<Error>),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No agent with this id is in the canonical collection
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// A delete was confirmed without a matching pending request
    #[error("Delete of {0} was not requested")]
    DeleteNotRequested(String),
}

impl Error {
    /// Most specific human-readable reason available.
    ///
    /// Server detail wins over transport text; a server error without detail
    /// has no reason.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Server(err) => err.detail.clone(),
            Self::Transport(message) => Some(message.clone()),
            Self::Validation(errors) => Some(errors.to_string()),
            Self::Load(inner) => inner.reason(),
            Self::UnknownAgent(_) | Self::DeleteNotRequested(_) => Some(self.to_string()),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// [`reason`](Self::reason), or `fallback` when there is none.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.reason().unwrap_or_else(|| fallback.to_string())
    }

    /// Server-provided detail, if this error carries one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server(err) => err.detail.as_deref(),
            Self::Load(inner) => inner.detail(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether retrying the same idempotent request could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Server(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Non-2xx answer from the remote agent resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
pub struct ServerError {
    pub status: u16,
    pub detail: Option<String>,
}

impl ServerError {
    #[must_use]
    pub fn new(status: u16, detail: Option<String>) -> Self {
        Self { status, detail }
    }

    /// Build from a response status and its (possibly non-JSON) body.
    ///
    /// `detail` may be a plain string or a list of `{ "msg": .. }` objects as
    /// produced by request-validation failures; the latter is flattened.
    #[must_use]
    pub fn from_body(status: u16, body: &Value) -> Self {
        let detail = match body.get("detail") {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        };
        Self { status, detail }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.status, 502..=504)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_server_error_string_detail() {
        let error = ServerError::from_body(400, &json!({"detail": "agent_id already exists"}));

        assert_eq!(error.status, 400);
        assert_eq!(error.detail.as_deref(), Some("agent_id already exists"));
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_server_error_list_detail() {
        let body = json!({
            "detail": [
                {"loc": ["body", "phone"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["body", "email"], "msg": "field required", "type": "value_error.missing"}
            ]
        });
        let error = ServerError::from_body(422, &body);

        assert_eq!(error.detail.as_deref(), Some("field required; field required"));
    }

    #[test]
    fn test_server_error_missing_detail() {
        let error = ServerError::from_body(500, &json!({}));
        assert!(error.detail.is_none());
        assert_eq!(error.to_string(), "HTTP 500: no detail");
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let with_detail = Error::Server(ServerError::new(409, Some("duplicate".to_string())));
        let without_detail = Error::Server(ServerError::new(500, None));

        assert_eq!(with_detail.user_message("Failed to add agent"), "duplicate");
        assert_eq!(without_detail.user_message("Failed to add agent"), "Failed to add agent");
    }

    #[test]
    fn test_user_message_for_transport_and_load() {
        let transport = Error::Transport("connection refused".to_string());
        assert_eq!(transport.user_message("fallback"), "connection refused");
        assert!(transport.is_retryable());

        let load = Error::Load(Box::new(Error::Server(ServerError::new(
            503,
            Some("maintenance".to_string()),
        ))));
        assert_eq!(load.detail(), Some("maintenance"));
        assert_eq!(load.user_message("fallback"), "maintenance");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(ServerError::new(502, None).is_retryable());
        assert!(ServerError::new(503, None).is_retryable());
        assert!(ServerError::new(504, None).is_retryable());
        assert!(!ServerError::new(500, None).is_retryable());
        assert!(!ServerError::new(404, None).is_retryable());
    }
}
