//! Error types for the Malaffi API client.
//!
//! # Design
//! Every failure a call can hit (transport, timeout, undecodable body,
//! non-2xx status) lands in one `ApiError` so callers need a single error
//! path. Each variant still answers `message()`, `status()` and `code()`,
//! and `ApiFailure` is the serializable `{message, status?, code?}` view of
//! the same information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by `ApiClient` calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection, DNS or other transport-level failure. No response was read.
    #[error("{message}")]
    Network { message: String },

    /// No response arrived before the deadline; the connection was dropped.
    #[error("{message}")]
    Timeout { message: String },

    /// The response body was not valid JSON, or not shaped like the envelope.
    #[error("{message}")]
    Decode { message: String, status: u16 },

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http {
        message: String,
        status: u16,
        code: Option<String>,
    },

    /// The request payload could not be serialized to JSON.
    #[error("{message}")]
    Serialization { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Timeout,
    Decode,
    Http,
    Serialization,
}

/// The normalized failure shape: `{message, status?, code?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub(crate) fn decode(status: u16, err: &serde_json::Error) -> Self {
        ApiError::Decode {
            message: format!("Invalid JSON response: {err}"),
            status,
        }
    }

    /// Build the failure for a non-2xx response from its decoded body.
    ///
    /// A non-empty string `message` in the body becomes the error message;
    /// otherwise the message is `HTTP Error: <status>`.
    pub(crate) fn from_error_body(status: u16, body: &Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP Error: {status}"));
        let code = match body.get("code") {
            Some(Value::String(code)) => Some(code.clone()),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };
        ApiError::Http { message, status, code }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network { .. } => ErrorKind::Network,
            ApiError::Timeout { .. } => ErrorKind::Timeout,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Serialization { .. } => ErrorKind::Serialization,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::Timeout { message }
            | ApiError::Decode { message, .. }
            | ApiError::Http { message, .. }
            | ApiError::Serialization { message } => message,
        }
    }

    /// HTTP status, present whenever a response was actually received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Decode { status, .. } | ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-defined error token from the response body, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    pub fn to_failure(&self) -> ApiFailure {
        ApiFailure {
            message: self.message().to_string(),
            status: self.status(),
            code: self.code().map(str::to_string),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        match err {
            TransportError::Timeout(_) => ApiError::Timeout { message },
            TransportError::Network(_) => ApiError::Network { message },
        }
    }
}

impl From<ApiError> for ApiFailure {
    fn from(err: ApiError) -> Self {
        err.to_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn error_body_message_wins() {
        let err = ApiError::from_error_body(400, &json!({"message": "name taken"}));
        assert_eq!(err.message(), "name taken");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn missing_or_empty_message_falls_back_to_status() {
        let err = ApiError::from_error_body(503, &json!({"code": "DOWN"}));
        assert_eq!(err.message(), "HTTP Error: 503");
        assert_eq!(err.code(), Some("DOWN"));

        let err = ApiError::from_error_body(500, &json!({"message": ""}));
        assert_eq!(err.message(), "HTTP Error: 500");

        let err = ApiError::from_error_body(502, &json!([1, 2, 3]));
        assert_eq!(err.message(), "HTTP Error: 502");
    }

    #[test]
    fn numeric_code_is_rendered() {
        let err = ApiError::from_error_body(409, &json!({"code": 4091}));
        assert_eq!(err.code(), Some("4091"));
    }

    #[test]
    fn transport_errors_carry_no_status() {
        let err = ApiError::from(TransportError::Timeout(Duration::from_millis(50)));
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
        assert!(err.message().contains("timed out"));

        let err = ApiError::from(TransportError::Network("connection refused".to_string()));
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn failure_shape_omits_absent_fields() {
        let failure = ApiError::Network {
            message: "dns".to_string(),
        }
        .to_failure();
        assert_eq!(serde_json::to_value(&failure).unwrap(), json!({"message": "dns"}));

        let failure: ApiFailure = ApiError::Http {
            message: "name taken".to_string(),
            status: 400,
            code: Some("CONFLICT".to_string()),
        }
        .into();
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({"message": "name taken", "status": 400, "code": "CONFLICT"})
        );
    }
}
