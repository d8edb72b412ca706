//! Error types for the task API client.
//!
//! # Design
//! Every failed call yields exactly one `ClientError`, tagged with the
//! channel it came from. HTTP-level failures (`AuthExpired`, `NotFound`,
//! `HttpFailure`) are decided from the status code alone; `BusinessFailure`
//! comes from a 2xx envelope with `success: false`. The two channels are
//! never merged, whatever the business message says.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Which failure channel produced a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: the stored session was rejected and has been cleared.
    AuthExpired,
    /// 404: the endpoint does not exist on the server.
    NotFound,
    /// 2xx envelope with `success: false`.
    BusinessFailure,
    /// The request never reached a server.
    TransportFailure,
    /// Any other non-2xx status.
    HttpFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AuthExpired => "auth expired",
            ErrorKind::NotFound => "not found",
            ErrorKind::BusinessFailure => "business failure",
            ErrorKind::TransportFailure => "transport failure",
            ErrorKind::HttpFailure => "http failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of a single request.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
    pub payload: Option<Value>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is_auth_expired(&self) -> bool {
        self.kind == ErrorKind::AuthExpired
    }
}

/// Invalid configuration read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_kind_and_message() {
        let err = ClientError::new(ErrorKind::BusinessFailure, "bad input");
        assert_eq!(err.to_string(), "business failure: bad input");
    }

    #[test]
    fn builders_fill_optional_fields() {
        let err = ClientError::new(ErrorKind::HttpFailure, "boom")
            .with_status(502)
            .with_payload(json!({"message": "boom"}));
        assert_eq!(err.status_code, Some(502));
        assert_eq!(err.payload, Some(json!({"message": "boom"})));
        assert!(!err.is_auth_expired());
    }
}
