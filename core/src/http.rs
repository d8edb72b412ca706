//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe requests and transport outcomes as plain data. The
//! client builds `HttpRequest` values and classifies `HttpResponse` /
//! `TransportFailure` values; whatever executes the round-trip (the
//! `Transport` trait, or a mobile host behind the FFI) only moves bytes.
//!
//! All fields use owned types (`String`, `Vec`) so values can cross FFI
//! boundaries without lifetime concerns.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport parameters for a single JSON request.
///
/// Built by `TaskClient::build_request`. `url` is absolute (base address
/// plus path) and `headers` already carry the content type and, when
/// applicable, the bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
    pub timeout_ms: u64,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A completed HTTP exchange: the server was reached and answered.
///
/// The body is kept as raw text; classification decides how to decode it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    ///
    /// An empty body becomes `null` and text that is not valid JSON is kept
    /// verbatim as a JSON string, so callers always receive a value.
    pub fn json_body(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

/// The exchange never completed (timeout, DNS, refused connection, ...).
///
/// `message` is the transport's own description of what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A multipart file upload. Skips JSON body encoding entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub url: String,
    pub file_path: String,
    pub field_name: String,
    pub form_data: BTreeMap<String, String>,
    pub headers: Vec<(String, String)>,
    pub timeout_ms: u64,
}

impl UploadRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(HttpResponse::new(200, "").json_body(), Value::Null);
        assert_eq!(HttpResponse::new(200, "  \n").json_body(), Value::Null);
    }

    #[test]
    fn non_json_body_is_kept_as_string() {
        let resp = HttpResponse::new(500, "internal error");
        assert_eq!(resp.json_body(), Value::String("internal error".to_string()));
    }

    #[test]
    fn json_body_is_parsed() {
        let resp = HttpResponse::new(200, r#"{"total":3}"#);
        assert_eq!(resp.json_body()["total"], 3);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/task/all".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer t".to_string())],
            body: Value::Null,
            timeout_ms: 10_000,
        };
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(HttpMethod::Delete).unwrap(), "DELETE");
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }
}
