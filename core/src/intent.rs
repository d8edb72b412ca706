//! Caller intent: what a single request should do before defaults apply.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::http::HttpMethod;

/// One call's worth of request parameters.
///
/// Unset fields are resolved by `TaskClient::build_request`: method falls
/// back to GET, body to an empty object, timeout to the configured default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestIntent {
    pub path: String,
    pub method: Option<HttpMethod>,
    pub body: Option<Value>,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

impl RequestIntent {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// A zero timeout is ignored; the configured default applies instead.
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = (timeout_ms > 0).then_some(timeout_ms);
        self
    }

    #[must_use]
    pub fn options(self, options: RequestOptions) -> Self {
        let intent = self.headers(options.headers);
        match options.timeout_ms {
            Some(timeout_ms) => intent.timeout_ms(timeout_ms),
            None => intent,
        }
    }
}

/// Extra options the convenience verbs forward untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

/// Options for multipart uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Multipart field name the file is sent under.
    pub name: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            name: "file".to_string(),
            headers: BTreeMap::new(),
            timeout_ms: None,
        }
    }
}
