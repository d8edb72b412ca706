//! Response body shapes.
//!
//! # Design
//! The server wraps most payloads in an `ApiResponse` envelope
//! (`{success, message, data}`), but some endpoints answer with bare JSON.
//! A body is an envelope if and only if its `success` field is a JSON
//! boolean; anything else is passed through untouched as `Response::Raw`.
//! The envelope is the single canonical contract: token capture on login
//! reads from inside `data`, never from ad-hoc top-level fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{success, message, data}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl ApiResponse {
    /// Recognise an envelope. Returns `None` unless `success` is a boolean.
    ///
    /// A non-string `message` is ignored rather than failing detection.
    pub fn detect(body: &Value) -> Option<Self> {
        let success = body.get("success")?.as_bool()?;
        Some(Self {
            success,
            message: body.get("message").and_then(Value::as_str).map(str::to_string),
            data: body.get("data").cloned().unwrap_or(Value::Null),
        })
    }
}

/// A successfully resolved call.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A `success: true` envelope, returned whole.
    Envelope(ApiResponse),
    /// A body that is not an envelope, returned verbatim.
    Raw(Value),
}

impl Response {
    pub fn is_envelope(&self) -> bool {
        matches!(self, Response::Envelope(_))
    }

    /// The payload: `data` for envelopes, the whole body otherwise.
    pub fn data(&self) -> &Value {
        match self {
            Response::Envelope(envelope) => &envelope.data,
            Response::Raw(value) => value,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Response::Envelope(envelope) => envelope.message.as_deref(),
            Response::Raw(_) => None,
        }
    }

    /// Decode the payload into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(self.data())
    }

    /// The value handed to callers: the full envelope or the raw body.
    pub fn into_value(self) -> Value {
        match self {
            Response::Envelope(envelope) => {
                let mut map = serde_json::Map::new();
                map.insert("success".to_string(), Value::Bool(envelope.success));
                if let Some(message) = envelope.message {
                    map.insert("message".to_string(), Value::String(message));
                }
                map.insert("data".to_string(), envelope.data);
                Value::Object(map)
            }
            Response::Raw(value) => value,
        }
    }
}
