//! Outcome classification: transport result in, resolved value or
//! `ClientError` out, plus the side effects the shell must run.
//!
//! # Design
//! Classification is pure. It never touches storage, toasts or navigation;
//! it returns those as `Effect` values and `effects::apply_effects` runs
//! them. Priority order is fixed:
//!
//! 1. transport failure,
//! 2. HTTP status (401, 404, other non-2xx),
//! 3. body shape (envelope `success: false`, envelope `success: true`, raw).
//!
//! Every failure carries exactly one `Effect::Notify`.

use serde_json::Value;

use crate::credential::Credential;
use crate::envelope::{ApiResponse, Response};
use crate::error::{ClientError, ErrorKind};
use crate::http::{HttpResponse, TransportFailure};

pub const MSG_TIMEOUT: &str = "Request timed out";
pub const MSG_CONNECTION_FAILED: &str = "Network connection failed";
pub const MSG_NETWORK_FAILED: &str = "Network request failed";
pub const MSG_SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const MSG_NOT_FOUND: &str = "Endpoint not found, check the API configuration";
pub const MSG_OPERATION_FAILED: &str = "Operation failed";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed";

/// A side effect requested by classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a message to the user.
    Notify(String),
    /// Forget the stored token and username.
    ClearCredential,
    /// Force navigation to a route.
    Navigate(String),
    /// Store a freshly issued session.
    PersistCredential(Credential),
}

/// Result of classifying one transport outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub result: Result<Response, ClientError>,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn resolved(response: Response) -> Self {
        Self {
            result: Ok(response),
            effects: Vec::new(),
        }
    }

    fn rejected(error: ClientError, notice: impl Into<String>) -> Self {
        Self {
            result: Err(error),
            effects: vec![Effect::Notify(notice.into())],
        }
    }

    /// The notification text, if classification asked for one.
    pub fn notice(&self) -> Option<&str> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::Notify(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Human-readable reason for a transport failure.
pub fn transport_failure_message(failure: &TransportFailure) -> &'static str {
    if failure.message.contains("timeout") {
        MSG_TIMEOUT
    } else if failure.message.contains("fail") {
        MSG_CONNECTION_FAILED
    } else {
        MSG_NETWORK_FAILED
    }
}

/// The exchange never completed.
pub fn classify_transport_failure(failure: &TransportFailure) -> Outcome {
    let message = transport_failure_message(failure);
    Outcome::rejected(ClientError::new(ErrorKind::TransportFailure, message), message)
}

/// The server answered; decide from status first, then from the body.
pub fn classify_response(response: &HttpResponse, login_route: &str) -> Outcome {
    let status = response.status;
    let body = response.json_body();

    match status {
        401 => Outcome {
            result: Err(ClientError::new(ErrorKind::AuthExpired, MSG_SESSION_EXPIRED).with_status(401)),
            effects: vec![
                Effect::ClearCredential,
                Effect::Notify(MSG_SESSION_EXPIRED.to_string()),
                Effect::Navigate(login_route.to_string()),
            ],
        },
        404 => Outcome::rejected(
            ClientError::new(ErrorKind::NotFound, MSG_NOT_FOUND).with_status(404),
            MSG_NOT_FOUND,
        ),
        200..=299 => classify_body(body),
        _ => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            Outcome::rejected(
                ClientError::new(ErrorKind::HttpFailure, message)
                    .with_status(status)
                    .with_payload(body),
                format!("Request failed ({status})"),
            )
        }
    }
}

/// Body interpretation for 2xx responses.
fn classify_body(body: Value) -> Outcome {
    match ApiResponse::detect(&body) {
        Some(envelope) if !envelope.success => {
            let message = envelope
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| MSG_OPERATION_FAILED.to_string());
            Outcome::rejected(
                ClientError::new(ErrorKind::BusinessFailure, message.clone()).with_payload(body),
                message,
            )
        }
        Some(envelope) => Outcome::resolved(Response::Envelope(envelope)),
        None => Outcome::resolved(Response::Raw(body)),
    }
}

/// Upload responses skip status and envelope handling: JSON if it parses,
/// the raw text otherwise.
pub fn classify_upload(result: Result<HttpResponse, TransportFailure>) -> Outcome {
    match result {
        Ok(response) => {
            let value = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()));
            Outcome::resolved(Response::Raw(value))
        }
        Err(_) => Outcome::rejected(
            ClientError::new(ErrorKind::TransportFailure, MSG_UPLOAD_FAILED),
            MSG_UPLOAD_FAILED,
        ),
    }
}

/// Session issued by a successful login envelope, read from `data`.
pub fn capture_login(response: &Response) -> Option<Credential> {
    let Response::Envelope(envelope) = response else {
        return None;
    };
    let token = envelope.data.get("token")?.as_str()?;
    let username = envelope.data.get("username")?.as_str()?;
    if token.is_empty() {
        return None;
    }
    Some(Credential {
        token: token.to_string(),
        username: username.to_string(),
    })
}
