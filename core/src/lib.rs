//! HTTP access layer for the task-tracking API.
//!
//! # Overview
//! Every call goes through one pipeline: build the request from caller
//! intent, attach the bearer token, dispatch through a `Transport`, then
//! classify the outcome into a resolved `Response` or a `ClientError`.
//!
//! # Design
//! - Building and classification are pure (`TaskClient::build_request`,
//!   `classify::classify_response`); side effects are returned as
//!   `classify::Effect` values and executed by `effects::apply_effects`.
//! - Credentials, notifications and navigation belong to the host and are
//!   injected as trait objects (`CredentialStore`, `Notifier`, `Navigator`).
//! - Failures fall into five kinds (`ErrorKind`). A 401 is handled at the
//!   status layer and clears the session; a 2xx envelope with
//!   `success: false` is a business failure and never touches it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod credential;
pub mod effects;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod intent;
pub mod tasks;
pub mod transport;
pub mod types;

pub use auth::{is_public, is_whitelisted};
pub use classify::{Effect, Outcome};
pub use client::{build_http_request, TaskClient};
pub use config::ClientConfig;
pub use credential::{Credential, CredentialStore, MemoryCredentialStore};
pub use effects::{Navigator, Notifier};
pub use endpoints::Endpoints;
pub use envelope::{ApiResponse, Response};
pub use error::{ClientError, ConfigError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportFailure, UploadRequest};
pub use intent::{RequestIntent, RequestOptions, UploadOptions};
pub use transport::{ReqwestTransport, Transport};
pub use types::{BatchResult, LoginData, LoginRequest, NewTask, Task, TaskCount};
