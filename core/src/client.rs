//! The request pipeline: build, authorize, dispatch, classify, apply.
//!
//! # Design
//! `TaskClient` is split the same way as the wire types: `build_request`
//! and `parse_response` are deterministic and never touch the network or
//! run side effects, so they can be tested (or driven over FFI) directly.
//! `request` glues them to a `Transport` and runs the resulting effects.
//!
//! The client keeps no mutable state of its own. Concurrent calls share
//! only the credential store, and nothing serialises access to it: a 401 on
//! one call may clear the token while another call is still in flight.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::authorize;
use crate::classify::{capture_login, classify_response, classify_transport_failure, classify_upload, Effect, Outcome};
use crate::config::ClientConfig;
use crate::credential::{clear_credential, load_credential, load_token, Credential, CredentialStore};
use crate::effects::{apply_effects, Navigator, Notifier, TracingNavigator, TracingNotifier};
use crate::envelope::Response;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, UploadRequest};
use crate::intent::{RequestIntent, RequestOptions, UploadOptions};
use crate::transport::{ReqwestTransport, Transport};

/// Build transport parameters for `intent`.
///
/// Defaults: GET, `{}` body, `Content-Type: application/json`, the
/// configured timeout. Caller headers replace defaults of the same name
/// (case-insensitively). `token` is attached unless the path is public
/// (whitelisted, or the configured login or register endpoint).
pub fn build_http_request(config: &ClientConfig, intent: &RequestIntent, token: Option<&str>) -> HttpRequest {
    let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
    merge_headers(&mut headers, &intent.headers);
    authorize(&mut headers, &intent.path, token, &config.endpoints);

    HttpRequest {
        method: intent.method.unwrap_or_default(),
        url: config.url(&intent.path),
        headers,
        body: intent.body.clone().unwrap_or_else(|| json!({})),
        timeout_ms: intent.timeout_ms.unwrap_or(config.timeout_ms),
    }
}

fn merge_headers(headers: &mut Vec<(String, String)>, extra: &BTreeMap<String, String>) {
    for (name, value) in extra {
        headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }
}

/// Async client for the task API.
#[derive(Clone)]
pub struct TaskClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TaskClient {
    /// Notifications and navigation default to log-only implementations.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            transport,
            store,
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(TracingNavigator),
        }
    }

    /// Client over a fresh `ReqwestTransport`.
    pub fn with_reqwest(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self::new(config, Arc::new(ReqwestTransport::new()), store)
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_request(&self, intent: &RequestIntent) -> HttpRequest {
        let token = load_token(self.store.as_ref());
        build_http_request(&self.config, intent, token.as_deref())
    }

    /// Classify a server answer for a request to `path`.
    ///
    /// With `persist_login` enabled, a successful login envelope also
    /// yields a `PersistCredential` effect.
    pub fn parse_response(&self, path: &str, response: &HttpResponse) -> Outcome {
        let mut outcome = classify_response(response, &self.config.login_route);
        if self.config.persist_login && path.contains(self.config.endpoints.login.as_str()) {
            if let Some(credential) = outcome.result.as_ref().ok().and_then(capture_login) {
                outcome.effects.push(Effect::PersistCredential(credential));
            }
        }
        outcome
    }

    /// Run one request end to end.
    pub async fn request(&self, intent: RequestIntent) -> Result<Response, ClientError> {
        let request = self.build_request(&intent);
        debug!(
            method = %request.method,
            url = %request.url,
            authorized = request.header("authorization").is_some(),
            "dispatching request"
        );

        let outcome = match self.transport.send(request).await {
            Ok(response) => {
                debug!(status = response.status, path = %intent.path, "response received");
                self.parse_response(&intent.path, &response)
            }
            Err(failure) => {
                warn!(%failure, path = %intent.path, "transport failure");
                classify_transport_failure(&failure)
            }
        };
        self.settle(outcome)
    }

    fn settle(&self, outcome: Outcome) -> Result<Response, ClientError> {
        apply_effects(
            &outcome.effects,
            self.store.as_ref(),
            self.notifier.as_ref(),
            self.navigator.as_ref(),
        );
        if let Err(err) = &outcome.result {
            warn!(kind = %err.kind, status = ?err.status_code, message = %err.message, "request rejected");
        }
        outcome.result
    }

    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Value,
        options: RequestOptions,
    ) -> Result<Response, ClientError> {
        let intent = RequestIntent::new(path).method(method).body(body).options(options);
        self.request(intent).await
    }

    pub async fn get(&self, path: &str, params: Value) -> Result<Response, ClientError> {
        self.send(HttpMethod::Get, path, params, RequestOptions::default()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response, ClientError> {
        self.send(HttpMethod::Post, path, body, RequestOptions::default()).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Response, ClientError> {
        self.send(HttpMethod::Put, path, body, RequestOptions::default()).await
    }

    pub async fn delete(&self, path: &str, body: Value) -> Result<Response, ClientError> {
        self.send(HttpMethod::Delete, path, body, RequestOptions::default()).await
    }

    pub fn build_upload(
        &self,
        path: &str,
        file_path: &str,
        form_data: BTreeMap<String, String>,
        options: UploadOptions,
    ) -> UploadRequest {
        let mut headers = Vec::new();
        merge_headers(&mut headers, &options.headers);
        let token = load_token(self.store.as_ref());
        authorize(&mut headers, path, token.as_deref(), &self.config.endpoints);

        UploadRequest {
            url: self.config.url(path),
            file_path: file_path.to_string(),
            field_name: options.name,
            form_data,
            headers,
            timeout_ms: options.timeout_ms.filter(|t| *t > 0).unwrap_or(self.config.timeout_ms),
        }
    }

    /// Multipart upload of a local file.
    ///
    /// The answer is not status- or envelope-checked: it is returned as
    /// parsed JSON when possible and as raw text otherwise.
    pub async fn upload(
        &self,
        path: &str,
        file_path: &str,
        form_data: BTreeMap<String, String>,
        options: UploadOptions,
    ) -> Result<Response, ClientError> {
        let request = self.build_upload(path, file_path, form_data, options);
        debug!(url = %request.url, file = %request.file_path, "dispatching upload");
        let result = self.transport.upload(request).await;
        if let Err(failure) = &result {
            warn!(%failure, "upload failed");
        }
        self.settle(classify_upload(result))
    }

    pub fn current_user(&self) -> Option<Credential> {
        load_credential(self.store.as_ref())
    }

    pub fn logout(&self) {
        clear_credential(self.store.as_ref());
    }
}
