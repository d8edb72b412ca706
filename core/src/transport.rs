//! The network seam.
//!
//! # Design
//! `Transport` performs exactly one round-trip and reports either the
//! server's answer (any status, as data) or a `TransportFailure`. It never
//! interprets status codes or bodies; that is classification's job.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::debug;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, TransportFailure, UploadRequest};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;

    async fn upload(&self, request: UploadRequest) -> Result<HttpResponse, TransportFailure>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }

    async fn finish(response: reqwest::Response) -> Result<HttpResponse, TransportFailure> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await.map_err(describe)?;
        debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let mut builder = self
            .http
            .request(Self::method(request.method), &request.url)
            .timeout(Duration::from_millis(request.timeout_ms));
        // GET carries its parameters in the query string.
        builder = match request.method {
            HttpMethod::Get => builder.query(&query_pairs(&request.body)),
            _ => {
                let body = serde_json::to_vec(&request.body).map_err(|e| TransportFailure::new(e.to_string()))?;
                builder.body(body)
            }
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await.map_err(describe)?;
        Self::finish(response).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<HttpResponse, TransportFailure> {
        let bytes = tokio::fs::read(&request.file_path)
            .await
            .map_err(|e| TransportFailure::new(format!("upload:fail read {}: {e}", request.file_path)))?;
        let file_name = std::path::Path::new(&request.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.field_name.clone());

        let mut form = Form::new().part(request.field_name.clone(), Part::bytes(bytes).file_name(file_name));
        for (key, value) in &request.form_data {
            form = form.text(key.clone(), value.clone());
        }

        let mut builder = self
            .http
            .post(&request.url)
            .timeout(Duration::from_millis(request.timeout_ms))
            .multipart(form);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await.map_err(describe)?;
        Self::finish(response).await
    }
}

fn query_pairs(body: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = body else {
        return Vec::new();
    };
    map.iter()
        .map(|(k, v)| match v {
            Value::String(s) => (k.clone(), s.clone()),
            other => (k.clone(), other.to_string()),
        })
        .collect()
}

/// Describe a reqwest error so that timeouts mention "timeout" and
/// connection problems mention "fail".
fn describe(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::new(format!("request:fail timeout ({err})"))
    } else if err.is_connect() {
        TransportFailure::new(format!("request:fail connect ({err})"))
    } else {
        TransportFailure::new(format!("request:error {err}"))
    }
}
