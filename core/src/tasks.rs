//! Task API operations on top of the generic verbs.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::client::TaskClient;
use crate::envelope::Response;
use crate::error::{ClientError, ErrorKind};
use crate::types::{LoginRequest, NewTask};

impl TaskClient {
    /// Log in. The session is stored automatically only when
    /// `ClientConfig::persist_login` is set.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Response, ClientError> {
        let body = encode_body(credentials)?;
        self.post(&self.config().endpoints.login, body).await
    }

    pub async fn register(&self, credentials: &LoginRequest) -> Result<Response, ClientError> {
        let body = encode_body(credentials)?;
        self.post(&self.config().endpoints.register, body).await
    }

    pub async fn task_all(&self) -> Result<Response, ClientError> {
        self.get(&self.config().endpoints.task_all, json!({})).await
    }

    pub async fn task_pending(&self) -> Result<Response, ClientError> {
        self.get(&self.config().endpoints.task_pending, json!({})).await
    }

    pub async fn task_completed(&self) -> Result<Response, ClientError> {
        self.get(&self.config().endpoints.task_completed, json!({})).await
    }

    /// Counts come back as a bare object, not an envelope.
    pub async fn task_count(&self) -> Result<Response, ClientError> {
        self.get(&self.config().endpoints.task_count, json!({})).await
    }

    pub async fn add_task(&self, task: &NewTask) -> Result<Response, ClientError> {
        let body = encode_body(task)?;
        self.post(&self.config().endpoints.task_add, body).await
    }

    pub async fn complete_task(&self, id: Uuid) -> Result<Response, ClientError> {
        let path = format!("{}/{id}", self.config().endpoints.task_complete);
        self.put(&path, json!({})).await
    }

    pub async fn complete_task_batch(&self, ids: &[Uuid]) -> Result<Response, ClientError> {
        self.put(&self.config().endpoints.task_complete_batch, json!(ids)).await
    }
}

/// A body that cannot be encoded never reaches the wire, so it is reported
/// on the transport channel.
fn encode_body<T: Serialize>(input: &T) -> Result<Value, ClientError> {
    serde_json::to_value(input).map_err(|e| {
        ClientError::new(ErrorKind::TransportFailure, format!("request body could not be encoded: {e}"))
    })
}
