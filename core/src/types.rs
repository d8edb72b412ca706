//! Domain DTOs for the task API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently;
//! the integration tests catch drift between the two crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task as the server reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }
}

/// Username/password pair for login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `data` of a successful login envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginData {
    pub token: String,
    pub username: String,
}

/// Body of `/task/count`, which is not wrapped in an envelope.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCount {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
}

/// `data` of a batch completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchResult {
    pub updated: u64,
}
