//! Logical operation name to path. Pure configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub task_all: String,
    pub task_pending: String,
    pub task_completed: String,
    pub task_count: String,
    pub task_add: String,
    pub task_complete: String,
    pub task_complete_batch: String,
    pub upload: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
            task_all: "/task/all".to_string(),
            task_pending: "/task/pending".to_string(),
            task_completed: "/task/completed".to_string(),
            task_count: "/task/count".to_string(),
            task_add: "/task/add".to_string(),
            task_complete: "/task/complete".to_string(),
            task_complete_batch: "/task/complete/batch".to_string(),
            upload: "/upload".to_string(),
        }
    }
}
