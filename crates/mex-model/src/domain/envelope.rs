use serde::{Deserialize, Serialize};

use crate::{App, Task};

/// Body of `GET /v2/apps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppsResponse {
    #[serde(default)]
    pub apps: Vec<App>,
}

/// Body of `GET /v2/apps/{id}/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
}
