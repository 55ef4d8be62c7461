use serde::{Deserialize, Serialize};

use crate::AppId;

/// A running (or starting) instance of an [`crate::App`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub app_id: AppId,
    #[serde(default)]
    pub host: String,
    /// Mesos task state, e.g. `TASK_RUNNING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// RFC 3339 timestamp of staging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_at: Option<String>,
    /// RFC 3339 timestamp of the transition to running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_check_results: Vec<HealthCheckResult>,
}

/// Outcome of one health check for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub alive: bool,
    #[serde(default)]
    pub consecutive_failures: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<String>,
}

impl Task {
    /// State in label form: `TASK_RUNNING` becomes `running`, a missing state becomes `unknown`.
    pub fn state_label(&self) -> String {
        match self.state.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                let s = s.strip_prefix("TASK_").unwrap_or(s);
                s.to_ascii_lowercase()
            }
            _ => "unknown".to_string(),
        }
    }

    /// `true` when at least one health check reports the task as not alive.
    pub fn is_unhealthy(&self) -> bool {
        self.health_check_results.iter().any(|r| !r.alive)
    }
}
