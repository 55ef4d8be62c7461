use serde::{Deserialize, Serialize};

use crate::{AppId, Metadata, Task};

/// A Marathon-managed application.
///
/// Counters are reported by Marathon alongside the definition; missing numeric fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Application identifier, including its group path.
    pub id: AppId,
    /// Desired number of instances.
    #[serde(default)]
    pub instances: u32,
    /// Number of tasks currently running.
    #[serde(default)]
    pub tasks_running: u32,
    /// Number of tasks staged but not yet running.
    #[serde(default)]
    pub tasks_staged: u32,
    /// Number of tasks passing all health checks.
    #[serde(default)]
    pub tasks_healthy: u32,
    /// Number of tasks failing at least one health check.
    #[serde(default)]
    pub tasks_unhealthy: u32,
    /// CPU shares requested per instance.
    #[serde(default)]
    pub cpus: f64,
    /// Memory requested per instance, in MiB.
    #[serde(default)]
    pub mem: f64,
    /// Disk requested per instance, in MiB.
    #[serde(default)]
    pub disk: f64,
    /// User supplied metadata.
    #[serde(default)]
    pub labels: Metadata,
    /// Tasks, present only when requested with `embed=apps.tasks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl App {
    /// Look up a metadata value by key.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Embedded tasks, or an empty slice when none were embedded.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }
}
