use async_trait::async_trait;
use mex_model::{App, MarathonInfo, Task};

use crate::errors::ClientError;

/// Read-only view of the Marathon API used by the exporter.
#[async_trait]
pub trait MarathonApi: Send + Sync {
    /// Control-plane name and version.
    async fn info(&self) -> Result<MarathonInfo, ClientError>;

    /// All applications, with their tasks embedded where the server supports it.
    async fn apps(&self) -> Result<Vec<App>, ClientError>;

    /// Tasks of a single application.
    async fn tasks(&self, app_id: &str) -> Result<Vec<Task>, ClientError>;
}
