mod app;
pub use app::App;

mod task;
pub use task::{HealthCheckResult, Task};

mod info;
pub use info::MarathonInfo;

mod envelope;
pub use envelope::{AppsResponse, TasksResponse};

/// Marathon application identifier (e.g. `/prod/web`).
pub type AppId = String;

/// Application metadata: Marathon calls these `labels`.
pub type Metadata = std::collections::HashMap<String, String>;
