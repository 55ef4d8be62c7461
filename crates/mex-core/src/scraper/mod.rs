mod filter;
pub use filter::AppFilter;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mex_client::MarathonApi;
use mex_model::App;

use crate::errors::ScrapeError;

/// Point-in-time view of Marathon, built fresh on every scrape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Sorted by id; every app has `tasks` populated.
    pub apps: Vec<App>,
}

/// Source of [`Snapshot`]s.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Fetch the current state. Errors are returned as-is; no retries.
    async fn fetch_state(&self) -> Result<Snapshot, ScrapeError>;
}

/// [`Scraper`] backed by a [`MarathonApi`].
pub struct MarathonScraper {
    api: Arc<dyn MarathonApi>,
    filter: AppFilter,
}

impl MarathonScraper {
    pub fn new(api: Arc<dyn MarathonApi>) -> Self {
        Self {
            api,
            filter: AppFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: AppFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[async_trait]
impl Scraper for MarathonScraper {
    async fn fetch_state(&self) -> Result<Snapshot, ScrapeError> {
        let mut apps = self.api.apps().await?;
        let total = apps.len();
        apps.retain(|app| self.filter.accepts(&app.id));

        // Tasks are normally embedded in the apps listing; only servers that ignore `embed` need one call per app.
        let mut fallbacks = 0usize;
        for app in apps.iter_mut().filter(|app| app.tasks.is_none()) {
            app.tasks = Some(self.api.tasks(&app.id).await?);
            fallbacks += 1;
        }
        apps.sort_by(|a, b| a.id.cmp(&b.id));

        debug!(
            apps = apps.len(),
            excluded = total - apps.len(),
            task_lookups = fallbacks,
            "fetched marathon state"
        );
        Ok(Snapshot { apps })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use mex_client::ClientError;
    use mex_model::{MarathonInfo, Task};

    use super::*;

    #[derive(Default)]
    struct FakeApi {
        apps: Vec<App>,
        fail_apps: AtomicBool,
        task_calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarathonApi for FakeApi {
        async fn info(&self) -> Result<MarathonInfo, ClientError> {
            Ok(MarathonInfo::default())
        }

        async fn apps(&self) -> Result<Vec<App>, ClientError> {
            if self.fail_apps.load(Ordering::SeqCst) {
                return Err(ClientError::Status {
                    status: 503,
                    url: "http://marathon/v2/apps".into(),
                });
            }
            Ok(self.apps.clone())
        }

        async fn tasks(&self, app_id: &str) -> Result<Vec<Task>, ClientError> {
            self.task_calls.lock().unwrap().push(app_id.to_string());
            Ok(vec![Task {
                id: format!("{app_id}.1"),
                app_id: app_id.to_string(),
                state: Some("TASK_RUNNING".into()),
                ..Default::default()
            }])
        }
    }

    fn app(id: &str, tasks: Option<Vec<Task>>) -> App {
        App {
            id: id.to_string(),
            instances: 1,
            tasks,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn embedded_tasks_need_no_extra_calls() {
        let api = Arc::new(FakeApi {
            apps: vec![app("/web", Some(vec![])), app("/api", Some(vec![]))],
            ..Default::default()
        });
        let scraper = MarathonScraper::new(api.clone());

        let snapshot = scraper.fetch_state().await.unwrap();
        let ids: Vec<_> = snapshot.apps.iter().map(|a| a.id.as_str()).collect();

        assert_eq!(ids, vec!["/api", "/web"]);
        assert!(api.task_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_tasks_are_fetched_per_app() {
        let api = Arc::new(FakeApi {
            apps: vec![app("/web", None), app("/api", Some(vec![]))],
            ..Default::default()
        });
        let scraper = MarathonScraper::new(api.clone());

        let snapshot = scraper.fetch_state().await.unwrap();

        assert_eq!(*api.task_calls.lock().unwrap(), vec!["/web".to_string()]);
        let web = snapshot.apps.iter().find(|a| a.id == "/web").unwrap();
        assert_eq!(web.tasks().len(), 1);
        assert!(snapshot.apps.iter().all(|a| a.tasks.is_some()));
    }

    #[tokio::test]
    async fn excluded_apps_are_dropped_before_task_lookups() {
        let api = Arc::new(FakeApi {
            apps: vec![app("/system/lb", None), app("/web", Some(vec![]))],
            ..Default::default()
        });
        let scraper = MarathonScraper::new(api.clone()).with_filter(AppFilter::parse("/system"));

        let snapshot = scraper.fetch_state().await.unwrap();

        assert_eq!(snapshot.apps.len(), 1);
        assert_eq!(snapshot.apps[0].id, "/web");
        assert!(api.task_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_errors_surface_unchanged() {
        let api = Arc::new(FakeApi::default());
        api.fail_apps.store(true, Ordering::SeqCst);
        let scraper = MarathonScraper::new(api);

        let err = scraper.fetch_state().await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Client(ClientError::Status { status: 503, .. })
        ));
    }
}
