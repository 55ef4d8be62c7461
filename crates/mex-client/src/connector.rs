use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info};

use mex_model::MarathonInfo;

use crate::{api::MarathonApi, errors::ClientError};

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Where the startup handshake currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// `attempt` starts at 1.
    Connecting { attempt: u32 },
    Connected(MarathonInfo),
}

/// Delay between connection attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Blocks until Marathon answers `GET /v2/info`.
///
/// Retries forever with a fixed interval: no growth, no jitter, no attempt limit.
/// The process is expected to run under a supervisor that restarts it, so waiting is preferred over exiting.
pub struct Connector {
    api: Arc<dyn MarathonApi>,
    endpoint: String,
    retry_interval: Duration,
    sleeper: Arc<dyn Sleeper>,
    state: ConnectionState,
}

impl Connector {
    /// `endpoint` is only used for logging and must already be redacted.
    pub fn new(api: Arc<dyn MarathonApi>, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            sleeper: Arc::new(TokioSleeper),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// One handshake attempt.
    pub async fn attempt(&mut self) -> Result<MarathonInfo, ClientError> {
        let attempt = match self.state {
            ConnectionState::Connecting { attempt } => attempt + 1,
            _ => 1,
        };
        self.state = ConnectionState::Connecting { attempt };
        debug!(endpoint = %self.endpoint, attempt, "connecting to marathon");

        let info = self.api.info().await?;
        debug!(name = %info.name, version = %info.version, "connected to marathon");
        self.state = ConnectionState::Connected(info.clone());
        Ok(info)
    }

    /// Retry [`Self::attempt`] until it succeeds.
    pub async fn connect(&mut self) -> MarathonInfo {
        loop {
            match self.attempt().await {
                Ok(info) => return info,
                Err(e) => {
                    debug!(endpoint = %self.endpoint, error = %e, "problem connecting to marathon");
                    info!(
                        endpoint = %self.endpoint,
                        "couldn't connect to marathon, trying again in {:?}", self.retry_interval
                    );
                    self.sleeper.sleep(self.retry_interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    };

    use mex_model::{App, Task};

    use super::*;

    /// Fails `failures` times, then answers.
    struct FlakyApi {
        failures: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyApi {
        fn new(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MarathonApi for FlakyApi {
        async fn info(&self) -> Result<MarathonInfo, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(ClientError::Timeout("connect".into()));
            }
            Ok(MarathonInfo {
                name: "marathon".into(),
                version: "1.10.17".into(),
                ..Default::default()
            })
        }

        async fn apps(&self) -> Result<Vec<App>, ClientError> {
            Ok(Vec::new())
        }

        async fn tasks(&self, _app_id: &str) -> Result<Vec<Task>, ClientError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    #[tokio::test]
    async fn connects_immediately_when_reachable() {
        let api = Arc::new(FlakyApi::new(0));
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut connector =
            Connector::new(api.clone(), "http://marathon.mesos:8080").with_sleeper(sleeper.clone());

        assert_eq!(connector.state(), &ConnectionState::Disconnected);
        let info = connector.connect().await;

        assert_eq!(info.version, "1.10.17");
        assert_eq!(connector.state(), &ConnectionState::Connected(info));
        assert!(sleeper.slept.lock().unwrap().is_empty());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_with_fixed_interval_until_success() {
        let api = Arc::new(FlakyApi::new(3));
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut connector = Connector::new(api.clone(), "http://marathon.mesos:8080")
            .with_sleeper(sleeper.clone());

        let info = connector.connect().await;

        assert_eq!(info.name, "marathon");
        assert_eq!(api.calls.load(Ordering::SeqCst), 4);
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            vec![DEFAULT_RETRY_INTERVAL; 3]
        );
        assert!(matches!(connector.state(), ConnectionState::Connected(_)));
    }

    #[tokio::test]
    async fn attempt_tracks_state() {
        let api = Arc::new(FlakyApi::new(2));
        let mut connector = Connector::new(api, "http://marathon.mesos:8080")
            .with_retry_interval(Duration::from_millis(1));

        assert!(connector.attempt().await.is_err());
        assert_eq!(connector.state(), &ConnectionState::Connecting { attempt: 1 });
        assert!(connector.attempt().await.is_err());
        assert_eq!(connector.state(), &ConnectionState::Connecting { attempt: 2 });
        assert!(connector.attempt().await.is_ok());
        assert!(matches!(connector.state(), ConnectionState::Connected(_)));
    }

    #[tokio::test]
    async fn custom_interval_is_used() {
        let api = Arc::new(FlakyApi::new(1));
        let sleeper = Arc::new(RecordingSleeper::default());
        let mut connector = Connector::new(api, "http://marathon.mesos:8080")
            .with_retry_interval(Duration::from_secs(2))
            .with_sleeper(sleeper.clone());

        connector.connect().await;
        assert_eq!(*sleeper.slept.lock().unwrap(), vec![Duration::from_secs(2)]);
    }
}
