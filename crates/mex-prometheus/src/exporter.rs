use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use prometheus::{
    Gauge, IntCounter, Opts, Registry,
    core::{Collector, Desc},
    proto::MetricFamily,
};
use tracing::{debug, warn};

use mex_core::{LabelConfig, ScrapeError, Scraper, Snapshot};

use crate::metrics::AppMetrics;

pub const DEFAULT_NAMESPACE: &str = "marathon";
pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Metric name prefix; empty for none.
    pub namespace: String,
    /// Upper bound on a single scrape.
    pub scrape_timeout: Duration,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            scrape_timeout: DEFAULT_SCRAPE_TIMEOUT,
        }
    }
}

/// Turns Marathon state into Prometheus metric families on demand.
///
/// Safe to share across concurrent scrapes: each call renders into its own registry and
/// the only shared state is two atomic counters.
pub struct Exporter {
    scraper: Arc<dyn Scraper>,
    labels: LabelConfig,
    config: ExporterConfig,
    scrapes: IntCounter,
    errors: IntCounter,
}

impl Exporter {
    pub fn new(
        scraper: Arc<dyn Scraper>,
        labels: LabelConfig,
        config: ExporterConfig,
    ) -> prometheus::Result<Self> {
        let scrapes = IntCounter::with_opts(
            Opts::new("exporter_scrapes_total", "Total number of scrapes.")
                .namespace(config.namespace.as_str()),
        )?;
        let errors = IntCounter::with_opts(
            Opts::new(
                "exporter_scrape_errors_total",
                "Total number of scrapes that failed to fetch marathon state.",
            )
            .namespace(config.namespace.as_str()),
        )?;
        // Fail at construction rather than on the first scrape if the label set is unusable.
        AppMetrics::new(&config.namespace, &labels)?;

        Ok(Self {
            scraper,
            labels,
            config,
            scrapes,
            errors,
        })
    }

    /// Number of failed scrapes since start.
    pub fn scrape_errors(&self) -> u64 {
        self.errors.get()
    }

    /// Number of scrapes since start.
    pub fn scrapes(&self) -> u64 {
        self.scrapes.get()
    }

    /// Descriptors of every metric this exporter can emit.
    pub fn describe(&self) -> prometheus::Result<Vec<Desc>> {
        let (up, duration) = self.scrape_gauges()?;
        let mut descs: Vec<Desc> = AppMetrics::new(&self.config.namespace, &self.labels)?
            .collectors()
            .iter()
            .flat_map(|c| c.desc().into_iter().cloned().collect::<Vec<_>>())
            .collect();
        let meta: [&dyn Collector; 4] = [&up, &duration, &self.scrapes, &self.errors];
        for c in meta {
            descs.extend(c.desc().into_iter().cloned());
        }
        Ok(descs)
    }

    /// Scrape Marathon and render the result.
    ///
    /// `timeout` is the caller's budget (e.g. the Prometheus scrape timeout); the effective
    /// limit is the smaller of it and the configured scrape timeout. On failure only the
    /// exporter's own metrics are returned.
    pub async fn collect(&self, timeout: Option<Duration>) -> Vec<MetricFamily> {
        let limit = timeout.map_or(self.config.scrape_timeout, |t| {
            t.min(self.config.scrape_timeout)
        });
        let start = Instant::now();
        self.scrapes.inc();

        let result = match tokio::time::timeout(limit, self.scraper.fetch_state()).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout(limit)),
        };
        let registry = match result {
            Ok(snapshot) => match self.render(&snapshot) {
                Ok(registry) => {
                    debug!(apps = snapshot.apps.len(), "scrape succeeded");
                    Some(registry)
                }
                Err(e) => {
                    warn!(error = %e, "failed to render marathon state");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "failed to scrape marathon");
                None
            }
        };
        let up = registry.is_some();
        if !up {
            self.errors.inc();
        }
        let elapsed = start.elapsed();

        let registry = registry.unwrap_or_default();
        if let Err(e) = self.register_meta(&registry, up, elapsed) {
            warn!(error = %e, "failed to register exporter metrics");
        }
        debug!(up, duration_ms = elapsed.as_millis() as u64, "scrape finished");
        registry.gather()
    }

    fn render(&self, snapshot: &Snapshot) -> prometheus::Result<Registry> {
        let metrics = AppMetrics::new(&self.config.namespace, &self.labels)?;
        metrics.observe(&self.labels, snapshot);

        let registry = Registry::new();
        metrics.register(&registry)?;
        Ok(registry)
    }

    fn scrape_gauges(&self) -> prometheus::Result<(Gauge, Gauge)> {
        let ns = self.config.namespace.as_str();
        let up = Gauge::with_opts(
            Opts::new("up", "Whether the last scrape of marathon succeeded.").namespace(ns),
        )?;
        let duration = Gauge::with_opts(
            Opts::new(
                "exporter_last_scrape_duration_seconds",
                "Duration of the last scrape of marathon.",
            )
            .namespace(ns),
        )?;
        Ok((up, duration))
    }

    fn register_meta(
        &self,
        registry: &Registry,
        up: bool,
        elapsed: Duration,
    ) -> prometheus::Result<()> {
        let (up_gauge, duration) = self.scrape_gauges()?;
        up_gauge.set(if up { 1.0 } else { 0.0 });
        duration.set(elapsed.as_secs_f64());

        registry.register(Box::new(up_gauge))?;
        registry.register(Box::new(duration))?;
        registry.register(Box::new(self.scrapes.clone()))?;
        registry.register(Box::new(self.errors.clone()))?;
        Ok(())
    }
}
