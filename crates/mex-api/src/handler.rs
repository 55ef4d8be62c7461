use std::time::Duration;

use async_trait::async_trait;
use mex_prometheus::{Exporter, MetricFamily};

/// Source of metric families for the metrics endpoint.
#[async_trait]
pub trait MetricsHandler: Send + Sync + 'static {
    /// Gather a fresh set of families; `timeout` is the scraper's remaining budget, if known.
    async fn gather(&self, timeout: Option<Duration>) -> Vec<MetricFamily>;
}

#[async_trait]
impl MetricsHandler for Exporter {
    async fn gather(&self, timeout: Option<Duration>) -> Vec<MetricFamily> {
        self.collect(timeout).await
    }
}
