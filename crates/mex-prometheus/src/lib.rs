//! Prometheus exposition of Marathon state.
//!
//! [`Exporter`] is a pull collector: every call to [`Exporter::collect`] fetches a fresh
//! [`mex_core::Snapshot`] and renders it into a private [`prometheus::Registry`], so concurrent
//! scrapes never share per-scrape state. Only the scrape and error totals live across calls.
//!
//! ## Metrics
//! Per application, labeled `app` plus the configured metadata labels:
//! - `<ns>_app_instances_desired`, `<ns>_app_instances_running`, `<ns>_app_instances_staged`
//! - `<ns>_app_instances_healthy`, `<ns>_app_instances_unhealthy`
//! - `<ns>_app_cpus`, `<ns>_app_memory_megabytes`, `<ns>_app_disk_megabytes`
//! - `<ns>_app_tasks{state}`, `<ns>_app_tasks_unhealthy`
//!
//! Global:
//! - `<ns>_apps`
//! - `<ns>_up` - 1 if the last scrape succeeded
//! - `<ns>_exporter_last_scrape_duration_seconds`
//! - `<ns>_exporter_scrapes_total`, `<ns>_exporter_scrape_errors_total`
//!
//! This crate does NOT serve HTTP; see `mex-api`.

mod exporter;
pub use exporter::{Exporter, ExporterConfig};

mod metrics;

pub use prometheus::{Encoder, TextEncoder, proto::MetricFamily};
