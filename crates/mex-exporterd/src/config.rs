use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use mex_api::validate_metrics_path;
use mex_client::ClientConfig;
use mex_core::{AppFilter, LabelConfig, LabelError};
use mex_observe::{ColorMode, LoggerConfig, LoggerFormat};
use mex_prometheus::ExporterConfig;

/// Prometheus exporter for Marathon application and task state.
#[derive(Parser, Debug, Clone)]
#[command(name = "marathon-exporter", version)]
pub struct Cli {
    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address", default_value = ":9088")]
    pub listen_address: String,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", default_value = "/metrics")]
    pub metrics_path: String,

    /// URI of Marathon. User-info takes precedence over MARATHON_USERNAME/MARATHON_PASSWORD.
    #[arg(long = "marathon.uri", default_value = "http://marathon.mesos:8080")]
    pub marathon_uri: String,

    /// Comma separated application metadata keys to expose as labels.
    #[arg(long = "app.labels", default_value = "")]
    pub labels: String,

    /// Comma separated group paths whose applications are skipped (e.g. /system).
    #[arg(long = "app.exclude-prefix", default_value = "")]
    pub exclude_prefix: String,

    /// Skip TLS certificate verification for Marathon.
    #[arg(long = "marathon.tls-insecure-skip-verify", env = "MARATHON_TLS_INSECURE_SKIP_VERIFY")]
    pub tls_insecure_skip_verify: bool,

    /// Connect and request timeout for Marathon calls, in seconds.
    #[arg(long = "marathon.timeout", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Delay between startup connection attempts, in seconds.
    #[arg(long = "marathon.retry-interval", default_value_t = 10)]
    pub retry_interval_secs: u64,

    /// Upper bound for a single scrape, in seconds.
    #[arg(long = "scrape.timeout", default_value_t = 10)]
    pub scrape_timeout_secs: u64,

    /// Metric name prefix.
    #[arg(long = "metrics.namespace", default_value = "marathon")]
    pub namespace: String,

    /// Log filter directive.
    #[arg(long = "log.level", default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Log output format: text or json.
    #[arg(long = "log.format", default_value = "text")]
    pub log_format: LoggerFormat,

    /// Colored text logs: auto, always or never.
    #[arg(long = "log.color", default_value = "auto")]
    pub log_color: ColorMode,

    /// Include the emitting module in each log line.
    #[arg(long = "log.with-targets")]
    pub log_with_targets: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid listen address '{0}'")]
    ListenAddress(String),

    #[error("invalid telemetry path '{0}' (must start with '/', not be '/', and contain no route syntax)")]
    MetricsPath(String),

    #[error("invalid {name}: must be greater than zero")]
    ZeroDuration { name: &'static str },

    #[error("invalid metrics namespace '{0}'")]
    Namespace(String),

    #[error(transparent)]
    Labels(#[from] LabelError),
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_address: String,
    pub metrics_path: String,
    pub marathon_uri: String,
    pub labels: LabelConfig,
    pub filter: AppFilter,
    pub client: ClientConfig,
    pub retry_interval: Duration,
    pub exporter: ExporterConfig,
}

impl Cli {
    pub fn logger(&self) -> LoggerConfig {
        LoggerConfig::new(self.log_format, self.log_level.as_str())
            .with_color(self.log_color)
            .with_targets(self.log_with_targets)
    }

    pub fn settings(&self) -> Result<Settings, ConfigError> {
        validate_metrics_path(&self.metrics_path)
            .map_err(|_| ConfigError::MetricsPath(self.metrics_path.clone()))?;
        if !self.namespace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            || self.namespace.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(ConfigError::Namespace(self.namespace.clone()));
        }

        Ok(Settings {
            listen_address: listen_address(&self.listen_address)?,
            metrics_path: self.metrics_path.clone(),
            marathon_uri: self.marathon_uri.clone(),
            labels: LabelConfig::parse(&self.labels)?,
            filter: AppFilter::parse(&self.exclude_prefix),
            client: ClientConfig {
                timeout: seconds("marathon.timeout", self.timeout_secs)?,
                tls_insecure_skip_verify: self.tls_insecure_skip_verify,
            },
            retry_interval: seconds("marathon.retry-interval", self.retry_interval_secs)?,
            exporter: ExporterConfig {
                namespace: self.namespace.clone(),
                scrape_timeout: seconds("scrape.timeout", self.scrape_timeout_secs)?,
            },
        })
    }
}

/// `:9088` binds every interface, like Go's `net.Listen`.
fn listen_address(raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::ListenAddress(raw.to_string()))?;
    if port.parse::<u16>().is_err() {
        return Err(ConfigError::ListenAddress(raw.to_string()));
    }
    if host.is_empty() {
        return Ok(format!("0.0.0.0:{port}"));
    }
    Ok(raw.to_string())
}

fn seconds(name: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroDuration { name });
    }
    Ok(Duration::from_secs(secs))
}
