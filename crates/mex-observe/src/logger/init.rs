use std::io;

use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::subscriber::{SetGlobalDefaultError, set_global_default};
use tracing_subscriber::{EnvFilter, Layer, fmt, fmt::time::OffsetTime, layer::SubscriberExt};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Install the global subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when called twice in one process.
pub fn logger_init(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = mk_filter(&cfg.filter)?;
    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_target(cfg.with_targets)
        .with_ansi(cfg.ansi())
        .with_timer(mk_timer());
    let output = match cfg.format {
        LoggerFormat::Text => base.boxed(),
        LoggerFormat::Json => base.json().flatten_event(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(output);
    set_global_default(subscriber).map_err(|_: SetGlobalDefaultError| LoggerError::AlreadyInitialized)
}

fn mk_filter(filter: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(filter).map_err(|e| LoggerError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })
}

/// Local offset when the platform can tell it, UTC otherwise.
fn mk_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}
