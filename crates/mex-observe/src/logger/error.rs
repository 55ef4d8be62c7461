use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log format '{0}' (expected text|json)")]
    InvalidFormat(String),
    #[error("invalid color mode '{0}' (expected auto|always|never)")]
    InvalidColor(String),
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}
