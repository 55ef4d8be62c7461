mod config;
mod error;
mod format;
mod init;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::{ColorMode, LoggerFormat};
pub use init::logger_init;
