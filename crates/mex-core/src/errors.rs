use std::time::Duration;

use mex_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("marathon request failed: {0}")]
    Client(#[from] ClientError),

    #[error("scrape exceeded {0:?}")]
    Timeout(Duration),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("label key '{key}' maps to '{name}', which is reserved")]
    Reserved { key: String, name: String },

    #[error("label keys '{first}' and '{second}' both map to '{name}'")]
    Duplicate {
        first: String,
        second: String,
        name: String,
    },
}
