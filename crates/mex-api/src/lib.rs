mod error;
pub use error::ApiError;

mod handler;
pub use handler::MetricsHandler;

mod http;
pub use http::{HttpApi, SCRAPE_TIMEOUT_HEADER, validate_metrics_path};

pub use axum;
