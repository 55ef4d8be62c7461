use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid metrics path: {0}")]
    InvalidPath(String),

    #[error("failed to encode metrics: {0}")]
    Encode(#[from] prometheus::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "request failed");
        let status = match self {
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
