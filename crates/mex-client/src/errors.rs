use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid marathon endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("failed to build http client: {0}")]
    Build(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("http request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("marathon rejected credentials (status {status})")]
    Unauthorized { status: u16 },

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout(e.to_string())
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e)
        }
    }
}
