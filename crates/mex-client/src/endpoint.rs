use std::fmt;

use reqwest::Url;

use crate::errors::ClientError;

pub const ENV_USERNAME: &str = "MARATHON_USERNAME";
pub const ENV_PASSWORD: &str = "MARATHON_PASSWORD";

/// HTTP basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password_len", &self.password.chars().count())
            .finish()
    }
}

/// Credentials taken from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl EnvCredentials {
    /// Read `MARATHON_USERNAME` and `MARATHON_PASSWORD`.
    pub fn from_env() -> Self {
        Self {
            username: std::env::var(ENV_USERNAME).ok(),
            password: std::env::var(ENV_PASSWORD).ok(),
        }
    }
}

/// Validated Marathon base URL plus resolved credentials.
///
/// The stored URL never carries user-info, so it is safe to log.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    credentials: Option<Credentials>,
}

impl Endpoint {
    /// Parse `uri` and resolve credentials.
    ///
    /// Precedence: user-info embedded in the URI, then `env`, then none.
    /// User-info without a password yields an unauthenticated endpoint; the environment is not consulted in that case.
    pub fn parse(uri: &str, env: &EnvCredentials) -> Result<Self, ClientError> {
        let mut url = Url::parse(uri.trim())
            .map_err(|e| ClientError::InvalidEndpoint(format!("{uri}: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidEndpoint(format!(
                "unsupported scheme '{}' (expected http or https)",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ClientError::InvalidEndpoint(format!("{uri}: missing host")));
        }

        let has_userinfo = !url.username().is_empty() || url.password().is_some();
        let (username, password) = if has_userinfo {
            match url.password() {
                Some(pass) => (decode_userinfo(url.username())?, decode_userinfo(pass)?),
                None => (String::new(), String::new()),
            }
        } else {
            (
                env.username.clone().unwrap_or_default(),
                env.password.clone().unwrap_or_default(),
            )
        };
        let credentials = (!username.is_empty() && !password.is_empty())
            .then_some(Credentials { username, password });

        // set_username/set_password only fail for cannot-be-a-base URLs, excluded by the scheme check
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { base: url, credentials })
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Resolve an API path (e.g. `v2/apps`) against the base URL.
    pub fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidEndpoint(format!("{path}: {e}")))
    }

    /// Endpoint rendering without credentials.
    pub fn redacted(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// User-info comes out of `Url` still percent-encoded.
fn decode_userinfo(raw: &str) -> Result<String, ClientError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|e| ClientError::InvalidEndpoint(format!("user-info is not valid UTF-8: {e}")))
}
