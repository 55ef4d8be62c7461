use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings for [`crate::HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Applied both as connect timeout and as whole-request timeout.
    pub timeout: Duration,
    /// Accept any server certificate.
    ///
    /// Intended for intra-cluster deployments where Marathon serves a self-signed certificate.
    pub tls_insecure_skip_verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            tls_insecure_skip_verify: false,
        }
    }
}
