// Shared transport configuration for building reqwest::Client instances.
//
// Timeout and user agent are fixed per client; the vendor API is always
// reached over public TLS, so there is no certificate override.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("flameboss-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout enforced by reqwest.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
