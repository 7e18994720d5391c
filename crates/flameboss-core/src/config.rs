// ── Runtime connection configuration ──
//
// These types describe *how* to reach one Flame Boss account. They carry
// credential data and timing, but never touch disk. The CLI builds a
// `ControllerConfig` from the config file and hands it in.

use std::time::Duration;

use url::Url;

use flameboss_api::{Credentials, DEFAULT_BASE_URL, TransportConfig};

use crate::coordinator::CoordinatorConfig;
use crate::error::CoreError;

/// Configuration for one controller connection.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// API host (defaults to the production service).
    pub base_url: Url,
    /// Token, username and device id from onboarding.
    pub credentials: Credentials,
    /// Time between scheduled refreshes.
    pub poll_interval: Duration,
    /// Upper bound on one refresh.
    pub refresh_timeout: Duration,
    /// Per-HTTP-request timeout.
    pub request_timeout: Duration,
}

impl ControllerConfig {
    /// Production host with default timings.
    pub fn new(credentials: Credentials) -> Result<Self, CoreError> {
        let base_url = Url::parse(DEFAULT_BASE_URL).map_err(|e| CoreError::Config {
            message: format!("Invalid URL: {e}"),
        })?;
        let coordinator = CoordinatorConfig::default();
        Ok(Self {
            base_url,
            credentials,
            poll_interval: coordinator.poll_interval,
            refresh_timeout: coordinator.refresh_timeout,
            request_timeout: TransportConfig::default().timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            poll_interval: self.poll_interval,
            refresh_timeout: self.refresh_timeout,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.request_timeout)
    }
}
