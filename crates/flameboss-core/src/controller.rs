// ── Controller abstraction ──
//
// Lifecycle for one Flame Boss account: build the client from stored
// credentials, warm the cache, run the refresh timer, route set-point
// writes. Everything a consumer needs hangs off this one handle.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use flameboss_api::{Credentials, FlameBossClient, TransportConfig};

use crate::config::ControllerConfig;
use crate::coordinator::{Coordinator, RefreshState};
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::readings::{self, Reading};
use crate::stream::SnapshotStream;

/// What onboarding and re-authentication hand back for persisting.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub user_id: i64,
    pub credentials: Credentials,
}

/// Log in and find the account's controller.
///
/// Performs `login` followed by device discovery on a throwaway client and
/// returns everything a later [`Controller`] needs. A rejected login is
/// [`CoreError::AuthenticationFailed`]; an account without a controller is
/// [`CoreError::NotFound`].
pub async fn onboard(
    base_url: Url,
    username: &str,
    password: &SecretString,
    transport: &TransportConfig,
) -> Result<AccountCredentials, CoreError> {
    let client = FlameBossClient::new(base_url, transport)?;
    let login = client.login(username, password).await?;
    let device_id = client.discover_device().await?;
    info!(user_id = login.user_id, device_id, "onboarding complete");

    let credentials = client
        .credentials()
        .ok_or_else(|| CoreError::Internal("session missing after login".into()))?;
    Ok(AccountCredentials {
        user_id: login.user_id,
        credentials,
    })
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. One controller covers one
/// connect/disconnect cycle; reconnecting means building a new one.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: Arc<FlameBossClient>,
    coordinator: Coordinator,
}

impl Controller {
    /// Create a controller from configuration. Does NOT fetch anything;
    /// call [`connect()`](Self::connect).
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let client = Arc::new(FlameBossClient::with_credentials(
            config.base_url.clone(),
            config.credentials.clone(),
            &config.transport(),
        )?);
        Ok(Self::with_client(config, client))
    }

    /// Create a controller around an existing client.
    pub fn with_client(config: ControllerConfig, client: Arc<FlameBossClient>) -> Self {
        let coordinator = Coordinator::new(Arc::clone(&client), config.coordinator());
        Self {
            inner: Arc::new(ControllerInner {
                config,
                client,
                coordinator,
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<FlameBossClient> {
        &self.inner.client
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.inner.coordinator
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Warm the cache and start scheduled refreshes.
    ///
    /// A failing first refresh is returned as [`CoreError::SetupFailed`] and
    /// nothing is spawned.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let snapshot = self.inner.coordinator.first_refresh().await?;
        info!(title = %snapshot.title, online = snapshot.online, "connected");
        self.inner.coordinator.start().await
    }

    /// Build a controller and run a single refresh, without a timer.
    pub async fn oneshot(config: ControllerConfig) -> Result<Self, CoreError> {
        let controller = Self::new(config)?;
        controller.inner.coordinator.first_refresh().await?;
        Ok(controller)
    }

    /// Stop scheduled refreshes. The cached snapshot stays readable.
    pub async fn disconnect(&self) {
        self.inner.coordinator.shutdown().await;
        debug!("disconnected");
    }

    /// Log in again with the stored username and a fresh password.
    ///
    /// The new token replaces the old one on the shared client; the device
    /// id is kept. Scheduled polling paused by the rejection resumes once the
    /// follow-up refresh succeeds. Returns the credentials to persist.
    pub async fn reauthenticate(
        &self,
        password: &SecretString,
    ) -> Result<AccountCredentials, CoreError> {
        let username = self.inner.config.credentials.username.clone();
        let login = self.inner.client.login(&username, password).await?;
        info!(user_id = login.user_id, "re-authenticated");

        let credentials = self
            .inner
            .client
            .credentials()
            .ok_or_else(|| CoreError::Internal("session missing after login".into()))?;

        // A successful refresh clears `ReauthRequired`, resuming the timer.
        // Any other failure is left to the next scheduled poll.
        if let Err(e) = self.inner.coordinator.refresh().await {
            if e.requires_reauth() {
                return Err(e);
            }
            warn!(error = %e, "refresh after re-authentication failed");
        }

        Ok(AccountCredentials {
            user_id: login.user_id,
            credentials,
        })
    }

    // ── Data access ──────────────────────────────────────────────

    /// The cached snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.coordinator.snapshot()
    }

    /// Every reading against the cached snapshot. Empty before the first
    /// successful refresh.
    pub fn readings(&self) -> Vec<Reading> {
        self.snapshot()
            .map(|snap| readings::readings(&snap))
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> SnapshotStream {
        self.inner.coordinator.subscribe()
    }

    pub fn state(&self) -> RefreshState {
        self.inner.coordinator.state()
    }

    pub fn watch_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.coordinator.watch_state()
    }

    /// Refresh now, joining any refresh already in flight.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.inner.coordinator.refresh().await
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Change the pit set-point, in °F.
    pub async fn set_target_temperature(&self, temp_f: i32) -> Result<(), CoreError> {
        self.inner.client.set_target_temperature(temp_f).await?;
        info!(temp_f, "pit set-point updated");
        Ok(())
    }
}
