// ── Polling coordinator ──
//
// Owns the cached snapshot and the refresh schedule. Refreshes are
// single-flight: callers arriving while a fetch is running join it through a
// shared future instead of issuing their own request. A failed refresh never
// touches the cache; subscribers only hear about successes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use flameboss_api::FlameBossClient;

use crate::convert::normalize;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::stream::SnapshotStream;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timer and timeout settings for a [`Coordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Time between scheduled refreshes.
    pub poll_interval: Duration,
    /// Upper bound on one whole refresh (cook list plus cook detail).
    pub refresh_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            refresh_timeout: DEFAULT_REFRESH_TIMEOUT,
        }
    }
}

// ── RefreshState ─────────────────────────────────────────────────

/// Refresh health observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshState {
    /// Last refresh succeeded (or none has run yet).
    Idle,
    Refreshing,
    /// Last refresh failed; the cached snapshot is older than one interval.
    Stale { reason: String },
    /// The token was rejected. Scheduled polling is paused until a refresh
    /// with new credentials succeeds.
    ReauthRequired { reason: String },
}

impl RefreshState {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. } | Self::ReauthRequired { .. })
    }
}

// ── Coordinator ──────────────────────────────────────────────────

type RefreshFuture = Shared<BoxFuture<'static, Result<Arc<Snapshot>, CoreError>>>;

/// Periodic fetcher and cache for one controller's snapshot.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    client: Arc<FlameBossClient>,
    config: CoordinatorConfig,
    snapshot: watch::Sender<Option<Arc<Snapshot>>>,
    state: watch::Sender<RefreshState>,
    last_success: watch::Sender<Option<DateTime<Utc>>>,
    /// The refresh currently running, if any. The only lock on the hot path.
    in_flight: Mutex<Option<RefreshFuture>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    /// Create a coordinator with an empty cache. Nothing is fetched until
    /// [`first_refresh()`](Self::first_refresh) or [`refresh()`](Self::refresh).
    pub fn new(client: Arc<FlameBossClient>, config: CoordinatorConfig) -> Self {
        let (snapshot, _) = watch::channel(None);
        let (state, _) = watch::channel(RefreshState::Idle);
        let (last_success, _) = watch::channel(None);

        Self {
            inner: Arc::new(CoordinatorInner {
                client,
                config,
                snapshot,
                state,
                last_success,
                in_flight: Mutex::new(None),
                cancel: CancellationToken::new(),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<FlameBossClient> {
        &self.inner.client
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch and normalize the current cook, replacing the cache on success.
    ///
    /// Joins the in-flight refresh if there is one. On failure the cached
    /// snapshot is kept and the cause comes back wrapped in
    /// [`CoreError::UpdateFailed`].
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }

        let refresh = {
            let mut slot = self.inner.in_flight.lock().await;
            if let Some(running) = slot.as_ref() {
                debug!("joining in-flight refresh");
                running.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let refresh = inner.run_refresh().boxed().shared();
                *slot = Some(refresh.clone());
                refresh
            }
        };

        refresh.await
    }

    /// The initial refresh. Any failure is a setup failure: there is no
    /// previous snapshot to fall back on.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.refresh().await.map_err(|e| CoreError::SetupFailed {
            source: Box::new(e.root_cause().clone()),
        })
    }

    // ── Timer ────────────────────────────────────────────────────

    /// Spawn the scheduled refresh loop.
    ///
    /// Requires a cached snapshot. Calling it while the loop is running is a
    /// no-op.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::ShutDown);
        }
        if self.snapshot().is_none() {
            return Err(CoreError::Internal(
                "polling started before the first refresh".into(),
            ));
        }

        let mut task = self.inner.task.lock().await;
        if task.as_ref().is_some_and(|h| !h.is_finished()) {
            return Ok(());
        }

        info!(
            interval_secs = self.inner.config.poll_interval.as_secs(),
            "starting scheduled refresh"
        );
        *task = Some(tokio::spawn(poll_loop(self.clone())));
        Ok(())
    }

    /// Stop the refresh loop and wait for it to exit. Permanent: later
    /// calls to `refresh()` or `start()` return [`CoreError::ShutDown`].
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handle = self.inner.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "refresh task ended abnormally");
            }
        }
        debug!("coordinator shut down");
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .task
            .try_lock()
            .is_ok_and(|t| t.as_ref().is_some_and(|h| !h.is_finished()))
    }

    // ── Observers ────────────────────────────────────────────────

    /// The cached snapshot, if any refresh has ever succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.borrow().clone()
    }

    pub fn state(&self) -> RefreshState {
        self.inner.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<RefreshState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    /// When the cache was last replaced.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_success.borrow()
    }

    /// How long ago the cache was last replaced.
    pub fn data_age(&self) -> Option<Duration> {
        let last = self.last_success()?;
        (Utc::now() - last).to_std().ok()
    }
}

impl CoordinatorInner {
    async fn run_refresh(self: Arc<Self>) -> Result<Arc<Snapshot>, CoreError> {
        self.state.send_replace(RefreshState::Refreshing);

        let limit = self.config.refresh_timeout;
        let outcome = match tokio::time::timeout(limit, self.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout {
                timeout_secs: limit.as_secs(),
            }),
        };

        let result = match outcome {
            Ok(snapshot) => {
                self.publish(Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                self.record_failure(&e);
                Err(CoreError::UpdateFailed {
                    source: Box::new(e),
                })
            }
        };

        // Cleared after publishing so late joiners still see this outcome.
        *self.in_flight.lock().await = None;
        result
    }

    async fn fetch(&self) -> Result<Arc<Snapshot>, CoreError> {
        let detail = self.client.fetch_cook_snapshot().await?;
        Ok(Arc::new(normalize(&detail)))
    }

    fn publish(&self, snapshot: Arc<Snapshot>) {
        debug!(
            title = %snapshot.title,
            online = snapshot.online,
            pit_temp = ?snapshot.pit_temp,
            "snapshot refreshed"
        );
        self.snapshot.send_replace(Some(snapshot));
        self.last_success.send_replace(Some(Utc::now()));
        self.state.send_replace(RefreshState::Idle);
    }

    fn record_failure(&self, e: &CoreError) {
        let reason = e.to_string();
        if e.requires_reauth() {
            error!(error = %e, "credentials rejected; re-authentication required");
            self.state.send_replace(RefreshState::ReauthRequired { reason });
        } else {
            warn!(error = %e, "refresh failed; serving cached snapshot");
            self.state.send_replace(RefreshState::Stale { reason });
        }
    }
}

async fn poll_loop(coordinator: Coordinator) {
    let cancel = coordinator.inner.cancel.clone();
    let mut ticker = tokio::time::interval(coordinator.inner.config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; the cache is already warm.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // Paused while the token is rejected; a manual refresh that
                // succeeds with new credentials resumes the schedule.
                if matches!(coordinator.state(), RefreshState::ReauthRequired { .. }) {
                    debug!("skipping scheduled refresh until re-authentication");
                } else if let Err(e) = coordinator.refresh().await {
                    debug!(error = %e, "scheduled refresh failed");
                }
            }
        }
    }
    debug!("refresh loop exited");
}
