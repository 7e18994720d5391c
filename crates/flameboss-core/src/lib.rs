// flameboss-core: polling and caching layer between flameboss-api and
// consumers (CLI, dashboards).

pub mod config;
pub mod controller;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod readings;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ControllerConfig;
pub use controller::{AccountCredentials, Controller, onboard};
pub use convert::normalize;
pub use coordinator::{Coordinator, CoordinatorConfig, RefreshState};
pub use error::CoreError;
pub use model::Snapshot;
pub use readings::{READINGS, Reading, ReadingDescriptor, ReadingKey, ReadingValue};
pub use stream::{SnapshotStream, SnapshotWatchStream};

// Re-exported so consumers need not depend on flameboss-api directly.
pub use flameboss_api::{Credentials, DEFAULT_BASE_URL, TransportConfig};
