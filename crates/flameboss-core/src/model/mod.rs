// ── Domain model ──
//
// Normalized, display-ready types handed to consumers.

pub mod snapshot;

pub use snapshot::Snapshot;
