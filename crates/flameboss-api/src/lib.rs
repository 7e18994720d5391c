//! Async Rust client for the Flame Boss cloud cook API.
//!
//! [`FlameBossClient`] covers the four calls a dashboard needs: username /
//! password [`login`](FlameBossClient::login), device discovery, fetching
//! the current cook, and writing the pit set-point. Raw wire types live in
//! [`models`]; conversions from the controller's integer encodings live in
//! [`units`].

pub mod auth;
pub mod client;
mod cooks;
mod devices;
pub mod error;
pub mod models;
mod sessions;
pub mod transport;
pub mod units;

pub use auth::{Credentials, Session};
pub use client::{DEFAULT_BASE_URL, FlameBossClient};
pub use error::Error;
pub use models::{CookDetail, CookSample, LoginResponse};
pub use transport::TransportConfig;
