//! # Tripsync Core Library
//!
//! Core logic for tripsync, a supervised batch job that mirrors vehicle
//! trip mileage from a telematics provider ("Trip Source") into a
//! maintenance-tracking service ("Maintenance Log").
//!
//! ## Architecture
//!
//! - **Auth**: one-time-authorization OAuth flow; the authorization code is
//!   persisted, the bearer token is re-derived every run
//! - **Clients**: thin HTTP clients for the Trip Source, the Maintenance
//!   Log, and the reverse geocoder
//! - **Sync**: vehicle matching by VIN tag, per-vehicle odometer watermark,
//!   trip normalization, CSV ledger, and the sequential engine
//!
//! ## Key Components
//!
//! - [`AuthFlow`]: authorization-code lifecycle and token exchange
//! - [`SyncEngine`]: the per-vehicle fetch → match → filter → submit loop
//! - [`Config`]: TOML job configuration, passed into every constructor

pub mod auth;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod maintenance_log;
pub mod sync;
pub mod trip_source;

pub use auth::{AuthFlow, AuthSession};
pub use config::Config;
pub use error::{AuthError, ConfigError, CoreError, FetchError, GeocodeError, SubmitError};
pub use sync::{SyncEngine, SyncReport};
