//! Error types for tripsync-core.
//!
//! Failures are recovered at the narrowest scope that keeps the run moving:
//! authentication and vehicle-list fetches abort the whole run, per-vehicle
//! fetches skip only that vehicle, record submission is logged and dropped,
//! and geocoding is absorbed entirely inside the adapter.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tripsync-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authorization / token exchange errors (fatal for the run)
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Resource fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Odometer record submission errors
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ledger write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Transport errors outside the typed fetch/submit paths
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authorization-code and token-exchange errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The interactive capture did not yield a usable code
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token endpoint answered with a non-success status
    #[error("Token exchange failed: HTTP {status}")]
    TokenExchangeFailed { status: u16 },

    /// The redirect request carried no `code` query parameter
    #[error("Invalid authorization callback: {0}")]
    InvalidCallback(String),

    /// Token endpoint answered success but without an access token
    #[error("Token response missing access_token")]
    MissingAccessToken,

    /// Listener or code-file IO failed
    #[error("IO error during authorization: {0}")]
    Io(#[from] std::io::Error),

    /// Token exchange transport failure
    #[error("HTTP error during token exchange: {0}")]
    Http(#[from] reqwest::Error),
}

/// Per-resource fetch errors.
///
/// `Vehicles` and `LogVehicles` abort the run; `Trips`, `OdometerRecords`
/// and `Decode` skip the affected vehicle only.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch vehicles from {endpoint}: HTTP {status}")]
    Vehicles { endpoint: String, status: u16 },

    #[error("Failed to fetch maintenance log vehicles from {endpoint}: HTTP {status}")]
    LogVehicles { endpoint: String, status: u16 },

    #[error("Failed to fetch trips for vehicle {vin}: HTTP {status}")]
    Trips { vin: String, status: u16 },

    #[error("Failed to fetch odometer records for vehicle {vehicle_id}: HTTP {status}")]
    OdometerRecords { vehicle_id: i64, status: u16 },

    /// Response body did not decode into the expected shape
    #[error("Failed to decode {resource}: {message}")]
    Decode {
        resource: &'static str,
        message: String,
    },

    #[error("No vehicles available from either system")]
    NoVehicles,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Odometer record submission errors. Non-fatal: the ledger row stands and
/// there is no retry.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Failed to submit odometer record for vehicle {vehicle_id}: HTTP {status}")]
    OdometerRecord { vehicle_id: i64, status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Reverse-geocoding errors. Never escape the adapter; callers always get a
/// placeholder string instead.
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Geocoder returned HTTP {status}")]
    Status { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
