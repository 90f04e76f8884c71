//! TOML-based job configuration.
//!
//! Everything the run needs comes from one file handed to the CLI via
//! `--config`: credentials and endpoints for both services, the geocoder
//! key, the redirect listener address, output directory, timezone, and
//! logging. No ambient globals; the loaded struct is passed into each
//! component's constructor.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Trip Source API credentials and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSourceConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered with the provider and the
    /// local listener address.
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub endpoint_url: String,
    /// Where the captured authorization code is persisted. Written once, at
    /// first interactive grant.
    #[serde(default = "default_auth_code_file")]
    pub auth_code_file: PathBuf,
}

/// Maintenance Log API location. The service is reachable without
/// authentication on the configured address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceLogConfig {
    pub base_url: String,
}

/// Reverse geocoding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint_url: String,
    pub api_key: String,
}

/// Local listener for the one-shot authorization redirect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default = "default_listener_host")]
    pub host: String,
    #[serde(default = "default_listener_port")]
    pub port: u16,
}

/// GPS payload format requested from the trips endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GpsFormat {
    #[default]
    Geojson,
    Polyline,
}

impl GpsFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpsFormat::Geojson => "geojson",
            GpsFormat::Polyline => "polyline",
        }
    }
}

/// What to do with a Trip Source vehicle that has no Maintenance Log
/// counterpart.
///
/// `Skip` leaves the vehicle alone. `ZeroWatermark` processes its whole trip
/// history against a zero watermark; with no remote vehicle id the resulting
/// events land in the CSV ledger only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UntrackedVehiclePolicy {
    #[default]
    Skip,
    ZeroWatermark,
}

/// Sync run behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory for the per-vehicle CSV ledgers.
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// IANA timezone name used to localize trip end times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub gps_format: GpsFormat,
    #[serde(default)]
    pub untracked_vehicle_policy: UntrackedVehiclePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            timezone: default_timezone(),
            gps_format: GpsFormat::default(),
            untracked_vehicle_policy: UntrackedVehiclePolicy::default(),
        }
    }
}

impl SyncConfig {
    /// Parse the configured timezone name.
    pub fn timezone(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "sync.timezone".to_string(),
                message: format!("unknown timezone '{}'", self.timezone),
            })
    }
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

/// Job configuration, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub trip_source: TripSourceConfig,
    pub maintenance_log: MaintenanceLogConfig,
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_auth_code_file() -> PathBuf {
    PathBuf::from("./auth_code.txt")
}
fn default_listener_host() -> String {
    "127.0.0.1".to_string()
}
fn default_listener_port() -> u16 {
    8080
}
fn default_target_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_timezone() -> String {
    "UTC".to_string()
}
fn default_log_file() -> PathBuf {
    PathBuf::from("./tripsync.log")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: default_listener_host(),
            port: default_listener_port(),
        }
    }
}

impl Config {
    /// Load and validate the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse as TOML,
    /// or carries values that fail validation (e.g. an unknown timezone).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.sync.timezone()?;
        Ok(())
    }
}
