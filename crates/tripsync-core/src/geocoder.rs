//! Reverse geocoding adapter.
//!
//! Annotation only: a lookup that fails degrades to a placeholder string
//! and never fails the caller.

use reqwest::Client;
use tracing::warn;

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;

pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// HTTP client for the reverse geocoding service.
pub struct Geocoder {
    client: Client,
    endpoint_url: String,
    api_key: String,
}

impl Geocoder {
    pub fn new(client: Client, config: &GeocoderConfig) -> Self {
        Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Resolve a coordinate pair to a printable address.
    pub async fn reverse(&self, lat: f64, lon: f64) -> String {
        match self.try_reverse(lat, lon).await {
            Ok(address) => address,
            Err(e) => {
                warn!(lat, lon, error = %e, "reverse geocode failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    async fn try_reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        let lat_field = lat.to_string();
        let lon_field = lon.to_string();
        let resp = self
            .client
            .get(&self.endpoint_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("lat", lat_field.as_str()),
                ("lon", lon_field.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        Ok(format_address(&body["address"]))
    }
}

/// Assemble a printable address from whatever components came back,
/// skipping the missing ones.
fn format_address(components: &serde_json::Value) -> String {
    let get = |key: &str| components[key].as_str().unwrap_or("").trim();

    let street = format!("{} {}", get("house_number"), get("road"));
    let street = street.trim();

    let parts: Vec<&str> = [street, get("city"), get("state")]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        UNKNOWN_LOCATION.to_string()
    } else {
        parts.join(", ")
    }
}
