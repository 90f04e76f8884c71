//! Trip Source API client.
//!
//! The telematics provider exposes vehicle and trip history behind bearer
//! auth. Trips come back for whatever default window the provider applies;
//! no date filtering happens on this side.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::auth::AuthSession;
use crate::config::{GpsFormat, TripSourceConfig};
use crate::error::FetchError;

/// A vehicle known to the Trip Source.
#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    /// Device identifier, the key for the trips endpoint.
    pub imei: String,
    /// Vehicle identification number, the cross-system join key.
    pub vin: String,
}

/// One recorded trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub end_time: DateTime<Utc>,
    pub end_odometer: f64,
    /// Distance traveled, in miles.
    pub distance: f64,
    #[serde(default)]
    pub gps: Option<TripGps>,
}

/// GPS payload of a trip: a GeoJSON line string or an encoded polyline,
/// depending on the `gps-format` the trips endpoint was asked for.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TripGps {
    GeoJson(LineString),
    Polyline(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineString {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

impl TripGps {
    /// Start and end of the path as (lat, lon) pairs.
    ///
    /// GeoJSON stores positions as [lon, lat]. Polylines stay undecoded and
    /// yield no endpoints, as does a path with fewer than two positions.
    pub fn endpoints(&self) -> Option<((f64, f64), (f64, f64))> {
        match self {
            TripGps::GeoJson(line) if line.coordinates.len() >= 2 => {
                let start = line.coordinates[0];
                let end = line.coordinates[line.coordinates.len() - 1];
                Some(((start[1], start[0]), (end[1], end[0])))
            }
            _ => None,
        }
    }
}

/// HTTP client for the Trip Source API.
pub struct TripSourceClient {
    client: Client,
    endpoint_url: String,
    access_token: String,
}

impl TripSourceClient {
    pub fn new(client: Client, config: &TripSourceConfig, session: &AuthSession) -> Self {
        Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            access_token: session.access_token.clone(),
        }
    }

    /// Fetch the vehicle list. Failure here aborts the run.
    pub async fn fetch_vehicles(&self) -> Result<Vec<Vehicle>, FetchError> {
        let endpoint = format!("{}/vehicles", self.endpoint_url);
        let resp = self
            .client
            .get(&endpoint)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            error!(%endpoint, status = status.as_u16(), "failed to fetch vehicles");
            return Err(FetchError::Vehicles {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch all trips for one device over the provider's default window.
    pub async fn fetch_trips(
        &self,
        imei: &str,
        vin: &str,
        gps_format: GpsFormat,
    ) -> Result<Vec<Trip>, FetchError> {
        let endpoint = format!("{}/trips", self.endpoint_url);
        debug!(%endpoint, imei, gps_format = gps_format.as_str(), "fetching trips");

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("imei", imei), ("gps-format", gps_format.as_str())])
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            error!(
                %endpoint,
                vin,
                status = status.as_u16(),
                "failed to fetch trips"
            );
            return Err(FetchError::Trips {
                vin: vin.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(resp.json().await?)
    }
}
