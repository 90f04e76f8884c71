//! Maintenance Log API client.
//!
//! Read side: the vehicle list (with VIN tags) and per-vehicle odometer
//! records. Write side: new odometer records, form-encoded, whole-unit
//! mileage only.

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::MaintenanceLogConfig;
use crate::error::{FetchError, SubmitError};

/// A vehicle tracked by the Maintenance Log.
#[derive(Debug, Clone, Deserialize)]
pub struct LogVehicle {
    pub id: i64,
    /// Free-form tags; a tracked vehicle carries its VIN here.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A stored odometer reading.
///
/// The service renders `odometer` as a JSON number or a numeric string
/// depending on how the record was entered; both decode, anything else is a
/// typed decode failure rather than a silent zero.
#[derive(Debug, Clone, Deserialize)]
pub struct OdometerRecord {
    #[serde(deserialize_with = "de_odometer")]
    pub odometer: f64,
}

fn de_odometer<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("odometer value '{s}' is not numeric"))),
    }
}

/// HTTP client for the Maintenance Log API.
pub struct MaintenanceLogClient {
    client: Client,
    base_url: String,
}

impl MaintenanceLogClient {
    pub fn new(client: Client, config: &MaintenanceLogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// Fetch the tracked vehicle list. Failure here aborts the run.
    pub async fn fetch_vehicles(&self) -> Result<Vec<LogVehicle>, FetchError> {
        let endpoint = format!("{}/api/vehicles", self.base_url);
        let resp = self.client.get(&endpoint).send().await?;

        let status = resp.status();
        if !status.is_success() {
            error!(%endpoint, status = status.as_u16(), "failed to fetch maintenance log vehicles");
            return Err(FetchError::LogVehicles {
                endpoint,
                status: status.as_u16(),
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch every odometer record for one vehicle.
    ///
    /// Decodes through [`OdometerRecord`]'s strict coercion; a malformed
    /// record is a [`FetchError::Decode`], which the engine treats like any
    /// other per-vehicle fetch failure.
    pub async fn fetch_odometer_records(
        &self,
        vehicle_id: i64,
    ) -> Result<Vec<OdometerRecord>, FetchError> {
        let endpoint = format!("{}/api/vehicle/odometerrecords", self.base_url);
        info!(vehicle_id, %endpoint, "fetching odometer records");

        let resp = self
            .client
            .get(&endpoint)
            .query(&[("vehicleId", vehicle_id.to_string())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            error!(vehicle_id, status = status.as_u16(), "failed to fetch odometer records");
            return Err(FetchError::OdometerRecords {
                vehicle_id,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            resource: "odometer records",
            message: e.to_string(),
        })
    }

    /// Submit one odometer record.
    ///
    /// Form-encoded; the date is day-resolution and the odometer value is
    /// whole-unit mileage. A non-success response is an error for the
    /// caller to log; there is no retry here.
    pub async fn add_odometer_record(
        &self,
        vehicle_id: i64,
        date: &str,
        odometer: i64,
        notes: &str,
    ) -> Result<(), SubmitError> {
        let endpoint = format!(
            "{}/api/vehicle/odometerrecords/add?vehicleId={}",
            self.base_url, vehicle_id
        );
        let odometer_field = odometer.to_string();
        let params = [
            ("date", date),
            ("odometer", odometer_field.as_str()),
            ("notes", notes),
        ];

        let resp = self.client.post(&endpoint).form(&params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            error!(vehicle_id, status = status.as_u16(), "failed to submit odometer record");
            return Err(SubmitError::OdometerRecord {
                vehicle_id,
                status: status.as_u16(),
            });
        }

        info!(vehicle_id, odometer, date, "odometer record submitted");
        Ok(())
    }
}
