//! Per-vehicle dedup watermark.

use tracing::info;

use crate::error::FetchError;
use crate::maintenance_log::{MaintenanceLogClient, OdometerRecord};

/// Highest odometer reading across a record set, 0.0 when empty.
pub fn max_odometer(records: &[OdometerRecord]) -> f64 {
    records.iter().map(|r| r.odometer).fold(0.0, f64::max)
}

/// Re-query the Maintenance Log and compute the watermark for one vehicle.
///
/// Always hits the service: log state may be mutated between vehicles or by
/// a parallel run, and filtering against anything stale can push a reading
/// backwards. An unreadable record set is an error, not a zero watermark;
/// zero against an unreadable log would resubmit the vehicle's history.
pub async fn resolve(
    client: &MaintenanceLogClient,
    vehicle_id: i64,
) -> Result<f64, FetchError> {
    let records = client.fetch_odometer_records(vehicle_id).await?;
    let watermark = max_odometer(&records);
    info!(vehicle_id, watermark, "resolved odometer watermark");
    Ok(watermark)
}
