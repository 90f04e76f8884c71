//! Trip-to-odometer-event conversion.
//!
//! A trip becomes an odometer event candidate only when its end reading
//! beats the vehicle's watermark. Qualification compares integer-truncated
//! values on both sides so sub-mile floating noise cannot reject a
//! genuinely new reading.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::geocoder::Geocoder;
use crate::trip_source::Trip;

pub const NO_DESCRIPTION: &str = "Insufficient data for trip description.";

/// An odometer entry candidate derived from a qualifying trip.
#[derive(Debug, Clone, PartialEq)]
pub struct OdometerEvent {
    /// Trip end time in the configured local timezone.
    pub occurred_at: DateTime<Tz>,
    pub odometer: f64,
    /// Route description and distance; raw newlines, escaped only for the
    /// CSV ledger.
    pub notes: String,
}

impl OdometerEvent {
    /// Date-only rendering; the Maintenance Log discards time-of-day.
    pub fn log_date(&self) -> String {
        self.occurred_at.format("%m/%d/%Y").to_string()
    }

    /// Whole-unit mileage for submission.
    pub fn log_odometer(&self) -> i64 {
        self.odometer.trunc() as i64
    }

    /// Notes with newlines escaped to keep the CSV ledger one row per
    /// record.
    pub fn csv_notes(&self) -> String {
        self.notes.replace('\n', "\\n")
    }
}

/// Whether a trip carries mileage the Maintenance Log has not seen.
pub fn qualifies(end_odometer: f64, watermark: f64) -> bool {
    (end_odometer.trunc() as i64) > (watermark.trunc() as i64)
}

/// Converts raw trips into odometer event candidates.
pub struct TripNormalizer<'a> {
    geocoder: &'a Geocoder,
    timezone: Tz,
}

impl<'a> TripNormalizer<'a> {
    pub fn new(geocoder: &'a Geocoder, timezone: Tz) -> Self {
        Self { geocoder, timezone }
    }

    /// Convert one trip into an event candidate, or `None` when the trip
    /// does not beat the watermark.
    pub async fn normalize(&self, trip: &Trip, watermark: f64) -> Option<OdometerEvent> {
        if !qualifies(trip.end_odometer, watermark) {
            return None;
        }

        let occurred_at = trip.end_time.with_timezone(&self.timezone);
        let route = self.describe_route(trip).await;
        let notes = format!("{route}\nDistance: {} miles", trip.distance);

        Some(OdometerEvent {
            occurred_at,
            odometer: trip.end_odometer,
            notes,
        })
    }

    /// Human-readable route from the path endpoints, two geocoder lookups
    /// per trip. Paths without two decoded positions get a placeholder.
    async fn describe_route(&self, trip: &Trip) -> String {
        let Some((start, end)) = trip.gps.as_ref().and_then(|gps| gps.endpoints()) else {
            return NO_DESCRIPTION.to_string();
        };

        let start_address = self.geocoder.reverse(start.0, start.1).await;
        let end_address = self.geocoder.reverse(end.0, end.1).await;
        format!("Start: {start_address}\nEnd: {end_address}")
    }
}
