//! The sync run: fetch, match, filter by watermark, normalize, submit.

use std::path::PathBuf;

use chrono_tz::Tz;
use reqwest::Client;
use tracing::{error, info, warn};

use crate::auth::AuthSession;
use crate::config::{Config, GpsFormat, UntrackedVehiclePolicy};
use crate::error::{CoreError, FetchError};
use crate::geocoder::Geocoder;
use crate::maintenance_log::{LogVehicle, MaintenanceLogClient};
use crate::sync::ledger::VehicleLedger;
use crate::sync::matcher::match_vehicle;
use crate::sync::normalizer::TripNormalizer;
use crate::sync::watermark;
use crate::trip_source::{TripSourceClient, Vehicle};

/// Totals for one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub vehicles_seen: usize,
    pub vehicles_matched: usize,
    pub vehicles_skipped_untracked: usize,
    pub vehicles_skipped_error: usize,
    /// Ledger rows written; in a dry run, rows that would have been written.
    pub events_written: usize,
    pub events_submitted: usize,
    pub submit_failures: usize,
}

/// Orchestrates one batch reconciliation run. Strictly sequential: each
/// vehicle is processed to completion before the next begins.
pub struct SyncEngine {
    trip_source: TripSourceClient,
    maintenance_log: MaintenanceLogClient,
    geocoder: Geocoder,
    timezone: Tz,
    target_dir: PathBuf,
    gps_format: GpsFormat,
    untracked_policy: UntrackedVehiclePolicy,
    dry_run: bool,
}

impl SyncEngine {
    /// Build the engine and its clients from configuration and a bearer
    /// session.
    pub fn from_config(
        config: &Config,
        client: Client,
        session: &AuthSession,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            trip_source: TripSourceClient::new(client.clone(), &config.trip_source, session),
            maintenance_log: MaintenanceLogClient::new(client.clone(), &config.maintenance_log),
            geocoder: Geocoder::new(client, &config.geocoder),
            timezone: config.sync.timezone()?,
            target_dir: config.sync.target_dir.clone(),
            gps_format: config.sync.gps_format,
            untracked_policy: config.sync.untracked_vehicle_policy,
            dry_run: false,
        })
    }

    /// Walk the full pipeline without writing the ledger or submitting
    /// records.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the reconciliation across all vehicles.
    ///
    /// # Errors
    ///
    /// Aborts only when a vehicle list cannot be fetched from either system
    /// or when both lists come back and one is empty. Per-vehicle failures
    /// are logged and skipped.
    pub async fn run(&self) -> Result<SyncReport, CoreError> {
        let vehicles = self.trip_source.fetch_vehicles().await?;
        let log_vehicles = self.maintenance_log.fetch_vehicles().await?;

        if vehicles.is_empty() || log_vehicles.is_empty() {
            return Err(FetchError::NoVehicles.into());
        }

        let normalizer = TripNormalizer::new(&self.geocoder, self.timezone);
        let mut report = SyncReport {
            vehicles_seen: vehicles.len(),
            ..SyncReport::default()
        };

        for vehicle in &vehicles {
            if let Err(e) = self
                .sync_vehicle(vehicle, &log_vehicles, &normalizer, &mut report)
                .await
            {
                error!(
                    vin = %vehicle.vin,
                    error = %e,
                    "vehicle sync failed, continuing with next vehicle"
                );
                report.vehicles_skipped_error += 1;
            }
        }

        info!(
            vehicles = report.vehicles_seen,
            matched = report.vehicles_matched,
            events_written = report.events_written,
            events_submitted = report.events_submitted,
            submit_failures = report.submit_failures,
            dry_run = self.dry_run,
            "sync run complete"
        );
        Ok(report)
    }

    async fn sync_vehicle(
        &self,
        vehicle: &Vehicle,
        log_vehicles: &[LogVehicle],
        normalizer: &TripNormalizer<'_>,
        report: &mut SyncReport,
    ) -> Result<(), CoreError> {
        let link = match_vehicle(&vehicle.vin, log_vehicles);

        // The watermark comes from the freshest log state, re-queried per
        // vehicle; nothing is cached across vehicles or runs.
        let watermark = match link {
            Some(log_vehicle_id) => {
                report.vehicles_matched += 1;
                watermark::resolve(&self.maintenance_log, log_vehicle_id).await?
            }
            None => match self.untracked_policy {
                UntrackedVehiclePolicy::Skip => {
                    info!(vin = %vehicle.vin, "no maintenance log vehicle matches, skipping");
                    report.vehicles_skipped_untracked += 1;
                    return Ok(());
                }
                UntrackedVehiclePolicy::ZeroWatermark => {
                    warn!(
                        vin = %vehicle.vin,
                        "no maintenance log vehicle matches, writing entire trip history to the ledger"
                    );
                    0.0
                }
            },
        };

        let trips = self
            .trip_source
            .fetch_trips(&vehicle.imei, &vehicle.vin, self.gps_format)
            .await?;

        let mut ledger = if self.dry_run {
            None
        } else {
            Some(VehicleLedger::create(&self.target_dir, &vehicle.vin)?)
        };

        for trip in &trips {
            let Some(event) = normalizer.normalize(trip, watermark).await else {
                continue;
            };

            if self.dry_run {
                info!(
                    vin = %vehicle.vin,
                    date = %event.log_date(),
                    odometer = event.log_odometer(),
                    "dry run: would record odometer event"
                );
                report.events_written += 1;
                continue;
            }

            // Remote write first, then the ledger row. The two sinks are not
            // transactionally linked: a remote failure leaves the local row
            // in place and nothing is retried.
            if let Some(log_vehicle_id) = link {
                match self
                    .maintenance_log
                    .add_odometer_record(
                        log_vehicle_id,
                        &event.log_date(),
                        event.log_odometer(),
                        &event.notes,
                    )
                    .await
                {
                    Ok(()) => report.events_submitted += 1,
                    Err(e) => {
                        error!(
                            vin = %vehicle.vin,
                            error = %e,
                            "odometer submission failed, keeping ledger row"
                        );
                        report.submit_failures += 1;
                    }
                }
            }

            if let Some(ledger) = ledger.as_mut() {
                ledger.append(&event)?;
                report.events_written += 1;
            }
        }

        info!(vin = %vehicle.vin, trips = trips.len(), "vehicle processed");
        Ok(())
    }
}
