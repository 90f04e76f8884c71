//! Per-vehicle CSV trip ledger.
//!
//! One file per vehicle, named by VIN, one row per odometer event. The
//! ledger is the local record of what the run produced; it is written even
//! when the remote submission for the same event fails.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::sync::normalizer::OdometerEvent;

pub struct VehicleLedger {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl VehicleLedger {
    /// Create (or truncate) the ledger for a vehicle and write the header.
    pub fn create(target_dir: &Path, vin: &str) -> Result<Self, CoreError> {
        std::fs::create_dir_all(target_dir)?;
        let path = target_dir.join(format!("{vin}_trips.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Date", "Odometer", "Notes"])?;
        writer.flush()?;
        Ok(Self { writer, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event row, flushed immediately. Notes stay on one row via
    /// newline escaping.
    pub fn append(&mut self, event: &OdometerEvent) -> Result<(), CoreError> {
        self.writer.write_record([
            event.occurred_at.to_string(),
            event.odometer.to_string(),
            event.csv_notes(),
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
