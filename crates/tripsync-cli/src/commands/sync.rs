//! Sync subcommand: the batch reconciliation run.

use std::path::Path;

use clap::Subcommand;
use tripsync_core::auth::AuthFlow;
use tripsync_core::SyncEngine;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Synchronize every vehicle's trips into the maintenance log
    Run {
        /// Walk the pipeline without writing ledgers or submitting records
        #[arg(long)]
        dry_run: bool,
    },
}

pub async fn run(config_path: &Path, action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::common::load_config(config_path)?;
    let _guard = super::common::init_logging(&config.logging)?;

    match action {
        SyncAction::Run { dry_run } => {
            let client = reqwest::Client::new();
            let flow = AuthFlow::new(config.trip_source.clone(), config.listener.clone());
            let session = flow.obtain_session(&client).await?;

            let engine = SyncEngine::from_config(&config, client, &session)?.dry_run(dry_run);
            let report = engine.run().await?;

            println!(
                "Vehicles: {} seen, {} matched, {} untracked, {} skipped on error",
                report.vehicles_seen,
                report.vehicles_matched,
                report.vehicles_skipped_untracked,
                report.vehicles_skipped_error,
            );
            if dry_run {
                println!(
                    "Dry run: {} odometer events would be recorded",
                    report.events_written
                );
            } else {
                println!(
                    "Events: {} ledger rows, {} submitted, {} submit failures",
                    report.events_written, report.events_submitted, report.submit_failures,
                );
            }
        }
    }
    Ok(())
}
