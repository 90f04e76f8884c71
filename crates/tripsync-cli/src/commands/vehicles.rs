//! Vehicle inspection across both systems.

use std::path::Path;

use clap::Subcommand;
use tripsync_core::auth::AuthFlow;
use tripsync_core::maintenance_log::MaintenanceLogClient;
use tripsync_core::sync::match_vehicle;
use tripsync_core::trip_source::TripSourceClient;

#[derive(Subcommand)]
pub enum VehiclesAction {
    /// List Trip Source vehicles with their Maintenance Log match status
    List,
}

pub async fn run(
    config_path: &Path,
    action: VehiclesAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::common::load_config(config_path)?;
    let _guard = super::common::init_logging(&config.logging)?;

    match action {
        VehiclesAction::List => {
            let client = reqwest::Client::new();
            let flow = AuthFlow::new(config.trip_source.clone(), config.listener.clone());
            let session = flow.obtain_session(&client).await?;

            let trip_source = TripSourceClient::new(client.clone(), &config.trip_source, &session);
            let maintenance_log = MaintenanceLogClient::new(client, &config.maintenance_log);

            let vehicles = trip_source.fetch_vehicles().await?;
            let log_vehicles = maintenance_log.fetch_vehicles().await?;

            for vehicle in &vehicles {
                match match_vehicle(&vehicle.vin, &log_vehicles) {
                    Some(id) => println!(
                        "{} (imei {}) -> maintenance log vehicle {id}",
                        vehicle.vin, vehicle.imei
                    ),
                    None => println!("{} (imei {}) -> untracked", vehicle.vin, vehicle.imei),
                }
            }
        }
    }
    Ok(())
}
