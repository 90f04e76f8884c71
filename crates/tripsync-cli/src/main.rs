use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tripsync-cli",
    version,
    about = "Mirror trip mileage from a telematics provider into a maintenance log"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = "./config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorization code management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Run the odometer synchronization
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Inspect vehicles across both systems
    Vehicles {
        #[command(subcommand)]
        action: commands::vehicles::VehiclesAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(&cli.config, action).await,
        Commands::Sync { action } => commands::sync::run(&cli.config, action).await,
        Commands::Vehicles { action } => commands::vehicles::run(&cli.config, action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
