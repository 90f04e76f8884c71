use std::path::Path;

use clap::Subcommand;
use tripsync_core::auth::AuthFlow;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Capture an authorization code interactively and verify the token
    /// exchange
    Login,
    /// Check whether an authorization code is stored
    Status,
    /// Remove the stored authorization code
    Logout,
}

pub async fn run(config_path: &Path, action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::common::load_config(config_path)?;
    let _guard = super::common::init_logging(&config.logging)?;

    let flow = AuthFlow::new(config.trip_source.clone(), config.listener.clone());
    match action {
        AuthAction::Login => {
            let client = reqwest::Client::new();
            flow.obtain_session(&client).await?;
            println!("Trip Source authenticated");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if flow.has_stored_code()? {
                    "authorization code stored"
                } else {
                    "no authorization code stored"
                }
            );
        }
        AuthAction::Logout => {
            flow.clear_stored_code()?;
            println!("authorization code removed");
        }
    }
    Ok(())
}
