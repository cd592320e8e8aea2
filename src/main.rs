//! TSD Auth Gate - Entry Point
//!
//! Accepts telnet-style and HTTP connections and admits each one only after it
//! authenticates.

use log::{error, info};
use std::process::ExitCode;

use tsd_auth_gate::error::handlers::handle_error;
use tsd_auth_gate::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching auth gate...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match Server::bind(config).await {
        Ok(server) => {
            server.start().await;
            ExitCode::SUCCESS
        }
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}
