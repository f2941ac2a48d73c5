//! RAX Account Server - Entry Point
//!
//! Registers users by phone number, verifies logins and serves profiles.

use log::{error, info};

use rax_account_server::error::ServerError;
use rax_account_server::{AccountService, Server, ServerConfig, SqliteAccountStore};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching account server...");

    if let Err(e) = run().await {
        error!("Server startup failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::load()?;

    let store = SqliteAccountStore::open(config.storage.database_path())?;
    let hasher = config.security.hasher()?;
    let service = AccountService::new(store, hasher, config.security.max_field_length);

    let server = Server::bind(config.server, service).await?;

    tokio::select! {
        _ = server.start() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, stopping server");
        }
    }

    Ok(())
}
