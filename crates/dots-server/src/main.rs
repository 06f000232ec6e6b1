//! TCP server binary for two-player dots and boxes.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dots_server::config::Config;
use dots_server::server;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        max_rooms = config.max_rooms,
        enforce_turns = config.enforce_turns,
        "starting dots-server"
    );

    server::run(config).await
}
