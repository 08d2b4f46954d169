//! parlor server binary.
//!
//! Loads configuration, initializes logging, binds the listen address,
//! and runs the accept loop.

use parlor::config::Config;
use parlor::server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        max_conns_per_source = config.max_conns_per_source,
        "Starting parlor server"
    );

    let server = Server::bind(&config).await?;
    server.run().await
}
