//! Switch agent - exposes SONiC device state to the switch operator.
//!
//! # HTTP Endpoints
//!
//! - `GET /health`, `GET /ready`
//! - `POST /v1/<Operation>` for each device operation

use std::path::PathBuf;

use clap::Parser;
use switch_agent::AgentConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line overrides for the environment configuration.
#[derive(Parser, Debug)]
#[command(name = "switch-agent", version, about = "SONiC switch agent")]
struct Args {
    /// Address to listen on.
    #[arg(long)]
    listen_addr: Option<String>,

    /// Redis server address of the device store.
    #[arg(long)]
    redis_addr: Option<String>,

    /// Fallback version manifest.
    #[arg(long)]
    version_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,switch_agent=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = AgentConfig::from_env();
    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    if let Some(redis_addr) = args.redis_addr {
        config.redis_addr = redis_addr;
    }
    if let Some(version_file) = args.version_file {
        config.version_file = version_file;
    }

    tracing::info!(
        listen_addr = %config.listen_addr,
        redis_addr = %config.redis_addr,
        settle_delay_ms = config.settle_delay.as_millis(),
        "Starting switch agent"
    );

    switch_agent::serve(&config).await?;

    Ok(())
}
