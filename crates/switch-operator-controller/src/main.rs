//! Switch Operator - Kubernetes controllers for physical switches
//!
//! This is the main entry point for the operator. It reconciles `Switch` and
//! `SwitchInterface` resources and serves health endpoints.
//!
//! # Environment
//!
//! - `AGENT_CONNECT_TIMEOUT_SECS`, `AGENT_REQUEST_TIMEOUT_SECS`
//! - `CONTROLLER_CONCURRENCY`, `REQUEUE_AFTER_SECS`
//! - `HEALTH_ADDR`

use switch_operator_controller::ControllerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,switch_operator=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Switch Operator");

    let config = ControllerConfig::from_env();
    tracing::info!(
        concurrency = config.concurrency,
        requeue_after_secs = config.requeue_after.as_secs(),
        agent_connect_timeout_secs = config.agent_connect_timeout.as_secs(),
        "Loaded controller configuration"
    );

    let client = kube::Client::try_default().await?;
    tracing::info!("Connected to Kubernetes cluster");

    switch_operator_controller::run(client, config).await?;

    Ok(())
}
