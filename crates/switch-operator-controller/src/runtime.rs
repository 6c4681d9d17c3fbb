//! Running the controllers against a cluster.

use std::sync::Arc;

use futures::StreamExt;
use kube::runtime::controller::{self, Action, Controller};
use kube::runtime::watcher;
use kube::{Api, Client};
use switch_operator_api::{Switch, SwitchInterface};
use tracing::{debug, info, warn};

use crate::agent_factory::HttpAgentClientFactory;
use crate::config::ControllerConfig;
use crate::health::{self, Readiness};
use crate::reconcile::{self, Context};
use crate::store::KubeStore;
use crate::{ControllerError, Result};

/// Requeue policy for a failed `Switch` reconcile.
#[allow(clippy::needless_pass_by_value)]
pub fn switch_error_policy(switch: Arc<Switch>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    warn!(
        switch = ?switch.metadata.name,
        error = %error,
        retriable = error.is_retriable(),
        "Switch reconcile failed"
    );
    Action::requeue(ctx.config.requeue_after)
}

/// Requeue policy for a failed `SwitchInterface` reconcile.
#[allow(clippy::needless_pass_by_value)]
pub fn interface_error_policy(
    iface: Arc<SwitchInterface>,
    error: &ControllerError,
    ctx: Arc<Context>,
) -> Action {
    warn!(
        interface = ?iface.metadata.name,
        error = %error,
        retriable = error.is_retriable(),
        "SwitchInterface reconcile failed"
    );
    Action::requeue(ctx.config.requeue_after)
}

/// Build the shared reconcile context for a cluster.
///
/// # Errors
///
/// Returns an error if the agent HTTP client cannot be created.
pub fn cluster_context(client: &Client, config: ControllerConfig) -> Result<Arc<Context>> {
    Ok(Arc::new(Context {
        switches: Arc::new(KubeStore::<Switch>::new(client.clone())),
        interfaces: Arc::new(KubeStore::<SwitchInterface>::new(client.clone())),
        agents: Arc::new(HttpAgentClientFactory::new(&config)?),
        config,
    }))
}

/// Run both controllers and the health server until shutdown.
///
/// # Errors
///
/// Returns an error if the context cannot be built or the health listener
/// cannot be bound.
pub async fn run(client: Client, config: ControllerConfig) -> Result<()> {
    let readiness = Readiness::default();
    let listener = tokio::net::TcpListener::bind(&config.health_addr).await?;
    info!(health_addr = %config.health_addr, "Starting health server");
    let health_router = health::create_router(readiness.clone());
    let health_server = tokio::spawn(async move { axum::serve(listener, health_router).await });

    let controller_config = controller::Config::default().concurrency(config.concurrency);
    let ctx = cluster_context(&client, config)?;

    let switches: Api<Switch> = Api::all(client.clone());
    let interfaces: Api<SwitchInterface> = Api::all(client);

    let switch_controller = Controller::new(switches, watcher::Config::default())
        .owns(interfaces.clone(), watcher::Config::default())
        .with_config(controller_config.clone())
        .shutdown_on_signal()
        .run(reconcile::switch::reconcile, switch_error_policy, Arc::clone(&ctx))
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!(switch = %obj.name, "Switch reconcile finished"),
                Err(e) => debug!(error = %e, "Switch controller event"),
            }
        });

    let interface_controller = Controller::new(interfaces, watcher::Config::default())
        .with_config(controller_config)
        .shutdown_on_signal()
        .run(
            reconcile::switch_interface::reconcile,
            interface_error_policy,
            ctx,
        )
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => debug!(interface = %obj.name, "SwitchInterface reconcile finished"),
                Err(e) => debug!(error = %e, "SwitchInterface controller event"),
            }
        });

    readiness.set_ready();
    info!("Started Switch and SwitchInterface controllers");
    tokio::join!(switch_controller, interface_controller);

    info!("Controllers stopped");
    health_server.abort();
    Ok(())
}
