//! HTTP protocol server in front of a [`SwitchAgent`].
//!
//! # Routes
//!
//! - `GET /health` - Health check
//! - `GET /ready` - Readiness check
//! - `POST /v1/GetDeviceInfo`
//! - `POST /v1/ListInterfaces`
//! - `POST /v1/SetInterfaceAdminStatus`
//! - `POST /v1/GetInterface`
//! - `POST /v1/GetInterfaceNeighbor`
//! - `POST /v1/ListPorts`
//!
//! Every RPC answers `200 OK` with a [`Response`] envelope; domain failures
//! are carried in its status.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use switch_operator_core::{
    Interface, InterfaceList, InterfaceNeighbor, InterfaceRequest, PortList, Response,
    SetAdminStatusRequest, Status, SwitchDevice,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::agent::SwitchAgent;
use crate::config::AgentConfig;
use crate::sonic::SonicAgent;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    agent: Arc<dyn SwitchAgent>,
}

/// Build the protocol router.
pub fn create_router(agent: Arc<dyn SwitchAgent>) -> Router {
    Router::new()
        // Health & readiness
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        // Device RPCs
        .route("/v1/GetDeviceInfo", post(get_device_info))
        .route("/v1/ListInterfaces", post(list_interfaces))
        .route("/v1/SetInterfaceAdminStatus", post(set_interface_admin_status))
        .route("/v1/GetInterface", post(get_interface))
        .route("/v1/GetInterfaceNeighbor", post(get_interface_neighbor))
        .route("/v1/ListPorts", post(list_ports))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent })
}

/// Connect to the device store and serve the protocol until the listener fails.
///
/// # Errors
///
/// Returns an error if the store is unreachable or the listener cannot bind.
pub async fn serve(config: &AgentConfig) -> crate::Result<()> {
    let agent = SonicAgent::connect(config).await?;
    let app = create_router(Arc::new(agent));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(listen_addr = %config.listen_addr, "Serving agent protocol");
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "switch-agent",
    })
}

async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, "ready")
}

async fn get_device_info(State(state): State<AppState>) -> Json<Response<SwitchDevice>> {
    Json(state.agent.get_device_info().await.into())
}

async fn list_interfaces(State(state): State<AppState>) -> Json<Response<InterfaceList>> {
    let result = state.agent.list_interfaces().await;
    Json(result.map_err(|s| s.context("failed to list interfaces")).into())
}

/// Runs on its own task so a dropped request cannot stop it between the
/// write and a rollback.
async fn set_interface_admin_status(
    State(state): State<AppState>,
    Json(req): Json<SetAdminStatusRequest>,
) -> Json<Response<Interface>> {
    let agent = Arc::clone(&state.agent);
    let task = tokio::spawn(async move {
        agent
            .set_interface_admin_status(&req.name, req.admin_status)
            .await
    });

    let result = task.await.unwrap_or_else(|e| {
        error!(error = %e, "Admin status task failed");
        Err(Status::server_error(format!("admin status task failed: {e}")))
    });
    Json(result.into())
}

async fn get_interface(
    State(state): State<AppState>,
    Json(req): Json<InterfaceRequest>,
) -> Json<Response<Interface>> {
    let result = state.agent.get_interface(&req.name).await;
    Json(result.map_err(|s| s.context("failed to get interface")).into())
}

async fn get_interface_neighbor(
    State(state): State<AppState>,
    Json(req): Json<InterfaceRequest>,
) -> Json<Response<InterfaceNeighbor>> {
    let result = state.agent.get_interface_neighbor(&req.name).await;
    Json(
        result
            .map_err(|s| s.context("failed to get interface neighbor"))
            .into(),
    )
}

async fn list_ports(State(state): State<AppState>) -> Json<Response<PortList>> {
    let result = state.agent.list_ports().await;
    Json(result.map_err(|s| s.context("failed to list ports")).into())
}
