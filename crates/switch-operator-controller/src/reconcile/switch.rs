//! Switch reconciliation.
//!
//! A ready switch mirrors its device identity and port list into status and
//! owns one `SwitchInterface` per device interface.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::Resource;
use switch_operator_api::condition::set_condition;
use switch_operator_api::convert::admin_state_from_observed;
use switch_operator_api::{
    LocalObjectReference, PortStatus, Switch, SwitchInterface, SwitchInterfaceSpec, SwitchState,
    SwitchStatus, FINALIZER, SWITCH_LABEL,
};
use switch_operator_core::Interface;
use tracing::{debug, info};

use super::{flush_status, ready_condition, settle, Context};
use crate::store::{ensure_finalizer, ensure_no_finalizer, object_name};
use crate::{ControllerError, Result};

/// Name of the `SwitchInterface` generated for `handle` on `switch_name`.
#[must_use]
pub fn interface_name(switch_name: &str, handle: &str) -> String {
    format!("{switch_name}-{}", handle.to_lowercase())
}

/// Reconcile one `Switch`.
///
/// # Errors
///
/// Returns an error if the agent or the API server fails. The status is
/// flushed before the error is returned.
pub async fn reconcile(switch: Arc<Switch>, ctx: Arc<Context>) -> Result<Action> {
    let name = object_name(switch.as_ref())?;

    if switch.meta().deletion_timestamp.is_some() {
        return cleanup(&switch, &name, &ctx).await;
    }

    info!(switch = %name, "Reconciling Switch");

    if ensure_finalizer(ctx.switches.as_ref(), switch.as_ref(), FINALIZER).await? {
        debug!(switch = %name, "Added finalizer");
        return Ok(Action::requeue(Duration::ZERO));
    }

    let original = switch.status.clone().unwrap_or_default();
    let mut status = original.clone();

    let result = reconcile_status(&switch, &name, &mut status, &ctx).await;

    if let Some(state) = status.state {
        let condition = ready_condition(
            state.into(),
            result.as_ref().err(),
            switch.meta().generation,
        );
        set_condition(&mut status.conditions, condition);
    }

    let flushed = flush_status(ctx.switches.as_ref(), &name, &original, &status).await;
    if result.is_ok() && status.state == Some(SwitchState::Ready) {
        info!(switch = %name, "Reconciled Switch");
    }
    settle(result, flushed, "Switch", &name)
}

async fn cleanup(switch: &Switch, name: &str, ctx: &Context) -> Result<Action> {
    info!(switch = %name, "Deleting Switch");

    // Generated interfaces are garbage-collected through their owner references.
    ensure_no_finalizer(ctx.switches.as_ref(), switch, FINALIZER).await?;

    info!(switch = %name, "Deleted Switch");
    Ok(Action::await_change())
}

fn fail(status: &mut SwitchStatus, error: impl Into<ControllerError>) -> ControllerError {
    status.state = Some(SwitchState::Failed);
    error.into()
}

async fn reconcile_status(
    switch: &Switch,
    name: &str,
    status: &mut SwitchStatus,
    ctx: &Context,
) -> Result<Action> {
    if status.state.is_none() {
        status.state = Some(SwitchState::Pending);
        return Ok(Action::requeue(Duration::ZERO));
    }

    let client = ctx.agents.client_for(switch)?;

    let device = client
        .get_device_info()
        .await
        .map_err(|e| fail(status, e))?;
    status.mac_address = device.local_mac_address;
    status.firmware_version = device.sonic_os_version;
    status.sku = device.hwsku;

    let interfaces = client
        .list_interfaces()
        .await
        .map_err(|e| fail(status, e))?;
    for iface in &interfaces.items {
        let child = desired_interface(switch, name, iface)?;
        ctx.interfaces.apply(&child).await?;
        debug!(switch = %name, interface = %iface.name, "Ensured SwitchInterface");
    }

    let ports = client.list_ports().await.map_err(|e| fail(status, e))?;
    status.ports = ports
        .items
        .iter()
        .map(|port| PortStatus {
            name: port.name.clone(),
            interface_refs: interfaces
                .items
                .iter()
                .filter(|iface| iface.name == port.name)
                .map(|iface| LocalObjectReference::new(interface_name(name, &iface.name)))
                .collect(),
        })
        .collect();

    status.state = Some(SwitchState::Ready);
    Ok(Action::await_change())
}

/// The `SwitchInterface` a switch owns for one device interface.
fn desired_interface(switch: &Switch, name: &str, iface: &Interface) -> Result<SwitchInterface> {
    let owner = switch
        .controller_owner_ref(&())
        .ok_or(ControllerError::MissingField("metadata.uid"))?;

    let mut child = SwitchInterface::new(
        &interface_name(name, &iface.name),
        SwitchInterfaceSpec {
            handle: iface.name.clone(),
            switch_ref: Some(LocalObjectReference::new(name)),
            admin_state: admin_state_from_observed(iface.admin_status),
        },
    );
    child.metadata.owner_references = Some(vec![owner]);
    child.metadata.labels = Some(BTreeMap::from([(
        SWITCH_LABEL.to_string(),
        name.to_string(),
    )]));
    Ok(child)
}
