//! SwitchInterface reconciliation.
//!
//! Every invocation reads the device interface, pushes the desired admin
//! state and records what the device reports afterwards, so repeating it
//! against an unchanged device changes nothing.

use std::sync::Arc;
use std::time::Duration;

use kube::runtime::controller::Action;
use kube::Resource;
use switch_operator_api::condition::set_condition;
use switch_operator_api::convert::operation_state_from_observed;
use switch_operator_api::{
    AdminState, Neighbor, OperationState, SwitchInterface, SwitchInterfaceState,
    SwitchInterfaceStatus, FINALIZER,
};
use switch_operator_core::DeviceStatus;
use tracing::{info, warn};

use super::{flush_status, ready_condition, settle, Context};
use crate::store::{ensure_finalizer, ensure_no_finalizer, object_name};
use crate::{ControllerError, Result};

/// Reconcile one `SwitchInterface`.
///
/// # Errors
///
/// Returns an error if the agent or the API server fails. The status is
/// flushed before the error is returned.
pub async fn reconcile(iface: Arc<SwitchInterface>, ctx: Arc<Context>) -> Result<Action> {
    let name = object_name(iface.as_ref())?;

    if iface.meta().deletion_timestamp.is_some() {
        return cleanup(&iface, &name, &ctx).await;
    }

    info!(interface = %name, "Reconciling SwitchInterface");

    if ensure_finalizer(ctx.interfaces.as_ref(), iface.as_ref(), FINALIZER).await? {
        return Ok(Action::requeue(Duration::ZERO));
    }

    let original = iface.status.clone().unwrap_or_default();
    let mut status = original.clone();

    let result = reconcile_status(&iface, &name, &mut status, &ctx).await;

    if let Some(state) = status.state {
        let condition = ready_condition(state.into(), result.as_ref().err(), iface.meta().generation);
        set_condition(&mut status.conditions, condition);
    }

    let flushed = flush_status(ctx.interfaces.as_ref(), &name, &original, &status).await;

    // Without a switch reference nothing can succeed until the object is edited.
    let result = match result {
        Err(ControllerError::MissingSwitchRef(_)) => {
            warn!(interface = %name, "SwitchInterface has no switch reference");
            Ok(Action::await_change())
        }
        other => other,
    };

    if result.is_ok() && status.state == Some(SwitchInterfaceState::Ready) {
        info!(interface = %name, "Reconciled SwitchInterface");
    }
    settle(result, flushed, "SwitchInterface", &name)
}

async fn cleanup(iface: &SwitchInterface, name: &str, ctx: &Context) -> Result<Action> {
    info!(interface = %name, "Deleting SwitchInterface");

    ensure_no_finalizer(ctx.interfaces.as_ref(), iface, FINALIZER).await?;

    info!(interface = %name, "Deleted SwitchInterface");
    Ok(Action::await_change())
}

fn fail(status: &mut SwitchInterfaceStatus, error: impl Into<ControllerError>) -> ControllerError {
    status.state = Some(SwitchInterfaceState::Failed);
    error.into()
}

async fn reconcile_status(
    iface: &SwitchInterface,
    name: &str,
    status: &mut SwitchInterfaceStatus,
    ctx: &Context,
) -> Result<Action> {
    if status.state.is_none() {
        status.state = Some(SwitchInterfaceState::Pending);
        return Ok(Action::requeue(Duration::ZERO));
    }

    let Some(switch_ref) = &iface.spec.switch_ref else {
        return Err(fail(status, ControllerError::MissingSwitchRef(name.to_string())));
    };

    let switch = ctx
        .switches
        .get(&switch_ref.name)
        .await
        .map_err(|e| fail(status, e))?;
    let Some(switch) = switch else {
        return Err(fail(
            status,
            ControllerError::SwitchNotFound(switch_ref.name.clone()),
        ));
    };
    let client = ctx.agents.client_for(&switch).map_err(|e| fail(status, e))?;
    let handle = iface.spec.handle.as_str();

    let device = client
        .get_interface(handle)
        .await
        .map_err(|e| fail(status, e))?;
    let admin = AdminState::try_from(device.admin_status).map_err(|e| fail(status, e))?;
    status.admin_state = Some(admin);
    status.operational_state = Some(operation_state_from_observed(device.operation_status));
    status.mac_address = device.mac_address;

    let desired = DeviceStatus::try_from(iface.spec.admin_state).map_err(|e| fail(status, e))?;
    let updated = client
        .set_interface_admin_status(handle, desired)
        .await
        .map_err(|e| fail(status, e))?;
    let admin = AdminState::try_from(updated.admin_status).map_err(|e| fail(status, e))?;
    let oper = OperationState::try_from(updated.operation_status).map_err(|e| fail(status, e))?;
    status.admin_state = Some(admin);
    status.operational_state = Some(oper);

    match client.get_interface_neighbor(handle).await {
        Ok(neighbor) => {
            status.neighbor = Neighbor {
                mac_address: neighbor.mac_address,
                system_name: neighbor.system_name,
                interface_handle: neighbor.handle,
            };
        }
        Err(e) if e.is_not_found() => status.neighbor = Neighbor::default(),
        Err(e) => return Err(fail(status, e)),
    }

    status.state = Some(SwitchInterfaceState::Ready);
    Ok(Action::await_change())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::testing::Harness;
    use switch_agent_client::Operation;
    use switch_operator_api::condition::{find_condition, READY};
    use switch_operator_api::{
        LocalObjectReference, Management, Switch, SwitchInterfaceSpec, SwitchSpec,
    };
    use switch_operator_core::Status;

    fn with_switch(h: &Harness) {
        let mut switch = Switch::new(
            "sw1",
            SwitchSpec {
                management: Management {
                    host: "10.0.0.5".to_string(),
                    port: "50051".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        switch.metadata.uid = Some("uid-sw1".to_string());
        h.switches.insert(switch);
    }

    fn new_interface(handle: &str, admin_state: AdminState) -> SwitchInterface {
        SwitchInterface::new(
            &format!("sw1-{}", handle.to_lowercase()),
            SwitchInterfaceSpec {
                handle: handle.to_string(),
                switch_ref: Some(LocalObjectReference::new("sw1")),
                admin_state,
            },
        )
    }

    async fn step(h: &Harness, name: &str) -> Result<Action> {
        let iface = h.interfaces.object(name).expect("interface exists");
        reconcile(Arc::new(iface), h.ctx.clone()).await
    }

    /// Drive a new interface through finalizer and Pending.
    async fn admit(h: &Harness, name: &str) {
        step(h, name).await.unwrap();
        step(h, name).await.unwrap();
        assert_eq!(status(h, name).state, Some(SwitchInterfaceState::Pending));
    }

    fn status(h: &Harness, name: &str) -> SwitchInterfaceStatus {
        h.interfaces
            .object(name)
            .and_then(|i| i.status)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn desired_admin_state_is_pushed() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet4", AdminState::Up));
        h.agent.add_neighbor("Ethernet4", "aa:bb:cc:dd:ee:ff", "spine-1", "Ethernet8");
        admit(&h, "sw1-ethernet4").await;

        step(&h, "sw1-ethernet4").await.unwrap();

        assert_eq!(
            h.agent.set_calls(),
            vec![("Ethernet4".to_string(), DeviceStatus::Up)]
        );
        let status = status(&h, "sw1-ethernet4");
        assert_eq!(status.state, Some(SwitchInterfaceState::Ready));
        assert_eq!(status.admin_state, Some(AdminState::Up));
        assert_eq!(status.operational_state, Some(OperationState::Down));
        assert!(!status.mac_address.is_empty());
        assert_eq!(status.neighbor.system_name, "spine-1");
        assert_eq!(status.neighbor.interface_handle, "Ethernet8");
        assert_eq!(h.factory.addresses(), vec!["10.0.0.5:50051".to_string()]);
    }

    #[tokio::test]
    async fn missing_neighbor_clears_field() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Up));
        h.agent.add_neighbor("Ethernet0", "aa:bb:cc:dd:ee:ff", "spine-1", "Ethernet8");
        admit(&h, "sw1-ethernet0").await;
        step(&h, "sw1-ethernet0").await.unwrap();
        assert!(!status(&h, "sw1-ethernet0").neighbor.is_empty());

        h.agent.remove_neighbor("Ethernet0");
        step(&h, "sw1-ethernet0").await.unwrap();

        let status = status(&h, "sw1-ethernet0");
        assert_eq!(status.state, Some(SwitchInterfaceState::Ready));
        assert!(status.neighbor.is_empty());
        let (_, patch) = h.interfaces.status_patches().pop().unwrap();
        assert!(patch["neighbor"].is_null());
    }

    #[tokio::test]
    async fn neighbor_failure_marks_failed() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Up));
        admit(&h, "sw1-ethernet0").await;

        h.agent
            .fail(Operation::GetInterfaceNeighbor, Status::server_error("lldp down"));
        assert!(step(&h, "sw1-ethernet0").await.is_err());
        assert_eq!(
            status(&h, "sw1-ethernet0").state,
            Some(SwitchInterfaceState::Failed)
        );
    }

    #[tokio::test]
    async fn unknown_desired_state_is_invalid() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Unknown));
        admit(&h, "sw1-ethernet0").await;

        let err = step(&h, "sw1-ethernet0").await.unwrap_err();
        assert!(matches!(err, ControllerError::Conversion(_)));
        assert!(h.agent.set_calls().is_empty());

        let status = status(&h, "sw1-ethernet0");
        assert_eq!(status.state, Some(SwitchInterfaceState::Failed));
        let ready = find_condition(&status.conditions, READY).unwrap();
        assert_eq!(ready.reason, "InvalidState");
    }

    #[tokio::test]
    async fn missing_switch_ref_fails_without_retry() {
        let h = Harness::new();
        with_switch(&h);
        let mut iface = new_interface("Ethernet0", AdminState::Up);
        iface.spec.switch_ref = None;
        h.interfaces.insert(iface);
        admit(&h, "sw1-ethernet0").await;

        let action = step(&h, "sw1-ethernet0").await.unwrap();
        assert_eq!(action, Action::await_change());

        let status = status(&h, "sw1-ethernet0");
        assert_eq!(status.state, Some(SwitchInterfaceState::Failed));
        let ready = find_condition(&status.conditions, READY).unwrap();
        assert_eq!(ready.reason, "MissingSwitchRef");
        assert!(h.factory.addresses().is_empty());
    }

    #[tokio::test]
    async fn unknown_switch_fails() {
        let h = Harness::new();
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Up));
        admit(&h, "sw1-ethernet0").await;

        let err = step(&h, "sw1-ethernet0").await.unwrap_err();
        assert!(matches!(err, ControllerError::SwitchNotFound(_)));
        assert_eq!(
            status(&h, "sw1-ethernet0").state,
            Some(SwitchInterfaceState::Failed)
        );
    }

    #[tokio::test]
    async fn get_interface_not_found_marks_failed() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet99", AdminState::Up));
        admit(&h, "sw1-ethernet99").await;

        let err = step(&h, "sw1-ethernet99").await.unwrap_err();
        assert!(matches!(err, ControllerError::Agent(ref e) if e.is_not_found()));
        assert_eq!(
            status(&h, "sw1-ethernet99").state,
            Some(SwitchInterfaceState::Failed)
        );
    }

    #[tokio::test]
    async fn repeated_reconcile_writes_nothing() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Down));
        admit(&h, "sw1-ethernet0").await;
        step(&h, "sw1-ethernet0").await.unwrap();
        let patches = h.interfaces.status_patches().len();

        step(&h, "sw1-ethernet0").await.unwrap();
        step(&h, "sw1-ethernet0").await.unwrap();

        assert_eq!(h.interfaces.status_patches().len(), patches);
        assert_eq!(
            status(&h, "sw1-ethernet0").admin_state,
            Some(AdminState::Down)
        );
    }

    #[tokio::test]
    async fn deletion_removes_finalizer() {
        let h = Harness::new();
        with_switch(&h);
        h.interfaces
            .insert(new_interface("Ethernet0", AdminState::Up));
        admit(&h, "sw1-ethernet0").await;

        let mut iface = h.interfaces.object("sw1-ethernet0").unwrap();
        iface.metadata.deletion_timestamp = Some(
            k8s_openapi::apimachinery::pkg::apis::meta::v1::Time(chrono::Utc::now()),
        );
        h.interfaces.insert(iface);

        step(&h, "sw1-ethernet0").await.unwrap();
        assert!(h.interfaces.object("sw1-ethernet0").is_none());
    }
}
