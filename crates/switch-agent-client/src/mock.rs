//! A mock agent client for testing without a switch.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use switch_operator_core::{
    DeviceStatus, Interface, InterfaceList, InterfaceNeighbor, Port, PortList, Status,
    SwitchDevice, READINESS_READY,
};

use crate::client::SwitchAgentClient;
use crate::error::{ClientError, Result};

/// Operations whose failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GetDeviceInfo`.
    GetDeviceInfo,
    /// `ListInterfaces`.
    ListInterfaces,
    /// `SetInterfaceAdminStatus`.
    SetInterfaceAdminStatus,
    /// `GetInterface`.
    GetInterface,
    /// `GetInterfaceNeighbor`.
    GetInterfaceNeighbor,
    /// `ListPorts`.
    ListPorts,
}

#[derive(Default)]
struct State {
    device: SwitchDevice,
    interfaces: BTreeMap<String, Interface>,
    neighbors: HashMap<String, InterfaceNeighbor>,
    ports: Vec<Port>,
    failures: HashMap<Operation, Status>,
    set_calls: Vec<(String, DeviceStatus)>,
}

/// A mock client that serves a device from memory.
#[derive(Default)]
pub struct MockSwitchAgentClient {
    state: Mutex<State>,
}

impl MockSwitchAgentClient {
    /// Create a mock with an empty device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device identity.
    pub fn set_device(&self, mac: &str, hwsku: &str, os_version: &str) {
        self.state.lock().device = SwitchDevice {
            local_mac_address: mac.to_string(),
            hwsku: hwsku.to_string(),
            sonic_os_version: os_version.to_string(),
            asic_type: "vs".to_string(),
            readiness: READINESS_READY,
        };
    }

    /// Add or replace an interface.
    pub fn add_interface(&self, name: &str, admin: DeviceStatus, oper: DeviceStatus) {
        self.state.lock().interfaces.insert(
            name.to_string(),
            Interface {
                name: name.to_string(),
                mac_address: format!("02:00:00:00:00:{:02x}", name.len()),
                operation_status: oper,
                admin_status: admin,
            },
        );
    }

    /// Set an interface's operational status.
    pub fn set_oper_status(&self, name: &str, oper: DeviceStatus) {
        if let Some(iface) = self.state.lock().interfaces.get_mut(name) {
            iface.operation_status = oper;
        }
    }

    /// Add a link-layer neighbor.
    pub fn add_neighbor(&self, name: &str, mac: &str, system_name: &str, handle: &str) {
        self.state.lock().neighbors.insert(
            name.to_string(),
            InterfaceNeighbor {
                name: name.to_string(),
                mac_address: mac.to_string(),
                system_name: system_name.to_string(),
                handle: handle.to_string(),
            },
        );
    }

    /// Remove a link-layer neighbor.
    pub fn remove_neighbor(&self, name: &str) {
        self.state.lock().neighbors.remove(name);
    }

    /// Add a physical port.
    pub fn add_port(&self, name: &str, alias: &str) {
        self.state.lock().ports.push(Port {
            name: name.to_string(),
            alias: alias.to_string(),
        });
    }

    /// Make an operation fail with `status`.
    pub fn fail(&self, operation: Operation, status: Status) {
        self.state.lock().failures.insert(operation, status);
    }

    /// Stop failing an operation.
    pub fn recover(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Admin status changes requested so far.
    #[must_use]
    pub fn set_calls(&self) -> Vec<(String, DeviceStatus)> {
        self.state.lock().set_calls.clone()
    }

    fn check(&self, operation: Operation) -> Result<()> {
        match self.state.lock().failures.get(&operation) {
            Some(status) => Err(ClientError::Remote(status.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SwitchAgentClient for MockSwitchAgentClient {
    async fn get_device_info(&self) -> Result<SwitchDevice> {
        self.check(Operation::GetDeviceInfo)?;
        Ok(self.state.lock().device.clone())
    }

    async fn list_interfaces(&self) -> Result<InterfaceList> {
        self.check(Operation::ListInterfaces)?;
        let items = self.state.lock().interfaces.values().cloned().collect();
        Ok(InterfaceList { items })
    }

    async fn set_interface_admin_status(
        &self,
        name: &str,
        admin_status: DeviceStatus,
    ) -> Result<Interface> {
        self.check(Operation::SetInterfaceAdminStatus)?;
        let mut state = self.state.lock();
        state.set_calls.push((name.to_string(), admin_status));
        let iface = state
            .interfaces
            .get_mut(name)
            .ok_or_else(|| Status::not_found(format!("interface {name} not found")))?;
        iface.admin_status = admin_status;
        Ok(Interface {
            mac_address: String::new(),
            ..iface.clone()
        })
    }

    async fn get_interface(&self, name: &str) -> Result<Interface> {
        self.check(Operation::GetInterface)?;
        self.state
            .lock()
            .interfaces
            .get(name)
            .cloned()
            .ok_or_else(|| {
                Status::not_found(format!("failed to get interface: interface {name} not found"))
                    .into()
            })
    }

    async fn get_interface_neighbor(&self, name: &str) -> Result<InterfaceNeighbor> {
        self.check(Operation::GetInterfaceNeighbor)?;
        self.state
            .lock()
            .neighbors
            .get(name)
            .cloned()
            .ok_or_else(|| {
                Status::not_found(format!(
                    "failed to get interface neighbor: no LLDP neighbor found for interface {name}"
                ))
                .into()
            })
    }

    async fn list_ports(&self) -> Result<PortList> {
        self.check(Operation::ListPorts)?;
        Ok(PortList {
            items: self.state.lock().ports.clone(),
        })
    }
}
