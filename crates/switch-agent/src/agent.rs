//! The device capability exposed by an agent.

use async_trait::async_trait;
use switch_operator_core::{
    DeviceStatus, Interface, InterfaceList, InterfaceNeighbor, PortList, Status, SwitchDevice,
};

/// Operations a switch backend must support.
///
/// Every operation reports domain failures as a [`Status`]; there is no
/// separate transport channel at this layer.
#[async_trait]
pub trait SwitchAgent: Send + Sync {
    /// Read the device identity.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` when the device has no MAC, `BAD_REQUEST` when the store
    /// cannot be read.
    async fn get_device_info(&self) -> Result<SwitchDevice, Status>;

    /// Enumerate all configured interfaces.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` when any interface lacks a link MAC.
    async fn list_interfaces(&self) -> Result<InterfaceList, Status>;

    /// Change an interface's admin status and read back its operational status.
    ///
    /// # Errors
    ///
    /// `BAD_REQUEST` for an empty name, the write/read/key-check codes for
    /// store failures. A failed read-back rolls the write back.
    async fn set_interface_admin_status(
        &self,
        name: &str,
        admin_status: DeviceStatus,
    ) -> Result<Interface, Status>;

    /// Read one interface.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` when the interface is not configured or has no link MAC.
    async fn get_interface(&self, name: &str) -> Result<Interface, Status>;

    /// Read the link-layer neighbor of an interface.
    ///
    /// # Errors
    ///
    /// `NOT_FOUND` when no complete neighbor entry exists.
    async fn get_interface_neighbor(&self, name: &str) -> Result<InterfaceNeighbor, Status>;

    /// Enumerate physical ports.
    ///
    /// # Errors
    ///
    /// `BAD_REQUEST` when the store cannot be read.
    async fn list_ports(&self) -> Result<PortList, Status>;
}
