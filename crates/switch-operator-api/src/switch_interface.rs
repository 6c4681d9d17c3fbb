//! The `SwitchInterface` resource.

use std::fmt;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::reference::LocalObjectReference;

/// Desired state of one device interface.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "networking.metal.ironcore.dev",
    version = "v1alpha1",
    kind = "SwitchInterface",
    status = "SwitchInterfaceStatus",
    printcolumn = r#"{"name":"Handle", "type":"string", "jsonPath":".spec.handle"}"#,
    printcolumn = r#"{"name":"Admin", "type":"string", "jsonPath":".status.adminState"}"#,
    printcolumn = r#"{"name":"Oper", "type":"string", "jsonPath":".status.operationalState"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SwitchInterfaceSpec {
    /// Device interface name, e.g. `Ethernet0`.
    pub handle: String,

    /// The owning switch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_ref: Option<LocalObjectReference>,

    /// Desired administrative state.
    #[serde(default)]
    pub admin_state: AdminState,
}

/// Administrative state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum AdminState {
    /// Not known; invalid as a desired state.
    #[default]
    Unknown,
    /// Enabled.
    Up,
    /// Disabled.
    Down,
}

impl fmt::Display for AdminState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "Unknown",
            Self::Up => "Up",
            Self::Down => "Down",
        })
    }
}

/// Observed operational state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum OperationState {
    /// Not known.
    #[default]
    Unknown,
    /// Link is up.
    Up,
    /// Link is down.
    Down,
}

/// Lifecycle state of a switch interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SwitchInterfaceState {
    /// Accepted, waiting for the first real reconcile.
    Pending,
    /// Device state has been observed and the admin state applied.
    Ready,
    /// The last reconcile failed.
    Failed,
}

/// The peer learned on an interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Neighbor {
    /// Remote chassis MAC address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,

    /// Remote system name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_name: String,

    /// Remote interface handle.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interface_handle: String,
}

impl Neighbor {
    /// Whether no neighbor is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mac_address.is_empty() && self.system_name.is_empty() && self.interface_handle.is_empty()
    }
}

/// Observed state of a switch interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchInterfaceStatus {
    /// Administrative state reported by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,

    /// Operational state reported by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_state: Option<OperationState>,

    /// Lifecycle state; absent on a freshly created object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SwitchInterfaceState>,

    /// Link-layer neighbor, empty when none is known.
    #[serde(default, skip_serializing_if = "Neighbor::is_empty")]
    pub neighbor: Neighbor,

    /// Interface MAC address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,

    /// Standard conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
