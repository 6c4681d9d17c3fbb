//! The `Switch` resource.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::reference::{LocalObjectReference, ObjectReference};

/// Desired state of a switch.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "networking.metal.ironcore.dev",
    version = "v1alpha1",
    kind = "Switch",
    status = "SwitchStatus",
    printcolumn = r#"{"name":"MAC", "type":"string", "jsonPath":".status.macAddress"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SwitchSpec {
    /// How to reach the switch agent.
    #[serde(default)]
    pub management: Management,

    /// Expected base MAC address.
    #[serde(default)]
    pub mac_address: String,

    /// Statically declared ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortSpec>,
}

/// Management endpoint of a switch agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Management {
    /// Host name or address of the agent.
    #[serde(default)]
    pub host: String,

    /// Agent port, as a string.
    #[serde(default)]
    pub port: String,

    /// Credentials for the management endpoint.
    #[serde(default)]
    pub credentials: ObjectReference,
}

impl Management {
    /// The `host:port` address of the agent, or `None` when neither is set.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        if self.host.is_empty() && self.port.is_empty() {
            None
        } else {
            Some(format!("{}:{}", self.host, self.port))
        }
    }
}

/// A declared port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PortSpec {
    /// Port name.
    pub name: String,
}

/// Lifecycle state of a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SwitchState {
    /// Accepted, waiting for the first real reconcile.
    Pending,
    /// Device state has been observed.
    Ready,
    /// The last reconcile failed.
    Failed,
}

/// Observed status of one port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PortStatus {
    /// Port name.
    pub name: String,

    /// Interfaces backed by this port.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interface_refs: Vec<LocalObjectReference>,
}

/// Observed state of a switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchStatus {
    /// Lifecycle state; absent on a freshly created object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SwitchState>,

    /// Physical ports reported by the device.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortStatus>,

    /// Base MAC address reported by the device.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,

    /// Operating system version reported by the device.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firmware_version: String,

    /// Hardware SKU reported by the device.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,

    /// Standard conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
