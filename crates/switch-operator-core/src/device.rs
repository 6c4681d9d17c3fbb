//! Device-level entities as reported by a switch agent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Readiness value of a device whose identity has been read.
pub const READINESS_READY: u32 = 1;

/// Administrative or operational state of a device component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Component is up.
    Up,
    /// Component is down.
    Down,
    /// State could not be determined.
    #[default]
    Unknown,
}

impl DeviceStatus {
    /// Derive a status from a raw store field, where anything but `"up"` is down.
    #[must_use]
    pub fn from_store_value(value: &str) -> Self {
        if value == "up" {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// The lowercase string stored in the device databases.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized device status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid device status: {0}, it has to be 'up' or 'down'")]
pub struct ParseDeviceStatusError(pub String);

impl FromStr for DeviceStatus {
    type Err = ParseDeviceStatusError;

    /// Parse a desired status. Only `up` and `down` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ParseDeviceStatusError(other.to_string())),
        }
    }
}

/// Anything with a kind and a name, for generic rendering.
pub trait Object {
    /// Kind tag, e.g. `Interface`.
    fn kind(&self) -> &'static str;
    /// Object name.
    fn name(&self) -> String;
}

/// A homogeneous collection of [`Object`]s.
pub trait List {
    /// Kind tag of the list, e.g. `InterfaceList`.
    fn kind(&self) -> &'static str;
    /// The contained objects.
    fn objects(&self) -> Vec<&dyn Object>;
}

/// Identity of a physical switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDevice {
    /// Base MAC address of the switch.
    pub local_mac_address: String,
    /// Hardware SKU.
    pub hwsku: String,
    /// Operating system version string.
    pub sonic_os_version: String,
    /// ASIC vendor/type.
    pub asic_type: String,
    /// [`READINESS_READY`] once the identity has been read, zero before.
    pub readiness: u32,
}

impl Object for SwitchDevice {
    fn kind(&self) -> &'static str {
        "SwitchDevice"
    }

    fn name(&self) -> String {
        format!("switch-{}", self.local_mac_address)
    }
}

/// A device network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name, e.g. `Ethernet0`.
    pub name: String,
    /// Link MAC address.
    #[serde(default)]
    pub mac_address: String,
    /// Observed operational status.
    #[serde(default)]
    pub operation_status: DeviceStatus,
    /// Administrative status.
    #[serde(default)]
    pub admin_status: DeviceStatus,
}

impl Object for Interface {
    fn kind(&self) -> &'static str {
        "Interface"
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// All interfaces of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceList {
    /// The interfaces.
    pub items: Vec<Interface>,
}

impl List for InterfaceList {
    fn kind(&self) -> &'static str {
        "InterfaceList"
    }

    fn objects(&self) -> Vec<&dyn Object> {
        self.items.iter().map(|i| i as &dyn Object).collect()
    }
}

/// The peer learned on an interface via link-layer discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceNeighbor {
    /// Local interface name.
    pub name: String,
    /// Remote chassis MAC address.
    pub mac_address: String,
    /// Remote system name.
    pub system_name: String,
    /// Remote interface handle.
    pub handle: String,
}

impl Object for InterfaceNeighbor {
    fn kind(&self) -> &'static str {
        "InterfaceNeighbor"
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// A physical front-panel port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Port alias; defaults to the name.
    pub alias: String,
}

impl Object for Port {
    fn kind(&self) -> &'static str {
        "Port"
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// All physical ports of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortList {
    /// The ports.
    pub items: Vec<Port>,
}

impl List for PortList {
    fn kind(&self) -> &'static str {
        "PortList"
    }

    fn objects(&self) -> Vec<&dyn Object> {
        self.items.iter().map(|p| p as &dyn Object).collect()
    }
}
