//! Declarative resources reconciled by the switch operator.
//!
//! Two cluster-scoped resources in the `networking.metal.ironcore.dev/v1alpha1`
//! group are defined here:
//!
//! - [`Switch`]: a physical switch reached through its management endpoint
//! - [`SwitchInterface`]: one device interface, owned by exactly one `Switch`
//!
//! The [`convert`] module bridges the resources' enumerations and the
//! tri-state [`DeviceStatus`](switch_operator_core::DeviceStatus) reported by
//! a switch agent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod condition;
pub mod convert;
pub mod reference;
pub mod switch;
pub mod switch_interface;

pub use condition::{Condition, ConditionStatus};
pub use convert::ConversionError;
pub use reference::{LocalObjectReference, ObjectReference};
pub use switch::{Management, PortSpec, PortStatus, Switch, SwitchSpec, SwitchState, SwitchStatus};
pub use switch_interface::{
    AdminState, Neighbor, OperationState, SwitchInterface, SwitchInterfaceSpec,
    SwitchInterfaceState, SwitchInterfaceStatus,
};

/// API group of all resources in this crate.
pub const GROUP: &str = "networking.metal.ironcore.dev";

/// Finalizer shared by both resources.
pub const FINALIZER: &str = "networking.metal.ironcore.dev/switch-operator";

/// Label carrying the owning switch's name on generated interfaces.
pub const SWITCH_LABEL: &str = "networking.metal.ironcore.dev/switch";
