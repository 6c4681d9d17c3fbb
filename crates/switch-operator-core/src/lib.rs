//! Core types shared by the switch agent, its client and the operator.
//!
//! This crate provides the vocabulary every layer speaks:
//!
//! - **Status**: the in-band `{code, message}` value carried by every reply
//! - **Device types**: [`SwitchDevice`], [`Interface`], [`InterfaceNeighbor`], [`Port`]
//! - **Wire envelope**: request bodies and the generic [`Response`] wrapper
//!
//! # Example
//!
//! ```
//! use switch_operator_core::{DeviceStatus, Status};
//!
//! let status = Status::not_found("interface Ethernet0 not found");
//! assert!(status.is_not_found());
//! assert_eq!(DeviceStatus::from_store_value("up"), DeviceStatus::Up);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod device;
pub mod status;
pub mod wire;

pub use device::{
    DeviceStatus, Interface, InterfaceList, InterfaceNeighbor, List, Object, ParseDeviceStatusError,
    Port, PortList, SwitchDevice, READINESS_READY,
};
pub use status::{code, Status};
pub use wire::{Empty, InterfaceRequest, Response, SetAdminStatusRequest};
