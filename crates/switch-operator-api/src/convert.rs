//! Conversions between resource enumerations and device tri-state values.
//!
//! A desired admin state must be `Up` or `Down`: `Unknown` is rejected. An
//! observed device value of `unknown` is rejected by the strict conversions
//! and tolerated by [`admin_state_from_observed`].

use switch_operator_core::DeviceStatus;
use thiserror::Error;

use crate::switch_interface::{AdminState, OperationState};

/// Error converting between state enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The resource carries an admin state that cannot be applied.
    #[error("unknown admin state: {0}")]
    AdminState(AdminState),

    /// The device reported a status with no resource equivalent.
    #[error("unknown device status: {0}")]
    DeviceStatus(DeviceStatus),
}

impl TryFrom<AdminState> for DeviceStatus {
    type Error = ConversionError;

    fn try_from(state: AdminState) -> Result<Self, Self::Error> {
        match state {
            AdminState::Up => Ok(Self::Up),
            AdminState::Down => Ok(Self::Down),
            AdminState::Unknown => Err(ConversionError::AdminState(state)),
        }
    }
}

impl TryFrom<DeviceStatus> for AdminState {
    type Error = ConversionError;

    fn try_from(status: DeviceStatus) -> Result<Self, Self::Error> {
        match status {
            DeviceStatus::Up => Ok(Self::Up),
            DeviceStatus::Down => Ok(Self::Down),
            DeviceStatus::Unknown => Err(ConversionError::DeviceStatus(status)),
        }
    }
}

impl TryFrom<DeviceStatus> for OperationState {
    type Error = ConversionError;

    fn try_from(status: DeviceStatus) -> Result<Self, Self::Error> {
        match status {
            DeviceStatus::Up => Ok(Self::Up),
            DeviceStatus::Down => Ok(Self::Down),
            DeviceStatus::Unknown => Err(ConversionError::DeviceStatus(status)),
        }
    }
}

/// Map an observed admin status, keeping `unknown` as [`AdminState::Unknown`].
#[must_use]
pub fn admin_state_from_observed(status: DeviceStatus) -> AdminState {
    AdminState::try_from(status).unwrap_or(AdminState::Unknown)
}

/// Map an observed operational status: only `up` is [`OperationState::Up`].
#[must_use]
pub fn operation_state_from_observed(status: DeviceStatus) -> OperationState {
    if status == DeviceStatus::Up {
        OperationState::Up
    } else {
        OperationState::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desired_admin_state_round_trips() {
        for state in [AdminState::Up, AdminState::Down] {
            let device = DeviceStatus::try_from(state).unwrap();
            assert_eq!(AdminState::try_from(device).unwrap(), state);
        }
    }

    #[test]
    fn desired_unknown_is_rejected() {
        let err = DeviceStatus::try_from(AdminState::Unknown).unwrap_err();
        assert_eq!(err, ConversionError::AdminState(AdminState::Unknown));
    }

    #[test]
    fn observed_unknown_is_tolerated() {
        assert!(AdminState::try_from(DeviceStatus::Unknown).is_err());
        assert_eq!(
            admin_state_from_observed(DeviceStatus::Unknown),
            AdminState::Unknown
        );
        assert_eq!(
            operation_state_from_observed(DeviceStatus::Unknown),
            OperationState::Down
        );
    }

    #[test]
    fn desired_up_becomes_device_up() {
        let device = DeviceStatus::try_from(AdminState::Up).unwrap();
        assert_eq!(device.as_str(), "up");
        assert_eq!(
            OperationState::try_from(DeviceStatus::Down).unwrap(),
            OperationState::Down
        );
    }
}
