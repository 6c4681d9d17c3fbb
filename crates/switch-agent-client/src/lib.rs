//! Client for the switch agent protocol.
//!
//! [`HttpSwitchAgentClient`] opens a fresh connection per call and maps the
//! agent's reply envelope into a single [`Result`]: transport failures and
//! nonzero statuses both surface as [`ClientError`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use switch_agent_client::{HttpSwitchAgentClient, SwitchAgentClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpSwitchAgentClient::new("10.0.0.1:50051", Duration::from_secs(4))?;
//! let device = client.get_device_info().await?;
//! println!("{}", device.local_mac_address);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockSwitchAgentClient, Operation};

pub use client::{
    HttpSwitchAgentClient, SwitchAgentClient, DEFAULT_ADDRESS, DEFAULT_CONNECT_TIMEOUT,
};
pub use error::{ClientError, Result};
