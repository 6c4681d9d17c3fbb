//! On-switch agent for the switch operator.
//!
//! The agent translates device operations into reads and writes against the
//! switch's control-plane databases and exposes them over HTTP.
//!
//! - [`SwitchAgent`]: the device capability, independent of backend
//! - [`SonicAgent`]: the SONiC implementation over Redis
//! - [`server`]: the protocol router
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   switch-agent-client        │
//! └──────────────────────────────┘
//!                │ HTTP/JSON
//!                ▼
//! ┌──────────────────────────────┐
//! │   server (axum router)       │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │   SonicAgent                 │
//! │  ┌────────────┐ ┌─────────┐  │
//! │  │ Connection │ │  Link   │  │
//! │  │ Pool       │ │ Resolver│  │
//! │  └────────────┘ └─────────┘  │
//! └──────────────────────────────┘
//!                │
//!                ▼
//!   CONFIG_DB / STATE_DB / APPL_DB
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agent;
pub mod config;
pub mod error;
pub mod server;
pub mod sonic;

pub use agent::SwitchAgent;
pub use config::AgentConfig;
pub use error::{AgentError, Result, StoreError};
pub use server::{create_router, serve};
pub use sonic::SonicAgent;
