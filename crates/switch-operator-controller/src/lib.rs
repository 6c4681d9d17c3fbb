//! Kubernetes controllers for the switch operator.
//!
//! Two controllers keep `Switch` and `SwitchInterface` resources in step with
//! the physical switches they describe, talking to each switch through its
//! agent:
//!
//! - The `Switch` controller mirrors device identity and ports into status
//!   and creates one owned `SwitchInterface` per device interface.
//! - The `SwitchInterface` controller pushes the desired admin state and
//!   records the observed admin/operational state and link-layer neighbor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Kubernetes API Server                       │
//! └──────────────────────────────────────────────────────────────┘
//!          │ watch                               ▲ finalizers,
//!          ▼                                     │ status, apply
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   kube-runtime Controllers                    │
//! │   ┌──────────────────┐          ┌────────────────────────┐   │
//! │   │ Switch reconcile │ ──owns─▶ │ SwitchInterface        │   │
//! │   │                  │          │ reconcile              │   │
//! │   └──────────────────┘          └────────────────────────┘   │
//! │             │      ResourceStore        │                    │
//! │             └──────────┬────────────────┘                    │
//! │                        ▼                                     │
//! │               AgentClientFactory                             │
//! └──────────────────────────────────────────────────────────────┘
//!                          │ HTTP
//!                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                Switch agent (one per switch)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing
//!
//! With the `test-utils` feature, reconcilers run against
//! `MemoryResourceStore` and `FixedAgentClientFactory` instead of a
//! cluster and real agents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agent_factory;
pub mod config;
pub mod error;
pub mod health;
pub mod patch;
pub mod reconcile;
pub mod runtime;
pub mod store;

pub use agent_factory::{AgentClientFactory, HttpAgentClientFactory};
pub use config::ControllerConfig;
pub use error::{ControllerError, Result};
pub use reconcile::Context;
pub use runtime::run;
pub use store::{KubeStore, ResourceStore, FIELD_MANAGER};

#[cfg(any(test, feature = "test-utils"))]
pub use agent_factory::FixedAgentClientFactory;
#[cfg(any(test, feature = "test-utils"))]
pub use store::memory::MemoryResourceStore;
