//! Reconcilers for `Switch` and `SwitchInterface`.
//!
//! Both follow the same lifecycle. A new object first gets the finalizer,
//! then moves to `Pending`, and only the following invocation talks to the
//! switch agent and ends in `Ready` or `Failed`. Whatever status the
//! invocation produced is merge-patched back on every exit path.

pub mod switch;
pub mod switch_interface;

use std::sync::Arc;

use kube::runtime::controller::Action;
use serde::Serialize;
use switch_operator_api::{Condition, Switch, SwitchInterface, SwitchInterfaceState, SwitchState};
use tracing::warn;

use crate::agent_factory::AgentClientFactory;
use crate::config::ControllerConfig;
use crate::patch::{is_empty_patch, merge_diff};
use crate::store::ResourceStore;
use crate::{ControllerError, Result};

/// Shared state handed to every reconcile.
pub struct Context {
    /// Switch resources.
    pub switches: Arc<dyn ResourceStore<Switch>>,
    /// SwitchInterface resources.
    pub interfaces: Arc<dyn ResourceStore<SwitchInterface>>,
    /// Agent client construction.
    pub agents: Arc<dyn AgentClientFactory>,
    /// Runtime configuration.
    pub config: ControllerConfig,
}

/// Lifecycle state shared by both resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Ready,
    Failed,
}

impl From<SwitchState> for Phase {
    fn from(state: SwitchState) -> Self {
        match state {
            SwitchState::Pending => Self::Pending,
            SwitchState::Ready => Self::Ready,
            SwitchState::Failed => Self::Failed,
        }
    }
}

impl From<SwitchInterfaceState> for Phase {
    fn from(state: SwitchInterfaceState) -> Self {
        match state {
            SwitchInterfaceState::Pending => Self::Pending,
            SwitchInterfaceState::Ready => Self::Ready,
            SwitchInterfaceState::Failed => Self::Failed,
        }
    }
}

/// The `Ready` condition mirroring `phase`.
fn ready_condition(phase: Phase, error: Option<&ControllerError>, generation: Option<i64>) -> Condition {
    let condition = match phase {
        Phase::Pending => Condition::ready(false, "Pending", "waiting for the first reconcile"),
        Phase::Ready => Condition::ready(true, "Reconciled", "reconciled with the switch agent"),
        Phase::Failed => match error {
            Some(e) => Condition::ready(false, e.reason(), e.to_string()),
            None => Condition::ready(false, "AgentError", "reconcile failed"),
        },
    };
    condition.with_generation(generation)
}

/// Merge-patch the difference between two status snapshots.
async fn flush_status<K, T>(
    store: &dyn ResourceStore<K>,
    name: &str,
    original: &T,
    modified: &T,
) -> Result<()>
where
    K: Send + Sync + 'static,
    T: Serialize,
{
    let patch = merge_diff(
        &serde_json::to_value(original)?,
        &serde_json::to_value(modified)?,
    );
    if is_empty_patch(&patch) {
        return Ok(());
    }
    store.patch_status(name, patch).await
}

/// Combine the reconcile outcome with the status flush.
///
/// A flush failure is only surfaced when the reconcile itself succeeded.
fn settle(result: Result<Action>, flushed: Result<()>, kind: &str, name: &str) -> Result<Action> {
    if let Err(e) = &flushed {
        warn!(kind, name, error = %e, "Failed to update status");
    }
    match result {
        Ok(action) => flushed.map(|()| action),
        Err(e) => Err(e),
    }
}
