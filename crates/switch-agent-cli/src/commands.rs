//! Subcommands and their execution.

use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use clap::Subcommand;
use switch_agent_client::{ClientError, SwitchAgentClient};
use switch_operator_core::DeviceStatus;

use crate::render::{render_list, render_object, render_server_error, OutputFormat};

/// Everything a command needs, built once in `main`.
pub struct Context {
    /// Client for the agent named by `--address`.
    pub client: Arc<dyn SwitchAgentClient>,
    /// Output format.
    pub output: OutputFormat,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single object.
    #[command(subcommand)]
    Get(GetCommand),
    /// List objects.
    #[command(subcommand)]
    List(ListCommand),
    /// Change device state.
    #[command(subcommand)]
    Set(SetCommand),
}

/// `get` subcommands.
#[derive(Subcommand, Debug)]
pub enum GetCommand {
    /// Get switch device information.
    DeviceInfo,
    /// Get interface information.
    Interface {
        /// Interface name, e.g. Ethernet0.
        name: String,
    },
    /// Get the link-layer neighbor of an interface.
    InterfaceNeighbor {
        /// Interface name, e.g. Ethernet0.
        name: String,
    },
}

/// `list` subcommands.
#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List all interfaces.
    Interfaces,
    /// List all physical ports.
    Ports,
}

/// `set` subcommands.
#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Set the admin status of an interface.
    InterfaceStatus {
        /// Interface name, e.g. Ethernet0.
        name: String,
        /// Desired status: up or down.
        status: String,
    },
}

/// Run `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if the agent call fails, the agent reports a nonzero
/// status, or the arguments are invalid.
pub async fn run<W: Write>(ctx: &Context, command: Command, out: &mut W) -> anyhow::Result<()> {
    let format = ctx.output;
    let client = ctx.client.as_ref();

    match command {
        Command::Get(GetCommand::DeviceInfo) => {
            let device = check(out, client.get_device_info().await)
                .context("failed to get device info")?;
            render_object(out, format, "Device Info", &device)?;
        }
        Command::Get(GetCommand::Interface { name }) => {
            let iface = check(out, client.get_interface(&name).await)
                .context("failed to get interface info")?;
            render_object(out, format, "Interface Info", &iface)?;
        }
        Command::Get(GetCommand::InterfaceNeighbor { name }) => {
            let neighbor = check(out, client.get_interface_neighbor(&name).await)
                .context("failed to get interface neighbor info")?;
            render_object(out, format, "Interface Neighbor Info", &neighbor)?;
        }
        Command::List(ListCommand::Interfaces) => {
            let interfaces = check(out, client.list_interfaces().await)
                .context("failed to list interfaces")?;
            render_list(out, format, "Interfaces", &interfaces)?;
        }
        Command::List(ListCommand::Ports) => {
            let ports = check(out, client.list_ports().await).context("failed to list ports")?;
            render_list(out, format, "Ports", &ports)?;
        }
        Command::Set(SetCommand::InterfaceStatus { name, status }) => {
            let status: DeviceStatus = status.parse()?;
            writeln!(
                out,
                "Setting interface admin status to: {status} for interface: {name}"
            )?;
            let iface = check(out, client.set_interface_admin_status(&name, status).await)
                .context("failed to set interface admin status")?;
            render_object(
                out,
                format,
                "Interface admin status updated successfully",
                &iface,
            )?;
        }
    }

    Ok(())
}

/// Print the server error header for a nonzero agent status.
fn check<W: Write, T>(out: &mut W, result: switch_agent_client::Result<T>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(ClientError::Remote(status)) => {
            render_server_error(out, &status)?;
            Err(anyhow!("agent returned status {}", status.code))
        }
        Err(e) => Err(e.into()),
    }
}
