//! Switch Agent CLI - query and control a switch agent.
//!
//! This is the entry point for the `agent-cli` binary.

mod commands;
mod render;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use switch_agent_client::HttpSwitchAgentClient;

use commands::{Command, Context};
use render::OutputFormat;

/// Command-line client for the switch agent.
#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent address (`host:port`).
    #[arg(long, global = true, env = "SWITCH_AGENT_ADDRESS")]
    address: Option<String>,

    /// Agent port used when no address is given.
    #[arg(long, global = true, env = "SWITCH_AGENT_PORT", default_value_t = 50051)]
    port: u16,

    /// Connect timeout in seconds.
    #[arg(long, global = true, default_value_t = 4)]
    connect_timeout: u64,

    /// Output format.
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable debug logging.
    #[arg(long, global = true, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn agent_address(&self) -> String {
        match &self.address {
            Some(address) if !address.is_empty() => address.clone(),
            _ => format!("localhost:{}", self.port),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("switch_agent_cli=debug,switch_agent_client=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let address = args.agent_address();
    tracing::debug!(address = %address, "Connecting to switch agent");
    let client = HttpSwitchAgentClient::new(&address, Duration::from_secs(args.connect_timeout))?;

    let ctx = Context {
        client: Arc::new(client),
        output: args.output,
    };

    let mut stdout = std::io::stdout().lock();
    commands::run(&ctx, args.command, &mut stdout).await
}
