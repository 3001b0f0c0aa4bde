//! OSC Checker entry point.
//!
//! A headless front end over the command bridge in
//! `infrastructure::ui_bridge`.  Each subcommand maps onto one operator
//! action from the interactive tool.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()           -- TOML file, or built-in defaults if absent
//!  └─ tracing_subscriber      -- RUST_LOG, else app.log_level
//!  └─ AppState::new()         -- targets, history, message log, listener
//!  └─ subcommand
//!       ├─ targets  -> list_targets
//!       ├─ send     -> update_target (overrides) + send_target
//!       └─ listen   -> start_receiving ... Ctrl-C ... stop_receiving
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use osc_checker::infrastructure::storage::config::{load_config, DEFAULT_CONFIG_FILE};
use osc_checker::infrastructure::ui_bridge::{
    self, AppState, ArgumentDto, CommandResult, TargetDto,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Send and watch Open Sound Control messages.
#[derive(Debug, Parser)]
#[command(name = "osc-checker", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    ///
    /// A missing file is not an error: the built-in defaults are used.
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE, env = "OSC_CHECKER_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the configured send targets and their arguments.
    Targets,
    /// Send one message to a configured target.
    Send(SendArgs),
    /// Receive on a local port and print each message until Ctrl-C.
    Listen(ListenArgs),
}

#[derive(Debug, Args)]
struct SendArgs {
    /// Name of the configured target (defaults to the first one).
    #[arg(long, short)]
    target: Option<String>,

    /// Override the target host.
    #[arg(long)]
    host: Option<String>,

    /// Override the target port.
    #[arg(long)]
    port: Option<String>,

    /// Override the OSC address, e.g. `/mixer/fader`.
    #[arg(long)]
    address: Option<String>,

    /// Replace the configured arguments, e.g. `--arg int:42 --arg string:hi`.
    #[arg(long = "arg", value_name = "TYPE:VALUE", value_parser = parse_arg_pair)]
    args: Vec<ArgumentDto>,
}

#[derive(Debug, Args)]
struct ListenArgs {
    /// Local UDP port (defaults to `receiver.default_port`).
    #[arg(long, short)]
    port: Option<String>,

    /// Only print messages whose address matches: `/prefix*` or a substring.
    #[arg(long, short, default_value = "")]
    filter: String,
}

/// Parses `TYPE:VALUE`.  Only the first `:` separates, so string values may
/// contain colons.
fn parse_arg_pair(text: &str) -> Result<ArgumentDto, String> {
    let (kind, value) = text
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:VALUE, got {text:?}"))?;
    kind.parse::<osc_core::ArgKind>().map_err(|e| e.to_string())?;
    Ok(ArgumentDto {
        kind: kind.to_string(),
        value: value.to_string(),
        description: None,
    })
}

/// Turns a failed command into an error for `main` to return.
fn into_result<T: serde::Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    match (result.data, result.error) {
        (Some(data), _) if result.success => Ok(data),
        (_, Some(error)) => Err(anyhow::anyhow!(error)),
        _ => Err(anyhow::anyhow!("command returned no data")),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level)),
        )
        .init();

    info!("{} {} starting", config.app.name, config.app.version);

    let state = AppState::new(&config);

    match cli.command {
        Command::Targets => print_targets(state).await,
        Command::Send(args) => send(state, args).await,
        Command::Listen(args) => listen(state, args).await,
    }
}

async fn print_targets(state: Arc<AppState>) -> anyhow::Result<()> {
    for target in into_result(ui_bridge::list_targets(state).await)? {
        println!(
            "{}  {}:{} {}",
            target.name, target.host, target.port, target.address
        );
        for (i, arg) in target.arguments.iter().enumerate() {
            match &arg.description {
                Some(d) => println!("    [{i}] {}:{}  ({d})", arg.kind, arg.value),
                None => println!("    [{i}] {}:{}", arg.kind, arg.value),
            }
        }
    }
    Ok(())
}

async fn send(state: Arc<AppState>, args: SendArgs) -> anyhow::Result<()> {
    let targets = into_result(ui_bridge::list_targets(Arc::clone(&state)).await)?;
    let mut target: TargetDto = match &args.target {
        Some(name) => targets
            .into_iter()
            .find(|t| &t.name == name)
            .with_context(|| format!("no send target named {name:?}"))?,
        None => targets
            .into_iter()
            .next()
            .context("no send targets configured")?,
    };

    if let Some(host) = args.host {
        target.host = host;
    }
    if let Some(port) = args.port {
        target.port = port;
    }
    if let Some(address) = args.address {
        target.address = address;
    }
    if !args.args.is_empty() {
        target.arguments = args.args;
    }

    let name = target.name.clone();
    into_result(ui_bridge::update_target(Arc::clone(&state), target).await)?;
    let line = into_result(ui_bridge::send_target(state, &name).await)?;
    println!("{line}");
    Ok(())
}

async fn listen(state: Arc<AppState>, args: ListenArgs) -> anyhow::Result<()> {
    let port = args.port.unwrap_or_else(|| state.default_port.to_string());
    let filter = osc_core::AddressFilter::parse(&args.filter);

    let status = into_result(
        ui_bridge::start_receiving(Arc::clone(&state), &port, move |message| {
            if filter.matches(&message.address) {
                println!("{message}");
            }
        })
        .await,
    )?;
    if let Some(port) = status.port {
        println!("Receiving on 127.0.0.1:{port}.  Press Ctrl-C to stop.");
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("shutdown signal received");

    let status = into_result(ui_bridge::stop_receiving(state).await)?;
    println!("Stopped.  {} message(s) in log.", status.received_count);
    Ok(())
}
