// crates/audit-toolbox-cli/src/main.rs
// ============================================================================
// Module: Audit Toolbox CLI Entry Point
// Description: Command dispatcher for running the gateway server.
// Purpose: Load configuration, assemble gateway state, and serve.
// Dependencies: audit-toolbox-mcp, axum, clap, thiserror, tokio
// ============================================================================

//! ## Overview
//! The Audit Toolbox CLI starts the gateway: it loads the TOML configuration
//! (explicit path, default file, or built-in defaults), assembles gateway
//! state with a stderr audit sink, spawns the limiter sweeper, and serves
//! until interrupted. Security posture: the configuration file is the only
//! trusted input; everything arriving on the listening socket is untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use audit_toolbox_mcp::GatewayConfig;
use audit_toolbox_mcp::NoopMetrics;
use audit_toolbox_mcp::WriterAuditSink;
use audit_toolbox_mcp::build_gateway_router;
use audit_toolbox_mcp::build_gateway_state;
use audit_toolbox_mcp::run_limiter_sweeper;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config file consulted when no explicit path is given.
const DEFAULT_CONFIG_PATH: &str = "audit-toolbox.toml";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "audit-toolbox", disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Audit Toolbox gateway server.
    Serve(ServeCommand),
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to audit-toolbox.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a human-readable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
    }
}

/// Prints a fatal error to stderr and returns the failure exit code.
#[allow(clippy::print_stderr, reason = "Fatal errors must reach the operator before exit.")]
fn emit_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::FAILURE
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = load_config(command.config.as_deref())?;
    if let Some(bind) = command.bind {
        config.server.bind_addr = bind;
    }

    let audit = Arc::new(WriterAuditSink::new(std::io::stderr()));
    let state = build_gateway_state(&config, audit, Arc::new(NoopMetrics))
        .map_err(|err| CliError::new(format!("failed to assemble gateway: {err}")))?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .map_err(|err| {
            CliError::new(format!("failed to bind {}: {err}", config.server.bind_addr))
        })?;
    let sweeper = tokio::spawn(run_limiter_sweeper(Arc::clone(&state)));

    let router = build_gateway_router(state);
    let result = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await;
    sweeper.abort();
    result.map_err(|err| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

/// Loads gateway configuration: an explicit path must exist; otherwise the
/// default file is used when present, and built-in defaults when not.
fn load_config(path: Option<&Path>) -> CliResult<GatewayConfig> {
    if let Some(path) = path {
        return GatewayConfig::from_toml_path(path)
            .map_err(|err| CliError::new(err.to_string()));
    }
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        return GatewayConfig::from_toml_path(default_path)
            .map_err(|err| CliError::new(err.to_string()));
    }
    Ok(GatewayConfig::default())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
