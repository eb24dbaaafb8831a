// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! gitea-connect CLI - resolve and open Gitea connections from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List installed connection providers
//! gitea-connect providers
//!
//! # Show how providers rank for a server
//! gitea-connect providers --url https://gitea.example.com
//!
//! # Open a connection and print the server version
//! gitea-connect check --url https://gitea.example.com --token "$GITEA_TOKEN"
//!
//! # Show the effective configuration
//! gitea-connect config
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gitea_connect::Config;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{check, config, providers};

// ============================================================================
// CLI Definition
// ============================================================================

/// gitea-connect CLI - Gitea connection resolution.
#[derive(Parser)]
#[command(name = "gitea-connect")]
#[command(about = "Resolve and open connections to Gitea servers")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List installed connection providers.
    #[command(visible_alias = "p")]
    Providers(providers::ProvidersArgs),

    /// Open a connection and query the server version.
    #[command(visible_alias = "c")]
    Check(check::CheckArgs),

    /// Show configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// No provider could handle the request.
    ProviderMissing = 2,
}

impl Cli {
    /// Returns the configuration file path in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads the configuration file in effect.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load_from(&self.config_path())?)
    }

    /// Serializes a value as JSON, honoring `--pretty`.
    pub fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("gitea_connect=debug,info")
    } else {
        EnvFilter::new("gitea_connect=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Providers(args) => providers::run(args, &cli),
        Commands::Check(args) => check::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        let code = match e.downcast_ref::<gitea_core::ConnectError>() {
            Some(gitea_core::ConnectError::NoProvider { .. }) => ExitCode::ProviderMissing,
            _ => ExitCode::Error,
        };
        std::process::exit(code as i32);
    }

    Ok(())
}
