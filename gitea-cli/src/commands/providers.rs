//! Providers command - list installed providers and how they rank.

use std::fmt::Write as _;

use anyhow::Result;
use gitea_connect::{GlobalRegistry, Resolver};
use gitea_core::Authentication;
use tracing::{debug, info};

use crate::{Cli, OutputFormat};

/// Arguments for the providers command.
#[derive(clap::Args, Default)]
pub struct ProvidersArgs {
    /// Server URL to rank providers against (defaults to the configured server).
    #[arg(long, short)]
    pub url: Option<String>,
}

/// Runs the providers command.
pub fn run(args: &ProvidersArgs, cli: &Cli) -> Result<()> {
    print!("{}", render(args, cli)?);
    Ok(())
}

/// Produces the providers command output.
pub fn render(args: &ProvidersArgs, cli: &Cli) -> Result<String> {
    let config = cli.load_config()?;
    super::install_configured_http(&config);

    let mut out = String::new();
    let target = args.url.as_deref().or(config.server.url.as_deref());
    let Some(url) = target else {
        info!("Listing providers");
        let ids = GlobalRegistry::ids();
        match cli.format {
            OutputFormat::Text => {
                for id in &ids {
                    writeln!(out, "{id}")?;
                }
                writeln!(out)?;
                writeln!(out, "Total: {} providers", ids.len())?;
            }
            OutputFormat::Json => writeln!(out, "{}", cli.to_json(&ids)?)?,
        }
        return Ok(out);
    };

    info!(server = %url, "Ranking providers");
    // Ranking never sends credentials; incomplete ones fall back to anonymous.
    let auth = config.auth.resolve().unwrap_or_else(|e| {
        debug!(error = %e, "Configured auth unavailable, ranking anonymously");
        Authentication::none()
    });
    let request = config.connection_builder_with(Some(url), Some(auth))?.build();
    let selection = Resolver::new(&GlobalRegistry).select(&request);

    match cli.format {
        OutputFormat::Text => {
            writeln!(out, "{:<20} {:<10} {:>10}", "PROVIDER", "ELIGIBLE", "PRIORITY")?;
            writeln!(out, "{}", "─".repeat(42))?;
            for probe in selection.probes() {
                let priority = probe
                    .priority
                    .map_or_else(|| "-".to_string(), |p| p.to_string());
                let eligible = if probe.eligible { "yes" } else { "no" };
                writeln!(out, "{:<20} {:<10} {:>10}", probe.id, eligible, priority)?;
            }
            writeln!(out)?;
            match selection.factory_id() {
                Some(id) => writeln!(out, "Selected: {id}")?,
                None => writeln!(out, "Selected: none (no provider can connect to {url})")?,
            }
        }
        OutputFormat::Json => writeln!(out, "{}", cli.to_json(&selection.report())?)?,
    }

    Ok(out)
}
