//! Config command - show the effective configuration.

use std::fmt::Write as _;

use anyhow::Result;

use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(clap::Args, Default)]
pub struct ConfigArgs {
    /// Print only the configuration file path.
    #[arg(long)]
    pub path: bool,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    print!("{}", render(args, cli)?);
    Ok(())
}

/// Produces the config command output.
pub fn render(args: &ConfigArgs, cli: &Cli) -> Result<String> {
    let path = cli.config_path();
    let mut out = String::new();

    if args.path {
        writeln!(out, "{}", path.display())?;
        return Ok(out);
    }

    let config = cli.load_config()?.redacted();
    match cli.format {
        OutputFormat::Text => {
            writeln!(out, "# {}", path.display())?;
            out.push_str(&toml::to_string_pretty(&config)?);
        }
        OutputFormat::Json => writeln!(out, "{}", cli.to_json(&config)?)?,
    }

    Ok(out)
}
