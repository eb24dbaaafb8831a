//! Check command - open a connection and query the server version.

use std::fmt::Write as _;

use anyhow::Result;
use gitea_core::Authentication;
use serde::Serialize;
use tracing::{debug, info};

use crate::{Cli, OutputFormat};

/// Arguments for the check command.
#[derive(clap::Args, Default)]
pub struct CheckArgs {
    /// Server URL (defaults to the configured server).
    #[arg(long, short)]
    pub url: Option<String>,

    /// Personal access token (overrides configured auth).
    #[arg(long, conflicts_with_all = ["user", "password"])]
    pub token: Option<String>,

    /// Username for basic auth (overrides configured auth).
    #[arg(long, requires = "password")]
    pub user: Option<String>,

    /// Password for basic auth.
    #[arg(long, requires = "user")]
    pub password: Option<String>,

    /// Only open the connection; do not contact the server.
    #[arg(long)]
    pub no_probe: bool,
}

impl CheckArgs {
    /// Returns the authentication given on the command line, if any.
    fn authentication(&self) -> Option<Authentication> {
        if let Some(token) = &self.token {
            return Some(Authentication::token(token.clone()));
        }
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => {
                Some(Authentication::basic(user.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

/// JSON output for the check command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    server: String,
    provider: String,
    auth: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Runs the check command.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<()> {
    print!("{}", render(args, cli).await?);
    Ok(())
}

/// Produces the check command output.
///
/// Command-line credentials replace the configured ones, which are then
/// never resolved.
pub async fn render(args: &CheckArgs, cli: &Cli) -> Result<String> {
    let config = cli.load_config()?;
    super::install_configured_http(&config);

    let cli_auth = args.authentication();
    if let Some(auth) = &cli_auth {
        debug!(scheme = %auth.scheme(), "Using command-line authentication");
    }
    let builder = config.connection_builder_with(args.url.as_deref(), cli_auth)?;

    info!(server = %builder.server_url(), "Opening connection");
    let connection = builder.open().await?;

    let version = if args.no_probe {
        None
    } else {
        Some(connection.server_version().await?)
    };

    let output = CheckOutput {
        server: connection.server_url().to_string(),
        provider: connection.provider_id().to_string(),
        auth: builder.auth().scheme().to_string(),
        version,
    };

    let mut out = String::new();
    match cli.format {
        OutputFormat::Text => {
            writeln!(out, "Server:   {}", output.server)?;
            writeln!(out, "Provider: {}", output.provider)?;
            writeln!(out, "Auth:     {}", output.auth)?;
            if let Some(version) = &output.version {
                writeln!(out, "Version:  {version}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", cli.to_json(&output)?)?,
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Commands;
    use crate::commands::test_support::write_config;
    use clap::Parser;

    fn check_args(cli: &Cli) -> &CheckArgs {
        match &cli.command {
            Commands::Check(args) => args,
            _ => panic!("expected check command"),
        }
    }

    #[test]
    fn test_token_wins() {
        let args = CheckArgs {
            token: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(args.authentication(), Some(Authentication::token("abc")));
    }

    #[test]
    fn test_basic_needs_both_parts() {
        let partial = CheckArgs {
            user: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(partial.authentication(), None);

        let full = CheckArgs {
            user: Some("alice".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        assert_eq!(
            full.authentication(),
            Some(Authentication::basic("alice", "pw"))
        );
    }

    #[tokio::test]
    async fn test_flag_token_skips_configured_auth() {
        let (_dir, path) = write_config(
            "[auth]\ntype = \"token\"\ntoken_env = \"GITEA_CONNECT_TEST_UNSET_TOKEN\"\n",
        );
        let cli = Cli::parse_from([
            "gitea-connect",
            "--config",
            path.to_str().unwrap(),
            "--format",
            "json",
            "check",
            "--url",
            "https://gitea.example.com",
            "--token",
            "abc",
            "--no-probe",
        ]);

        let out = render(check_args(&cli), &cli).await.unwrap();
        let output: serde_json::Value = serde_json::from_str(out.trim()).unwrap();

        assert_eq!(output["server"], "https://gitea.example.com");
        assert_eq!(output["provider"], "http");
        assert_eq!(output["auth"], "token");
        assert!(output.get("version").is_none());
    }

    #[tokio::test]
    async fn test_configured_auth_still_required_without_flags() {
        let (_dir, path) = write_config(
            "[auth]\ntype = \"token\"\ntoken_env = \"GITEA_CONNECT_TEST_UNSET_TOKEN\"\n",
        );
        let cli = Cli::parse_from([
            "gitea-connect",
            "--config",
            path.to_str().unwrap(),
            "check",
            "--url",
            "https://gitea.example.com",
            "--no-probe",
        ]);

        let err = render(check_args(&cli), &cli).await.unwrap_err();

        assert!(err.to_string().contains("auth.token"));
    }

    #[tokio::test]
    async fn test_text_output_uses_configured_server() {
        let (_dir, path) = write_config(
            "[server]\nurl = \"http://localhost:3000\"\n\n[auth]\ntype = \"basic\"\nusername = \"alice\"\npassword = \"pw\"\n",
        );
        let cli = Cli::parse_from([
            "gitea-connect",
            "--config",
            path.to_str().unwrap(),
            "check",
            "--no-probe",
        ]);

        let out = render(check_args(&cli), &cli).await.unwrap();

        assert!(out.contains("Server:   http://localhost:3000"));
        assert!(out.contains("Provider: http"));
        assert!(out.contains("Auth:     basic"));
        assert!(!out.contains("Version:"));
    }
}
