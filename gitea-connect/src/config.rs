//! Configuration management.
//!
//! The configuration file is TOML and lives at
//! `<config_dir>/gitea-connect/config.toml` by default:
//!
//! ```toml
//! [server]
//! url = "https://gitea.example.com"
//!
//! [auth]
//! type = "token"
//! token_env = "GITEA_TOKEN"
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! Secrets can be given inline or through environment variables; the
//! environment wins when both are set.

use gitea_core::Authentication;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::builder::ConnectionBuilder;
use crate::error::ConfigError;

/// User agent string for gitea-connect.
pub const USER_AGENT: &str = concat!("gitea-connect/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Placeholder shown instead of secrets.
const REDACTED: &str = "<redacted>";

// ============================================================================
// Connect Settings
// ============================================================================

/// Settings for HTTP connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    /// Timeout for each request.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ConnectSettings {
    /// Creates settings with a custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// File Configuration
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the Gitea server.
    pub url: Option<String>,
}

/// Which authentication strategy to build.
///
/// Stored as a plain string in the file. Names other than `none`, `token`
/// and `basic` are kept as [`AuthType::Unknown`] and rejected when the
/// configuration is loaded or resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthType {
    /// Anonymous access.
    #[default]
    None,
    /// Personal access token.
    Token,
    /// Username and password.
    Basic,
    /// Unrecognized type name.
    Unknown(String),
}

impl AuthType {
    /// Returns the name used in the configuration file.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Token => "token",
            Self::Basic => "basic",
            Self::Unknown(name) => name,
        }
    }
}

impl From<String> for AuthType {
    fn from(name: String) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "token" => Self::Token,
            "basic" => Self::Basic,
            _ => Self::Unknown(name),
        }
    }
}

impl From<AuthType> for String {
    fn from(kind: AuthType) -> Self {
        kind.as_str().to_string()
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Strategy to use.
    #[serde(rename = "type", default)]
    pub kind: AuthType,
    /// Inline token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Environment variable holding the token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    /// Username for basic auth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Inline password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Environment variable holding the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

/// HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent override.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl AuthConfig {
    /// Picks the environment value over the inline one.
    fn secret(
        inline: Option<&String>,
        env_name: Option<&String>,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        env_name
            .and_then(|name| lookup(name.as_str()))
            .or_else(|| inline.cloned())
    }

    /// Builds the authentication strategy, reading environment variables
    /// through `lookup`.
    pub fn resolve_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Authentication, ConfigError> {
        match &self.kind {
            AuthType::Unknown(name) => Err(ConfigError::UnknownAuthType(name.clone())),
            AuthType::None => Ok(Authentication::none()),
            AuthType::Token => {
                let token = Self::secret(self.token.as_ref(), self.token_env.as_ref(), &lookup)
                    .ok_or_else(|| ConfigError::MissingCredential("auth.token".to_string()))?;
                Ok(Authentication::token(token))
            }
            AuthType::Basic => {
                let username = self
                    .username
                    .clone()
                    .ok_or_else(|| ConfigError::MissingCredential("auth.username".to_string()))?;
                let password =
                    Self::secret(self.password.as_ref(), self.password_env.as_ref(), &lookup)
                        .ok_or_else(|| {
                            ConfigError::MissingCredential("auth.password".to_string())
                        })?;
                Ok(Authentication::basic(username, password))
            }
        }
    }

    /// Builds the authentication strategy from the process environment.
    pub fn resolve(&self) -> Result<Authentication, ConfigError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gitea-connect")
            .join("config.toml")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if let AuthType::Unknown(name) = &config.auth.kind {
            return Err(ConfigError::UnknownAuthType(name.clone()));
        }

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Returns the HTTP settings.
    pub fn settings(&self) -> ConnectSettings {
        ConnectSettings {
            timeout: Duration::from_secs(self.http.timeout_secs),
            user_agent: self.http.user_agent.clone(),
        }
    }

    /// Creates a connection builder from the configured server and auth.
    ///
    /// `server_override` takes precedence over `server.url`.
    pub fn connection_builder(
        &self,
        server_override: Option<&str>,
    ) -> Result<ConnectionBuilder, ConfigError> {
        self.connection_builder_with(server_override, None)
    }

    /// Creates a connection builder, optionally with explicit authentication.
    ///
    /// The `[auth]` section is only resolved when `auth_override` is `None`,
    /// so incomplete configured credentials do not block an override.
    pub fn connection_builder_with(
        &self,
        server_override: Option<&str>,
        auth_override: Option<Authentication>,
    ) -> Result<ConnectionBuilder, ConfigError> {
        let url = server_override
            .or(self.server.url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingServerUrl)?;

        let auth = match auth_override {
            Some(auth) => auth,
            None => self.auth.resolve()?,
        };
        Ok(ConnectionBuilder::new(url).authentication(auth))
    }

    /// Returns a copy with inline secrets replaced, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.token.is_some() {
            copy.auth.token = Some(REDACTED.to_string());
        }
        if copy.auth.password.is_some() {
            copy.auth.password = Some(REDACTED.to_string());
        }
        copy
    }
}

// ============================================================================
// Tests
// ============================================================================
