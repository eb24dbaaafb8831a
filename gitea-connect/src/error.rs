//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No server URL in the file or on the command line.
    #[error("No Gitea server URL configured")]
    MissingServerUrl,

    /// A credential the auth type needs is not set.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The auth type is not one of none, token, basic.
    #[error("Unknown auth type: {0}")]
    UnknownAuthType(String),
}
