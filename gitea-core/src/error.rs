//! Connection error types.

use thiserror::Error;

/// Boxed error from a transport layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for resolving and using Gitea connections.
///
/// Failures raised by a provider pass through the resolver unchanged, so
/// every variant except [`ConnectError::NoProvider`] originates in a
/// provider or a live connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No installed provider accepted the request.
    #[error("No implementation for connecting to {server_url}")]
    NoProvider {
        /// The server that could not be reached.
        server_url: String,
    },

    /// The server URL could not be interpreted by the provider.
    #[error("Invalid server URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Network or TLS failure.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server rejected the credentials.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server answered with an unexpected status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The server answered with something that could not be parsed.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ConnectError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }

    /// Returns true if retrying the whole resolution might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
