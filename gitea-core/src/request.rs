//! The immutable connection request handed to providers.

use crate::auth::Authentication;

/// A finalized description of how to reach a Gitea server.
///
/// Requests are produced by a builder, never mutated afterwards, and can be
/// cloned freely to resolve the same target again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    server_url: String,
    authentication: Authentication,
}

impl ConnectionRequest {
    /// Creates a request.
    ///
    /// `None` authentication resolves to anonymous access.
    ///
    /// # Panics
    ///
    /// Panics if `server_url` is empty or only whitespace. A request without
    /// a server address is a caller bug, not a runtime condition.
    pub fn new(server_url: impl Into<String>, authentication: Option<Authentication>) -> Self {
        let server_url = server_url.into();
        assert!(
            !server_url.trim().is_empty(),
            "Gitea server URL must not be empty"
        );

        Self {
            server_url,
            authentication: authentication.unwrap_or_default(),
        }
    }

    /// Returns the server URL exactly as configured.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns the authentication strategy.
    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }
}
