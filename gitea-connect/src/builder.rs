//! Fluent builder for Gitea connections.

use gitea_core::{Authentication, ConnectError, ConnectionRequest, GiteaConnection};

use crate::registry::{FactoryRegistry, GlobalRegistry};
use crate::resolver::Resolver;

/// Builds a [`ConnectionRequest`] and resolves it into a live connection.
///
/// ```ignore
/// use gitea_connect::ConnectionBuilder;
/// use gitea_core::Authentication;
///
/// let connection = ConnectionBuilder::new("https://gitea.example.com")
///     .authentication(Authentication::token("abc123"))
///     .open()
///     .await?;
/// println!("Gitea {}", connection.server_version().await?);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    server_url: String,
    authentication: Authentication,
}

impl ConnectionBuilder {
    /// Creates a builder for the given server with anonymous access.
    ///
    /// # Panics
    ///
    /// Panics if `server_url` is empty or only whitespace.
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        assert!(
            !server_url.trim().is_empty(),
            "Gitea server URL must not be empty"
        );

        Self {
            server_url,
            authentication: Authentication::none(),
        }
    }

    /// Alias for [`ConnectionBuilder::new`].
    pub fn new_builder(server_url: impl Into<String>) -> Self {
        Self::new(server_url)
    }

    /// Replaces the authentication strategy.
    ///
    /// `None` resets to anonymous access.
    #[must_use]
    pub fn authentication(mut self, authentication: impl Into<Option<Authentication>>) -> Self {
        self.authentication = authentication.into().unwrap_or_default();
        self
    }

    /// Returns the configured server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Returns the configured authentication strategy.
    pub fn auth(&self) -> &Authentication {
        &self.authentication
    }

    /// Finalizes the configuration into an immutable request.
    pub fn build(&self) -> ConnectionRequest {
        ConnectionRequest::new(self.server_url.clone(), Some(self.authentication.clone()))
    }

    /// Opens a connection using the process-wide registry.
    pub async fn open(&self) -> Result<Box<dyn GiteaConnection>, ConnectError> {
        self.open_with(&GlobalRegistry).await
    }

    /// Opens a connection using the given registry.
    pub async fn open_with(
        &self,
        registry: &dyn FactoryRegistry,
    ) -> Result<Box<dyn GiteaConnection>, ConnectError> {
        let request = self.build();
        Resolver::new(registry).resolve(&request).await
    }
}
