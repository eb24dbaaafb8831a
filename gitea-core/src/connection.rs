//! Live connection trait.

use async_trait::async_trait;

use crate::error::ConnectError;

/// A live connection to a Gitea server, produced by a provider.
///
/// The caller owns the connection; the resolver keeps no reference to it.
#[async_trait]
pub trait GiteaConnection: Send + Sync {
    /// The server this connection talks to.
    fn server_url(&self) -> &str;

    /// Identifier of the provider that opened this connection.
    fn provider_id(&self) -> &str;

    /// Asks the server for its version string.
    async fn server_version(&self) -> Result<String, ConnectError>;
}

impl std::fmt::Debug for dyn GiteaConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiteaConnection")
            .field("server_url", &self.server_url())
            .field("provider_id", &self.provider_id())
            .finish()
    }
}
