//! Connection factory trait and types.
//!
//! A factory represents one way of opening a connection to a Gitea server.
//! Several factories can be installed at once (different transports,
//! different authentication capabilities); the resolver asks each whether
//! it can handle a request and picks the one with the highest priority.

use async_trait::async_trait;
use gitea_core::{ConnectError, ConnectionRequest, GiteaConnection};
use serde::Serialize;

// ============================================================================
// Connection Factory Trait
// ============================================================================

/// A pluggable provider of Gitea connections.
///
/// ## Implementing a Factory
///
/// ```ignore
/// struct SshTunnelFactory;
///
/// #[async_trait]
/// impl ConnectionFactory for SshTunnelFactory {
///     fn id(&self) -> &str {
///         "ssh-tunnel"
///     }
///
///     fn can_open(&self, request: &ConnectionRequest) -> bool {
///         request.server_url().starts_with("ssh+https://")
///     }
///
///     fn priority(&self, _request: &ConnectionRequest) -> i64 {
///         50
///     }
///
///     async fn open(
///         &self,
///         request: &ConnectionRequest,
///     ) -> Result<Box<dyn GiteaConnection>, ConnectError> {
///         // Establish the tunnel and return the connection
///     }
/// }
/// ```
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    /// Unique identifier for this factory (e.g., "http").
    fn id(&self) -> &str;

    /// Whether this factory can service the request.
    ///
    /// Must be pure and cheap. A factory that answers `false` is never asked
    /// for its priority and never opened for this request.
    fn can_open(&self, request: &ConnectionRequest) -> bool;

    /// How well suited this factory is (higher wins).
    ///
    /// Only called after [`ConnectionFactory::can_open`] returned `true`.
    fn priority(&self, request: &ConnectionRequest) -> i64;

    /// Opens a connection for the request.
    ///
    /// May perform network I/O. Errors are returned to the caller unchanged.
    async fn open(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Box<dyn GiteaConnection>, ConnectError>;
}

// ============================================================================
// Factory Info
// ============================================================================

/// Information about a factory evaluated against one request (for reporting).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryInfo {
    /// Factory ID.
    pub id: String,
    /// Whether the factory accepted the request.
    pub eligible: bool,
    /// Priority, present only for eligible factories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl FactoryInfo {
    /// Probes a factory against a request.
    pub fn probe(factory: &dyn ConnectionFactory, request: &ConnectionRequest) -> Self {
        let eligible = factory.can_open(request);
        Self {
            id: factory.id().to_string(),
            eligible,
            priority: eligible.then(|| factory.priority(request)),
        }
    }
}
