//! Resolver for choosing a connection factory.
//!
//! The resolver takes a snapshot of installed factories, keeps those that
//! accept the request, and opens a connection with the highest-priority one.
//! Ties go to the factory seen first in registry order. A failure from the
//! chosen factory is final; the resolver never falls back to the runner-up.

use std::sync::Arc;

use gitea_core::{ConnectError, ConnectionRequest, GiteaConnection};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::factory::{ConnectionFactory, FactoryInfo};
use crate::registry::FactoryRegistry;

// ============================================================================
// Selection
// ============================================================================

/// The outcome of probing every installed factory against a request.
pub struct Selection {
    chosen: Option<(Arc<dyn ConnectionFactory>, i64)>,
    probes: Vec<FactoryInfo>,
}

impl Selection {
    /// Returns the chosen factory, if any accepted the request.
    pub fn factory(&self) -> Option<&Arc<dyn ConnectionFactory>> {
        self.chosen.as_ref().map(|(factory, _)| factory)
    }

    /// Returns the chosen factory's ID.
    pub fn factory_id(&self) -> Option<&str> {
        self.factory().map(|f| f.id())
    }

    /// Returns the winning priority.
    pub fn priority(&self) -> Option<i64> {
        self.chosen.as_ref().map(|(_, priority)| *priority)
    }

    /// Returns one record per factory, in probe order.
    pub fn probes(&self) -> &[FactoryInfo] {
        &self.probes
    }

    /// Returns the number of factories that accepted the request.
    pub fn eligible_count(&self) -> usize {
        self.probes.iter().filter(|p| p.eligible).count()
    }

    /// Returns a serializable summary.
    pub fn report(&self) -> SelectionReport {
        SelectionReport {
            selected: self.factory_id().map(str::to_string),
            priority: self.priority(),
            probes: self.probes.clone(),
        }
    }
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("selected", &self.factory_id())
            .field("priority", &self.priority())
            .field("probes", &self.probes)
            .finish()
    }
}

/// Serializable form of a [`Selection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    /// ID of the chosen factory.
    pub selected: Option<String>,
    /// Winning priority.
    pub priority: Option<i64>,
    /// Per-factory probe results.
    pub probes: Vec<FactoryInfo>,
}

// ============================================================================
// Resolver
// ============================================================================

/// Chooses and invokes a connection factory for a request.
pub struct Resolver<'a> {
    registry: &'a dyn FactoryRegistry,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given registry.
    pub fn new(registry: &'a dyn FactoryRegistry) -> Self {
        Self { registry }
    }

    /// Probes every factory and picks the best one without opening it.
    #[instrument(skip(self, request), fields(server = %request.server_url()))]
    pub fn select(&self, request: &ConnectionRequest) -> Selection {
        let factories = self.registry.factories();
        let mut probes = Vec::with_capacity(factories.len());
        let mut chosen: Option<(Arc<dyn ConnectionFactory>, i64)> = None;

        debug!(count = factories.len(), "Probing connection factories");

        for factory in factories {
            let info = FactoryInfo::probe(factory.as_ref(), request);
            let Some(priority) = info.priority else {
                debug!(factory = %info.id, "Factory declined request");
                probes.push(info);
                continue;
            };

            debug!(factory = %info.id, priority, "Factory accepted request");
            probes.push(info);

            // Strict comparison keeps the earliest factory on ties.
            let better = match &chosen {
                None => true,
                Some((_, best)) => priority > *best,
            };
            if better {
                chosen = Some((factory, priority));
            }
        }

        Selection { chosen, probes }
    }

    /// Opens a connection with the best factory.
    ///
    /// Returns [`ConnectError::NoProvider`] if no factory accepts the
    /// request. Otherwise returns whatever the chosen factory returns.
    #[instrument(skip(self, request), fields(server = %request.server_url()))]
    pub async fn resolve(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Box<dyn GiteaConnection>, ConnectError> {
        let selection = self.select(request);

        let Some((factory, priority)) = selection.chosen else {
            warn!(
                probed = selection.probes.len(),
                "No connection factory accepted request"
            );
            return Err(ConnectError::NoProvider {
                server_url: request.server_url().to_string(),
            });
        };

        info!(factory = %factory.id(), priority, "Opening connection");
        factory.open(request).await
    }
}

impl std::fmt::Debug for Resolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SERVER: &str = "https://gitea.example.com";

    #[derive(Default)]
    struct Calls {
        can_open: AtomicUsize,
        priority: AtomicUsize,
        open: AtomicUsize,
    }

    struct MockFactory {
        id: &'static str,
        eligible: bool,
        priority: i64,
        fail_with: Option<fn() -> ConnectError>,
        calls: Arc<Calls>,
    }

    impl MockFactory {
        fn new(id: &'static str, eligible: bool, priority: i64) -> Self {
            Self {
                id,
                eligible,
                priority,
                fail_with: None,
                calls: Arc::new(Calls::default()),
            }
        }

        fn failing(mut self, err: fn() -> ConnectError) -> Self {
            self.fail_with = Some(err);
            self
        }

        fn calls(&self) -> Arc<Calls> {
            Arc::clone(&self.calls)
        }
    }

    struct MockConnection {
        server_url: String,
        provider_id: String,
    }

    #[async_trait]
    impl GiteaConnection for MockConnection {
        fn server_url(&self) -> &str {
            &self.server_url
        }

        fn provider_id(&self) -> &str {
            &self.provider_id
        }

        async fn server_version(&self) -> Result<String, ConnectError> {
            Ok("1.21.0".to_string())
        }
    }

    #[async_trait]
    impl ConnectionFactory for MockFactory {
        fn id(&self) -> &str {
            self.id
        }

        fn can_open(&self, _request: &ConnectionRequest) -> bool {
            self.calls.can_open.fetch_add(1, Ordering::SeqCst);
            self.eligible
        }

        fn priority(&self, _request: &ConnectionRequest) -> i64 {
            self.calls.priority.fetch_add(1, Ordering::SeqCst);
            self.priority
        }

        async fn open(
            &self,
            request: &ConnectionRequest,
        ) -> Result<Box<dyn GiteaConnection>, ConnectError> {
            self.calls.open.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_with {
                return Err(err());
            }
            Ok(Box::new(MockConnection {
                server_url: request.server_url().to_string(),
                provider_id: self.id.to_string(),
            }))
        }
    }

    fn request() -> ConnectionRequest {
        ConnectionRequest::new(SERVER, None)
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let registry = StaticRegistry::new();
        let err = Resolver::new(&registry)
            .resolve(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectError::NoProvider { .. }));
        assert!(err.to_string().contains(SERVER));
    }

    #[tokio::test]
    async fn test_no_eligible_factory_never_opens() {
        let a = MockFactory::new("a", false, 100);
        let b = MockFactory::new("b", false, 5);
        let (a_calls, b_calls) = (a.calls(), b.calls());
        let registry = StaticRegistry::new().with(a).with(b);

        let err = Resolver::new(&registry)
            .resolve(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectError::NoProvider { ref server_url } if server_url == SERVER));
        for calls in [a_calls, b_calls] {
            assert_eq!(calls.can_open.load(Ordering::SeqCst), 1);
            assert_eq!(calls.priority.load(Ordering::SeqCst), 0);
            assert_eq!(calls.open.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_single_eligible_opened_once() {
        let only = MockFactory::new("only", true, 1);
        let calls = only.calls();
        let registry = StaticRegistry::new().with(only);

        let connection = Resolver::new(&registry).resolve(&request()).await.unwrap();

        assert_eq!(connection.provider_id(), "only");
        assert_eq!(connection.server_url(), SERVER);
        assert_eq!(calls.open.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_highest_priority_wins() {
        let registry = StaticRegistry::new()
            .with(MockFactory::new("a", true, 10))
            .with(MockFactory::new("b", true, 20));

        let connection = Resolver::new(&registry).resolve(&request()).await.unwrap();
        assert_eq!(connection.provider_id(), "b");
    }

    #[test]
    fn test_highest_priority_wins_in_any_order() {
        let forward = StaticRegistry::new()
            .with(MockFactory::new("low", true, 1))
            .with(MockFactory::new("mid", true, 5))
            .with(MockFactory::new("high", true, 9));
        let reverse = StaticRegistry::new()
            .with(MockFactory::new("high", true, 9))
            .with(MockFactory::new("mid", true, 5))
            .with(MockFactory::new("low", true, 1));

        assert_eq!(Resolver::new(&forward).select(&request()).factory_id(), Some("high"));
        assert_eq!(Resolver::new(&reverse).select(&request()).factory_id(), Some("high"));
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let ab = StaticRegistry::new()
            .with(MockFactory::new("a", true, 7))
            .with(MockFactory::new("b", true, 7));
        let ba = StaticRegistry::new()
            .with(MockFactory::new("b", true, 7))
            .with(MockFactory::new("a", true, 7));

        assert_eq!(Resolver::new(&ab).select(&request()).factory_id(), Some("a"));
        assert_eq!(Resolver::new(&ba).select(&request()).factory_id(), Some("b"));
    }

    #[test]
    fn test_first_eligible_wins_even_with_negative_priority() {
        let registry = StaticRegistry::new()
            .with(MockFactory::new("neg", true, -5))
            .with(MockFactory::new("neg2", true, -10));

        let selection = Resolver::new(&registry).select(&request());
        assert_eq!(selection.factory_id(), Some("neg"));
        assert_eq!(selection.priority(), Some(-5));
    }

    #[tokio::test]
    async fn test_ineligible_never_asked_priority_or_opened() {
        let declined = MockFactory::new("declined", false, 1000);
        let accepted = MockFactory::new("accepted", true, 1);
        let declined_calls = declined.calls();
        let registry = StaticRegistry::new().with(declined).with(accepted);

        let connection = Resolver::new(&registry).resolve(&request()).await.unwrap();

        assert_eq!(connection.provider_id(), "accepted");
        assert_eq!(declined_calls.priority.load(Ordering::SeqCst), 0);
        assert_eq!(declined_calls.open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_failure_propagates_without_fallback() {
        fn refused() -> ConnectError {
            ConnectError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        }

        let best = MockFactory::new("best", true, 20).failing(refused);
        let runner_up = MockFactory::new("runner-up", true, 10);
        let (best_calls, runner_up_calls) = (best.calls(), runner_up.calls());
        let registry = StaticRegistry::new().with(runner_up).with(best);

        let err = Resolver::new(&registry)
            .resolve(&request())
            .await
            .unwrap_err();

        let ConnectError::Transport(source) = &err else {
            panic!("expected transport error, got {err:?}");
        };
        let io = source.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert_eq!(err.to_string(), "Transport error: connection refused");
        assert_eq!(best_calls.open.load(Ordering::SeqCst), 1);
        assert_eq!(runner_up_calls.open.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_selection_records_probes() {
        let registry = StaticRegistry::new()
            .with(MockFactory::new("a", false, 1))
            .with(MockFactory::new("b", true, 3));

        let selection = Resolver::new(&registry).select(&request());
        let report = selection.report();

        assert_eq!(selection.eligible_count(), 1);
        assert_eq!(report.selected.as_deref(), Some("b"));
        assert_eq!(
            report.probes,
            vec![
                FactoryInfo {
                    id: "a".into(),
                    eligible: false,
                    priority: None
                },
                FactoryInfo {
                    id: "b".into(),
                    eligible: true,
                    priority: Some(3)
                },
            ]
        );
    }
}
