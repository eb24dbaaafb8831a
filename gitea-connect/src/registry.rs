//! Factory registries.
//!
//! The resolver never locates factories itself; it asks a
//! [`FactoryRegistry`] for a snapshot of what is installed. Two registries
//! ship with the crate:
//! - [`StaticRegistry`] - a fixed list, for embedders and tests
//! - [`GlobalRegistry`] - the process-wide registry used by
//!   [`ConnectionBuilder::open`](crate::ConnectionBuilder::open)

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::factory::ConnectionFactory;
use crate::http::HttpConnectionFactory;

// ============================================================================
// Registry Trait
// ============================================================================

/// A source of installed connection factories.
pub trait FactoryRegistry: Send + Sync {
    /// Returns a consistent snapshot of the installed factories.
    ///
    /// The order of the snapshot is the order in which the resolver probes
    /// factories, and so decides ties between equal priorities.
    fn factories(&self) -> Vec<Arc<dyn ConnectionFactory>>;
}

// ============================================================================
// Static Registry
// ============================================================================

/// A registry over a fixed list of factories.
#[derive(Default, Clone)]
pub struct StaticRegistry {
    factories: Vec<Arc<dyn ConnectionFactory>>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the given factories, in probe order.
    pub fn with_factories(factories: Vec<Arc<dyn ConnectionFactory>>) -> Self {
        Self { factories }
    }

    /// Appends a factory.
    #[must_use]
    pub fn with(mut self, factory: impl ConnectionFactory + 'static) -> Self {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Returns the number of factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl FactoryRegistry for StaticRegistry {
    fn factories(&self) -> Vec<Arc<dyn ConnectionFactory>> {
        self.factories.clone()
    }
}

impl std::fmt::Debug for StaticRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticRegistry")
            .field(
                "factories",
                &self.factories.iter().map(|f| f.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ============================================================================
// Global Registry
// ============================================================================

/// Process-wide factory storage.
static GLOBAL: OnceLock<RwLock<Vec<Arc<dyn ConnectionFactory>>>> = OnceLock::new();

/// Factories installed before anything else registers.
fn init_factories() -> RwLock<Vec<Arc<dyn ConnectionFactory>>> {
    RwLock::new(vec![Arc::new(HttpConnectionFactory::default())])
}

/// The process-wide registry.
///
/// Initialized lazily with the default [`HttpConnectionFactory`]. Factories
/// added with [`GlobalRegistry::install`] are probed after it, in install
/// order. Enumeration copies a snapshot under a read lock, so the lock is
/// never held while factories are probed or opened.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalRegistry;

impl GlobalRegistry {
    fn storage() -> &'static RwLock<Vec<Arc<dyn ConnectionFactory>>> {
        GLOBAL.get_or_init(init_factories)
    }

    /// Installs a factory for the rest of the process lifetime.
    pub fn install(factory: Arc<dyn ConnectionFactory>) {
        debug!(factory = %factory.id(), "Installing connection factory");
        Self::storage()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(factory);
    }

    /// Replaces the installed factory with the same ID, keeping its position.
    ///
    /// Appends the factory if no factory with that ID is installed.
    pub fn replace(factory: Arc<dyn ConnectionFactory>) {
        let mut factories = Self::storage()
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match factories.iter().position(|f| f.id() == factory.id()) {
            Some(index) => {
                debug!(factory = %factory.id(), "Replacing connection factory");
                factories[index] = factory;
            }
            None => {
                debug!(factory = %factory.id(), "Installing connection factory");
                factories.push(factory);
            }
        }
    }

    /// Returns a snapshot of the installed factories.
    pub fn snapshot() -> Vec<Arc<dyn ConnectionFactory>> {
        Self::storage()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the IDs of installed factories.
    pub fn ids() -> Vec<String> {
        Self::snapshot().iter().map(|f| f.id().to_string()).collect()
    }
}

impl FactoryRegistry for GlobalRegistry {
    fn factories(&self) -> Vec<Arc<dyn ConnectionFactory>> {
        Self::snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
