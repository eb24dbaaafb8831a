//! CLI command implementations.

pub mod check;
pub mod config;
pub mod providers;

use std::sync::Arc;

use gitea_connect::{Config, GlobalRegistry, HttpConnectionFactory};

/// Applies the configured HTTP settings to the process-wide HTTP provider.
pub fn install_configured_http(config: &Config) {
    GlobalRegistry::replace(Arc::new(HttpConnectionFactory::with_settings(
        config.settings(),
    )));
}
