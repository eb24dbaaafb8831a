// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Gitea Connect
//!
//! Resolves a Gitea server address and authentication strategy into a live
//! connection by choosing among pluggable connection factories.
//!
//! ## Resolution
//!
//! - [`factory::ConnectionFactory`] - Trait for connection providers
//! - [`registry::FactoryRegistry`] - Source of installed factories
//! - [`resolver::Resolver`] - Picks the highest-priority eligible factory
//! - [`builder::ConnectionBuilder`] - Fluent entry point
//!
//! ## Built-in Provider
//!
//! - [`http::HttpConnectionFactory`] - `reqwest`-backed HTTP(S) provider,
//!   installed in the [`registry::GlobalRegistry`] by default
//!
//! ## Configuration
//!
//! - [`config::Config`] - TOML configuration file
//! - [`config::ConnectSettings`] - HTTP timeout and user agent
//!
//! ## Example
//!
//! ```ignore
//! use gitea_connect::{ConnectionBuilder, StaticRegistry, HttpConnectionFactory};
//! use gitea_core::Authentication;
//!
//! let registry = StaticRegistry::new().with(HttpConnectionFactory::default());
//!
//! let connection = ConnectionBuilder::new("https://gitea.example.com")
//!     .authentication(Authentication::token("abc123"))
//!     .open_with(&registry)
//!     .await?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod registry;
pub mod resolver;

// Errors
pub use error::ConfigError;

// Resolution
pub use builder::ConnectionBuilder;
pub use factory::{ConnectionFactory, FactoryInfo};
pub use registry::{FactoryRegistry, GlobalRegistry, StaticRegistry};
pub use resolver::{Resolver, Selection, SelectionReport};

// Built-in provider
pub use http::{HttpConnection, HttpConnectionFactory};

// Configuration
pub use config::{AuthConfig, AuthType, Config, ConnectSettings, HttpConfig, ServerConfig};
