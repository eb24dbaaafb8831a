// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Gitea Core
//!
//! Value types and traits shared by every Gitea connection provider.
//!
//! ## Key Types
//!
//! ### Authentication
//! - [`GiteaAuth`] - Open trait for credential strategies
//! - [`Authentication`] - Shared handle to a strategy (defaults to [`NoAuth`])
//! - [`NoAuth`], [`TokenAuth`], [`BasicAuth`] - Built-in strategies
//!
//! ### Requests & Connections
//! - [`ConnectionRequest`] - Immutable server address + authentication pair
//! - [`GiteaConnection`] - Live connection returned by a provider
//!
//! ### Errors
//! - [`ConnectError`] - Resolution and provider failures

pub mod auth;
pub mod connection;
pub mod error;
pub mod request;

pub use auth::{Authentication, BasicAuth, GiteaAuth, NoAuth, TokenAuth};
pub use connection::GiteaConnection;
pub use error::{BoxError, ConnectError};
pub use request::ConnectionRequest;
