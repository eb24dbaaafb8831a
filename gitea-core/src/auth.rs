//! Authentication strategies attached to a connection request.
//!
//! The set of strategies is open: anything implementing [`GiteaAuth`] can be
//! attached to a request. Three value types ship with the crate:
//! - [`NoAuth`] - anonymous access (the default)
//! - [`TokenAuth`] - personal access token
//! - [`BasicAuth`] - username and password

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Auth Trait
// ============================================================================

/// A credential-bearing policy for talking to a Gitea server.
///
/// Implementations must be cheap to share; a request holds its strategy
/// behind an `Arc` and hands the same instance to every provider it probes.
pub trait GiteaAuth: fmt::Debug + Send + Sync + 'static {
    /// Short name of the scheme (e.g., "none", "token", "basic").
    fn scheme(&self) -> &str;

    /// Value for the HTTP `Authorization` header, if this strategy sends one.
    fn authorization(&self) -> Option<String>;

    /// Access to the concrete type, for providers that special-case it.
    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// Built-in Strategies
// ============================================================================

/// Anonymous access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoAuth;

impl GiteaAuth for NoAuth {
    fn scheme(&self) -> &str {
        "none"
    }

    fn authorization(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Personal access token authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    /// Creates a token strategy.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the raw token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for TokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuth")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GiteaAuth for TokenAuth {
    fn scheme(&self) -> &str {
        "token"
    }

    fn authorization(&self) -> Option<String> {
        Some(format!("token {}", self.token))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Username and password authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Creates a basic authentication strategy.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl GiteaAuth for BasicAuth {
    fn scheme(&self) -> &str {
        "basic"
    }

    fn authorization(&self) -> Option<String> {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        Some(format!("Basic {encoded}"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Shared Handle
// ============================================================================

/// Shared, immutable handle to an authentication strategy.
///
/// Cloning the handle shares the underlying strategy. The default is
/// [`NoAuth`].
#[derive(Clone)]
pub struct Authentication(Arc<dyn GiteaAuth>);

impl Authentication {
    /// Wraps any strategy.
    pub fn new(auth: impl GiteaAuth) -> Self {
        Self(Arc::new(auth))
    }

    /// Anonymous access.
    pub fn none() -> Self {
        Self::new(NoAuth)
    }

    /// Token authentication.
    pub fn token(token: impl Into<String>) -> Self {
        Self::new(TokenAuth::new(token))
    }

    /// Username and password authentication.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(BasicAuth::new(username, password))
    }

    /// Returns the scheme name of the wrapped strategy.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the `Authorization` header value, if any.
    pub fn authorization(&self) -> Option<String> {
        self.0.authorization()
    }

    /// Returns true for anonymous access.
    pub fn is_none(&self) -> bool {
        self.0.as_any().is::<NoAuth>()
    }

    /// Downcasts to a concrete strategy type.
    pub fn downcast_ref<T: GiteaAuth>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Borrows the wrapped strategy.
    pub fn as_auth(&self) -> &dyn GiteaAuth {
        self.0.as_ref()
    }
}

impl Default for Authentication {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Authentication {
    fn eq(&self, other: &Self) -> bool {
        self.scheme() == other.scheme() && self.authorization() == other.authorization()
    }
}

impl Eq for Authentication {}

impl From<NoAuth> for Authentication {
    fn from(auth: NoAuth) -> Self {
        Self::new(auth)
    }
}

impl From<TokenAuth> for Authentication {
    fn from(auth: TokenAuth) -> Self {
        Self::new(auth)
    }
}

impl From<BasicAuth> for Authentication {
    fn from(auth: BasicAuth) -> Self {
        Self::new(auth)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_none() {
        let auth = Authentication::default();
        assert!(auth.is_none());
        assert_eq!(auth.scheme(), "none");
        assert_eq!(auth.authorization(), None);
    }

    #[test]
    fn test_token_header() {
        let auth = Authentication::token("abc123");
        assert_eq!(auth.scheme(), "token");
        assert_eq!(auth.authorization().as_deref(), Some("token abc123"));
        assert!(!auth.is_none());
    }

    #[test]
    fn test_basic_header() {
        let auth = Authentication::basic("alice", "secret");
        // base64("alice:secret")
        assert_eq!(
            auth.authorization().as_deref(),
            Some("Basic YWxpY2U6c2VjcmV0")
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let token = format!("{:?}", Authentication::token("abc123"));
        assert!(!token.contains("abc123"));

        let basic = format!("{:?}", Authentication::basic("alice", "secret"));
        assert!(basic.contains("alice"));
        assert!(!basic.contains("secret"));
    }

    #[test]
    fn test_downcast() {
        let auth = Authentication::basic("alice", "secret");
        let basic = auth.downcast_ref::<BasicAuth>().unwrap();
        assert_eq!(basic.username(), "alice");
        assert!(auth.downcast_ref::<TokenAuth>().is_none());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Authentication::none(), Authentication::from(NoAuth));
        assert_eq!(Authentication::token("a"), Authentication::token("a"));
        assert_ne!(Authentication::token("a"), Authentication::token("b"));
        assert_ne!(Authentication::token("a"), Authentication::none());
    }

    #[derive(Debug)]
    struct HeaderOnly;

    impl GiteaAuth for HeaderOnly {
        fn scheme(&self) -> &str {
            "custom"
        }

        fn authorization(&self) -> Option<String> {
            Some("Bearer xyz".to_string())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_custom_strategy() {
        let auth = Authentication::new(HeaderOnly);
        assert_eq!(auth.scheme(), "custom");
        assert!(auth.downcast_ref::<HeaderOnly>().is_some());
        assert!(!auth.is_none());
    }
}
