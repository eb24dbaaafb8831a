//! Default HTTP connection factory.
//!
//! Handles any `http` or `https` server URL with a host. The authentication
//! strategy's `Authorization` header (if any) is attached to every request
//! as a sensitive default header.

use async_trait::async_trait;
use gitea_core::{ConnectError, ConnectionRequest, GiteaConnection};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ConnectSettings;
use crate::factory::ConnectionFactory;

/// Factory ID.
pub const HTTP_FACTORY_ID: &str = "http";

/// Base priority of the HTTP factory.
///
/// Specialised factories are expected to rank above this.
pub const BASE_PRIORITY: i64 = 0;

/// Extra priority for `https` URLs.
pub const SECURE_BONUS: i64 = 10;

/// Path of the version endpoint, relative to the server URL.
const VERSION_PATH: &str = "api/v1/version";

// ============================================================================
// HTTP Connection Factory
// ============================================================================

/// Opens connections over plain HTTP(S) with `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpConnectionFactory {
    settings: ConnectSettings,
}

impl HttpConnectionFactory {
    /// Creates a factory with custom settings.
    pub fn with_settings(settings: ConnectSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings used for new connections.
    pub fn settings(&self) -> &ConnectSettings {
        &self.settings
    }

    /// Parses a server URL, accepting only `http`/`https` with a host.
    fn parse(server_url: &str) -> Result<Url, ConnectError> {
        let url = Url::parse(server_url).map_err(|e| ConnectError::InvalidUrl {
            url: server_url.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConnectError::InvalidUrl {
                url: server_url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if url.host_str().is_none() {
            return Err(ConnectError::InvalidUrl {
                url: server_url.to_string(),
                reason: "no host in URL".to_string(),
            });
        }

        Ok(url)
    }

    fn build_client(&self, request: &ConnectionRequest) -> Result<Client, ConnectError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(authorization) = request.authentication().authorization() {
            let mut value = header::HeaderValue::from_str(&authorization).map_err(|_| {
                ConnectError::AuthenticationFailed(format!(
                    "{} credentials cannot be sent as an HTTP header",
                    request.authentication().scheme()
                ))
            })?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Client::builder()
            .timeout(self.settings.timeout)
            .user_agent(self.settings.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(ConnectError::transport)
    }
}

#[async_trait]
impl ConnectionFactory for HttpConnectionFactory {
    fn id(&self) -> &str {
        HTTP_FACTORY_ID
    }

    fn can_open(&self, request: &ConnectionRequest) -> bool {
        Self::parse(request.server_url()).is_ok()
    }

    fn priority(&self, request: &ConnectionRequest) -> i64 {
        match Self::parse(request.server_url()) {
            Ok(url) if url.scheme() == "https" => BASE_PRIORITY + SECURE_BONUS,
            _ => BASE_PRIORITY,
        }
    }

    #[instrument(skip(self, request), fields(server = %request.server_url()))]
    async fn open(
        &self,
        request: &ConnectionRequest,
    ) -> Result<Box<dyn GiteaConnection>, ConnectError> {
        let base = Self::parse(request.server_url())?;
        let client = self.build_client(request)?;

        debug!(
            auth = %request.authentication().scheme(),
            timeout = ?self.settings.timeout,
            "Opened HTTP connection"
        );

        Ok(Box::new(HttpConnection {
            server_url: request.server_url().to_string(),
            base,
            client,
        }))
    }
}

// ============================================================================
// HTTP Connection
// ============================================================================

#[derive(Debug, Deserialize)]
struct VersionResponse {
    version: String,
}

/// A live connection backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    server_url: String,
    base: Url,
    client: Client,
}

impl HttpConnection {
    /// Resolves an API path against the server URL.
    ///
    /// A server URL with a sub-path (e.g. `https://host/gitea`) keeps that
    /// prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url, ConnectError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path).map_err(|e| ConnectError::InvalidUrl {
            url: self.server_url.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl GiteaConnection for HttpConnection {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn provider_id(&self) -> &str {
        HTTP_FACTORY_ID
    }

    #[instrument(skip(self), fields(server = %self.server_url))]
    async fn server_version(&self) -> Result<String, ConnectError> {
        let url = self.endpoint(VERSION_PATH)?;
        debug!(url = %url, "GET version");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ConnectError::transport)?;
        let status = response.status();
        debug!(status = %status, "Response received");

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ConnectError::AuthenticationFailed(format!(
                "server answered {status}"
            )));
        }
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) if !body.trim().is_empty() => body,
                _ => status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            };
            return Err(ConnectError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(ConnectError::transport)?;
        let parsed: VersionResponse = serde_json::from_str(&body)
            .map_err(|e| ConnectError::InvalidResponse(e.to_string()))?;
        Ok(parsed.version)
    }
}

// ============================================================================
// Tests
// ============================================================================
