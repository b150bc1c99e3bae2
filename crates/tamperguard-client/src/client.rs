//! Reference value HTTP client.

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tamperguard_core::{IntegrityError, Result};
use tracing::{debug, warn};

use crate::config::RemoteEndpoint;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of reference values, one retrieval per endpoint.
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    /// Fetch the current published value for one endpoint.
    ///
    /// Returns the trimmed value, or an error when the value is unavailable.
    async fn fetch(&self, endpoint: &RemoteEndpoint) -> Result<String>;
}

/// HTTP client for published reference values
#[derive(Clone)]
pub struct ReferenceClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    timeout: Duration,
}

impl ReferenceClient {
    /// Create a new client using default settings
    pub fn new() -> Result<Self> {
        ReferenceClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> ReferenceClientBuilder {
        ReferenceClientBuilder::new()
    }

    /// GET a plain-text value, bypassing any cache.
    ///
    /// The body is decoded as UTF-8 and trimmed of surrounding whitespace.
    /// Non-2xx responses, transport errors, undecodable and empty bodies
    /// are all errors.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url = %url, "GET reference value");

        let response = self
            .inner
            .http
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "reference response");

        if !status.is_success() {
            return Err(IntegrityError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| IntegrityError::InvalidReference(format!("{url}: {e}")))?
            .trim();

        if text.is_empty() {
            warn!(url = %url, "empty reference body");
            return Err(IntegrityError::InvalidReference(format!(
                "{url}: empty body"
            )));
        }

        Ok(text.to_string())
    }

    fn transport_error(&self, err: &reqwest::Error) -> IntegrityError {
        if err.is_timeout() {
            IntegrityError::Timeout(self.inner.timeout)
        } else {
            IntegrityError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl ReferenceFetcher for ReferenceClient {
    async fn fetch(&self, endpoint: &RemoteEndpoint) -> Result<String> {
        self.get_text(endpoint.url.as_str()).await
    }
}

/// Builder for configuring a [`ReferenceClient`]
pub struct ReferenceClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReferenceClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("tamperguard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ReferenceClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| IntegrityError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(ReferenceClient {
            inner: Arc::new(ClientInner {
                http,
                timeout: self.timeout,
            }),
        })
    }
}
