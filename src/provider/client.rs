//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Connection pool and timeout options for [`ReqwestClient`].
///
/// One client (and therefore one pool) is shared across every concurrent
/// send of a job, so the pool cap bounds the job's open connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Maximum idle connections kept per host.
    pub pool_limit: usize,
    /// Total per-request time limit. `None` disables the bound and
    /// relies on transport defaults.
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    /// Default pool capacity, matching the provider-facing connector
    /// limit the service has always run with.
    pub const DEFAULT_POOL_LIMIT: usize = 1000;

    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            pool_limit: Self::DEFAULT_POOL_LIMIT,
            timeout: Some(Self::DEFAULT_TIMEOUT),
        }
    }
}

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait. Cloning is cheap and shares the underlying
/// connection pool, which is what the dispatcher relies on when fanning
/// a batch out across tasks.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default [`ClientOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_options(ClientOptions::default())
    }

    /// Creates a new HTTP client with the given pool/timeout options.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the TLS backend cannot be
    /// initialized.
    pub fn with_options(options: ClientOptions) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(options.pool_limit);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else if e.is_builder() {
                HttpError::InvalidUrl(e.to_string())
            } else {
                HttpError::Connection(Box::new(e))
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::Connection(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}
