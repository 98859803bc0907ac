//! HTTP transport.
//!
//! # Responsibilities
//! - Bind one reqwest client to one account's proxy (or none)
//! - Resolve request paths against the API base URL
//! - Enforce connect and request timeouts
//! - Report "no response received" distinctly from HTTP statuses

use reqwest::header::{ACCEPT, HeaderValue};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{ApiConfig, HttpConfig};
use crate::credentials::ProxyEndpoint;
use crate::http::request::ApiRequest;
use crate::http::response::ApiResponse;
use crate::resilience::timeouts::with_deadline;

/// Failures where no HTTP response was obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request deadline elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// TCP/TLS/proxy connection could not be established.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request failed in flight.
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The request could not be built (bad URL, bad header).
    #[error("Invalid request: {0}")]
    Build(String),

    /// The proxy endpoint could not be configured.
    #[error("Invalid proxy {endpoint}: {reason}")]
    Proxy { endpoint: String, reason: String },
}

impl TransportError {
    /// Whether the failure is transient (nothing reached the API, or the answer was lost).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout(_)
                | TransportError::Connect(_)
                | TransportError::Request(_)
                | TransportError::Body(_)
        )
    }

    fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(deadline)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Executes API requests. One instance per account.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>> + Send;
}

/// reqwest-backed transport, optionally tunnelled through a proxy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl ReqwestTransport {
    /// Build a transport for one account.
    ///
    /// # Arguments
    /// * `api` - Base URL and User-Agent
    /// * `http` - Connect and request timeouts
    /// * `proxy` - The account's proxy, or `None` for a direct connection
    pub fn new(
        api: &ApiConfig,
        http: &HttpConfig,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<Self, TransportError> {
        let request_timeout = Duration::from_secs(http.request_timeout_secs);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(request_timeout)
            .user_agent(api.user_agent.clone());

        builder = match proxy {
            Some(endpoint) => {
                let proxy_err = |reason: String| TransportError::Proxy {
                    endpoint: endpoint.to_string(),
                    reason,
                };
                let url = endpoint.to_url().map_err(|e| proxy_err(e.to_string()))?;
                let proxy = reqwest::Proxy::all(url.as_str()).map_err(|e| proxy_err(e.to_string()))?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let client = builder
            .build()
            .map_err(|e| TransportError::Build(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    /// Absolute URL for a request, query string included.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path))
            .map_err(|e| TransportError::Build(format!("{}{}: {}", self.base_url, request.path, e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(&request)?;
        let deadline = self.request_timeout;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %request.method, path = %request.path, "Sending request");

        with_deadline(deadline, async move {
            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::from_reqwest(e, deadline))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Body(e.to_string()))?;
            Ok(ApiResponse { status, body })
        })
        .await
    }
}
