//! Outbound request description.
//!
//! Transport-agnostic: the session builds an `ApiRequest`, the transport
//! turns it into a wire request against its base URL and proxy.

use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One call against the remote API.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<Arc<String>>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Authenticate the request with a bearer token.
    pub fn bearer(mut self, token: Arc<String>) -> Self {
        self.bearer = Some(token);
        self
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("bearer", &self.bearer.as_ref().map(|_| "***"))
            .finish()
    }
}
