//! Failure taxonomy for remote API calls.

use thiserror::Error;

use crate::http::TransportError;
use crate::wallet::WalletError;

/// Longest response body excerpt kept in an error.
const BODY_EXCERPT_LEN: usize = 256;

/// How the retry wrapper reacts to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Expired or missing bearer token: refresh credentials once.
    Unauthorized,
    /// No response at all, or a server error: back off and retry.
    Retryable,
    /// Anything else: surface immediately.
    NonRetryable,
}

/// Errors surfaced by account operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401, or no token available yet.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP 5xx.
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// HTTP 4xx other than 401.
    #[error("Client error {status}: {body}")]
    Client { status: u16, body: String },

    /// Informational or redirect status the API never sends on purpose.
    #[error("Unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The request did not produce a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not have the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The login message could not be signed.
    #[error(transparent)]
    Signing(#[from] WalletError),

    /// Retryable failures persisted through every attempt.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        operation: &'static str,
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },
}

impl ApiError {
    /// Build the error matching a non-2xx status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = excerpt(body);
        match status {
            401 => ApiError::Unauthorized(body),
            500..=599 => ApiError::Server { status, body },
            400..=499 => ApiError::Client { status, body },
            _ => ApiError::UnexpectedStatus(status),
        }
    }

    /// Classify the failure for the retry wrapper.
    pub fn class(&self) -> FailureClass {
        match self {
            ApiError::Unauthorized(_) => FailureClass::Unauthorized,
            ApiError::Server { .. } => FailureClass::Retryable,
            ApiError::Transport(e) if e.is_retryable() => FailureClass::Retryable,
            _ => FailureClass::NonRetryable,
        }
    }

    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => Some(*status),
            ApiError::UnexpectedStatus(status) => Some(*status),
            ApiError::ExhaustedRetries { last, .. } => last.status(),
            _ => None,
        }
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
