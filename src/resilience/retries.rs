//! Resilient request wrapper.
//!
//! # Responsibilities
//! - Retry transient failures (no response, 5xx) with exponential backoff
//! - Refresh credentials once on 401 and replay the operation
//! - Surface every other failure immediately
//!
//! # Design Decisions
//! - Explicit loop; the attempt counter is local to one invocation
//! - The refresh is `FnOnce`, so a second 401 in the same call cannot loop
//! - The authentication operation itself runs without a refresh

use std::future::{Future, Ready};
use std::time::Duration;

use crate::api::{ApiError, FailureClass};
use crate::config::RetryConfig;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

type NoRefresh = fn() -> Ready<Result<(), ApiError>>;

/// Attempt budget and backoff shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total invocations allowed per logical operation, first call included.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ratio: f64,
}

impl RetryPolicy {
    /// Delay after failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms, self.jitter_ratio)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            jitter_ratio: config.jitter_ratio,
        }
    }
}

/// Runs logical operations under a `RetryPolicy`.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute an operation that must not trigger a credential refresh
    /// (the authentication call itself). A 401 surfaces immediately.
    pub async fn run<T, Op, Fut>(&self, operation: &'static str, op: Op) -> Result<T, ApiError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.execute(operation, None::<NoRefresh>, op).await
    }

    /// Execute an authenticated operation. On the first 401, `refresh` runs
    /// once and the operation is replayed with a fresh attempt budget.
    pub async fn run_with_refresh<T, Op, Fut, Re, ReFut>(
        &self,
        operation: &'static str,
        refresh: Re,
        op: Op,
    ) -> Result<T, ApiError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        Re: FnOnce() -> ReFut,
        ReFut: Future<Output = Result<(), ApiError>>,
    {
        self.execute(operation, Some(refresh), op).await
    }

    async fn execute<T, Op, Fut, Re, ReFut>(
        &self,
        operation: &'static str,
        mut refresh: Option<Re>,
        mut op: Op,
    ) -> Result<T, ApiError>
    where
        Op: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
        Re: FnOnce() -> ReFut,
        ReFut: Future<Output = Result<(), ApiError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let can_refresh = refresh.is_some();
        let mut attempt: u32 = 0;

        loop {
            tracing::debug!(operation, attempt = attempt + 1, max_attempts, "Attempting request");

            let err = match op().await {
                Ok(value) => {
                    tracing::debug!(operation, attempt = attempt + 1, "Request succeeded");
                    metrics::record_request(operation, "success");
                    return Ok(value);
                }
                Err(err) => err,
            };

            match err.class() {
                FailureClass::Unauthorized => match refresh.take() {
                    Some(refresh) => {
                        tracing::warn!(operation, error = %err, "Unauthorized, refreshing credentials");
                        metrics::record_token_refresh(operation);
                        if let Err(refresh_err) = refresh().await {
                            tracing::error!(operation, error = %refresh_err, "Credential refresh failed");
                            metrics::record_request(operation, "refresh_failed");
                            return Err(refresh_err);
                        }
                        attempt = 0;
                    }
                    None => {
                        if can_refresh {
                            tracing::error!(operation, error = %err, "Still unauthorized after credential refresh");
                        } else {
                            tracing::error!(operation, error = %err, "Unauthorized");
                        }
                        metrics::record_request(operation, "unauthorized");
                        return Err(err);
                    }
                },
                FailureClass::Retryable if attempt + 1 < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying after backoff"
                    );
                    metrics::record_retry(operation);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                FailureClass::Retryable => {
                    tracing::error!(
                        operation,
                        attempts = attempt + 1,
                        error = %err,
                        "Retries exhausted"
                    );
                    metrics::record_request(operation, "exhausted");
                    return Err(ApiError::ExhaustedRetries {
                        operation,
                        attempts: attempt + 1,
                        last: Box::new(err),
                    });
                }
                FailureClass::NonRetryable => {
                    tracing::error!(operation, status = ?err.status(), error = %err, "Request failed");
                    metrics::record_request(operation, "failed");
                    return Err(err);
                }
            }
        }
    }
}
