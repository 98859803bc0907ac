//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Account operation:
//!     → timeouts.rs (every request carries a deadline)
//!     → retries.rs (classify failure: retry, refresh credentials, or surface)
//!     → backoff.rs (delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Only "no response" and 5xx are retried
//! - A 401 triggers at most one credential refresh per logical operation

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::calculate_backoff;
pub use retries::{RetryExecutor, RetryPolicy};
pub use timeouts::with_deadline;
