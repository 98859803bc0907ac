//! Remote node API surface.
//!
//! Paths, request/response shapes, and the failure taxonomy every account
//! operation reports through.

pub mod error;
pub mod types;

pub use error::{ApiError, FailureClass};
pub use types::{NodeStats, StatsEnvelope, VerifyResponse};

/// Signature-based login.
pub const VERIFY_PATH: &str = "/user/verify";
/// Node registration (idempotent on the remote side).
pub const ONBOARD_PATH: &str = "/v1/node/onboard";
/// Daily check-in.
pub const CHECK_IN_PATH: &str = "/v1/node/check_in";
/// Node standing, queried with `?address=`.
pub const NODE_STATS_PATH: &str = "/v1/node/node_stats";
