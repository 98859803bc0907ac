//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fleet.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Message signed by every account when it authenticates.
pub const DEFAULT_SIGN_MESSAGE: &str = "Sign in to register and operate your node";

/// Upper bound for the check-in interval and the stagger step.
pub const MAX_SCHEDULE_SECS: u64 = 365 * 24 * 60 * 60;

/// Upper bound for a single backoff delay.
pub const MAX_RETRY_DELAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Root configuration for the fleet runner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FleetConfig {
    /// Remote API endpoint and request identity.
    pub api: ApiConfig,

    /// Transport settings shared by every account.
    pub http: HttpConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Startup stagger and steady-state cadence.
    pub schedule: ScheduleConfig,

    /// Credential and proxy file locations.
    pub files: FilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every path is appended to (e.g., "https://api.example.com").
    pub base_url: String,

    /// Message passed to the signer during authentication.
    pub sign_message: String,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            sign_message: DEFAULT_SIGN_MESSAGE.to_string(),
            user_agent: concat!("node-fleet/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Transport timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per logical operation (first call included).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Random jitter added on top of each delay, as a fraction of it.
    /// 0.0 disables jitter.
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2000,
            max_delay_ms: 60_000,
            jitter_ratio: 0.0,
        }
    }
}

/// Fleet scheduling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Delay multiplier between account startups in seconds
    /// (account `i` waits `i * stagger_secs`).
    pub stagger_secs: u64,

    /// Interval of the steady-state check-in cycle in seconds.
    pub checkin_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            stagger_secs: 5,
            checkin_interval_secs: 24 * 60 * 60,
        }
    }
}

/// Operator-provided input files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Newline-delimited private keys.
    pub keys: String,

    /// Newline-delimited proxy endpoints (optional file).
    pub proxies: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            keys: "private_keys.txt".to_string(),
            proxies: "proxies.txt".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Path of the durable log file. Empty disables the file sink.
    pub log_file: String,

    /// Prometheus endpoint bind address. Empty disables metrics exposition.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: "node-fleet.log".to_string(),
            metrics_address: String::new(),
        }
    }
}
