//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs.
//! Returns all validation errors, not just the first.

use std::fmt;
use url::Url;

use crate::config::schema::{FleetConfig, MAX_RETRY_DELAY_MS, MAX_SCHEDULE_SECS};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "retries.max_attempts").
    pub field: &'static str,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FleetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "api.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "api.base_url",
            format!("invalid URL '{}': {}", config.api.base_url, e),
        )),
    }

    if config.api.sign_message.is_empty() {
        errors.push(ValidationError::new("api.sign_message", "must not be empty"));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::new("http.request_timeout_secs", "must be > 0"));
    }
    if config.http.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("http.connect_timeout_secs", "must be > 0"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }
    if config.retries.max_delay_ms > MAX_RETRY_DELAY_MS {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            format!("must be <= {}", MAX_RETRY_DELAY_MS),
        ));
    }
    if !(0.0..=1.0).contains(&config.retries.jitter_ratio) {
        errors.push(ValidationError::new("retries.jitter_ratio", "must be within 0.0..=1.0"));
    }

    if config.schedule.checkin_interval_secs == 0 {
        errors.push(ValidationError::new("schedule.checkin_interval_secs", "must be > 0"));
    } else if config.schedule.checkin_interval_secs > MAX_SCHEDULE_SECS {
        errors.push(ValidationError::new(
            "schedule.checkin_interval_secs",
            format!("must be <= {}", MAX_SCHEDULE_SECS),
        ));
    }
    if config.schedule.stagger_secs > MAX_SCHEDULE_SECS {
        errors.push(ValidationError::new(
            "schedule.stagger_secs",
            format!("must be <= {}", MAX_SCHEDULE_SECS),
        ));
    }

    if config.files.keys.trim().is_empty() {
        errors.push(ValidationError::new("files.keys", "must name a file"));
    }

    let metrics_address = &config.observability.metrics_address;
    if !metrics_address.is_empty() && metrics_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FleetConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = FleetConfig::default();
        config.api.base_url = "ftp://api.example.com".to_string();
        config.retries.max_attempts = 0;
        config.retries.jitter_ratio = 2.0;
        config.observability.metrics_address = "not-an-addr".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "api.base_url",
                "retries.max_attempts",
                "retries.jitter_ratio",
                "observability.metrics_address",
            ]
        );
    }

    #[test]
    fn test_base_delay_above_cap() {
        let mut config = FleetConfig::default();
        config.retries.base_delay_ms = 10_000;
        config.retries.max_delay_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("retries.base_delay_ms"));
    }

    #[test]
    fn test_oversized_schedule_and_delay_rejected() {
        let mut config = FleetConfig::default();
        config.retries.base_delay_ms = u64::MAX;
        config.retries.max_delay_ms = u64::MAX;
        config.schedule.checkin_interval_secs = u64::MAX;
        config.schedule.stagger_secs = u64::MAX;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "retries.max_delay_ms",
                "schedule.checkin_interval_secs",
                "schedule.stagger_secs",
            ]
        );
    }

    #[test]
    fn test_schedule_upper_bound_is_inclusive() {
        let mut config = FleetConfig::default();
        config.schedule.checkin_interval_secs = MAX_SCHEDULE_SECS;
        config.schedule.stagger_secs = MAX_SCHEDULE_SECS;
        config.retries.max_delay_ms = MAX_RETRY_DELAY_MS;
        assert!(validate_config(&config).is_ok());
    }
}
