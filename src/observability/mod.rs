//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Sessions, retry wrapper, fleet runner produce:
//!     → tracing events (structured fields, account spans)
//!     → metrics counters and gauges
//!
//! Consumers:
//!     → logging.rs: console (colored) + log file (plain), same events
//!     → metrics.rs: optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Only the binary installs a global subscriber or recorder
//! - Secrets (keys, tokens, proxy passwords) never reach an event

pub mod logging;
pub mod metrics;
