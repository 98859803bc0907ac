//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Keys file + proxies file → AccountSpec list (fatal if no keys)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown.rs broadcast
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → fleet runner stops launching, sessions stop their timers
//! ```
//!
//! # Design Decisions
//! - Credential errors are fatal before any network traffic
//! - One broadcast reaches every long-running task

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
pub use startup::load_accounts;
