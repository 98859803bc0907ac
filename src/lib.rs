//! Multi-account node fleet client library.

// Core subsystems
pub mod api;
pub mod config;
pub mod credentials;
pub mod http;
pub mod wallet;

// Account orchestration
pub mod fleet;
pub mod session;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::FleetConfig;
pub use fleet::{FleetReport, FleetRunner};
pub use lifecycle::Shutdown;
pub use session::{AccountSession, SessionState};
