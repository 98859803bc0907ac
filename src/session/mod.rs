//! Account session subsystem.
//!
//! # Data Flow
//! ```text
//! start()
//!     → authenticate (sign, verify, store token)       Unauthenticated → Authenticated
//!     → run_routine: onboard                            → Onboarded
//!                    check_in → fetch_stats → log       → SteadyState
//!     → spawn recurring task: every interval, check_in → fetch_stats → log
//! Any startup failure                                   → Failed
//! ```

pub mod account;
pub mod state;

pub use account::{AccountSession, OnboardOutcome, SessionSettings};
pub use state::{SessionState, StateCell};
