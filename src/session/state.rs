//! Account session state machine.
//!
//! # States
//! ```text
//! Unauthenticated → Authenticated → Onboarded → SteadyState
//!        └──────────────┴──────────────┴─────→ Failed (startup only)
//! ```
//!
//! Phases only move forward; re-authentication during steady state
//! does not demote the session.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::observability::metrics;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Unauthenticated = 0,
    Authenticated = 1,
    Onboarded = 2,
    SteadyState = 3,
    Failed = 4,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
            SessionState::Onboarded => "onboarded",
            SessionState::SteadyState => "steady_state",
            SessionState::Failed => "failed",
        }
    }
}

impl From<u8> for SessionState {
    fn from(val: u8) -> Self {
        match val {
            1 => SessionState::Authenticated,
            2 => SessionState::Onboarded,
            3 => SessionState::SteadyState,
            4 => SessionState::Failed,
            _ => SessionState::Unauthenticated,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lock-free holder of a session's current state.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(SessionState::Unauthenticated as u8))
    }

    pub fn get(&self) -> SessionState {
        SessionState::from(self.0.load(Ordering::SeqCst))
    }

    /// Move forward to `next` if it is later than the current state.
    /// Returns true when the state changed. A failed session stays failed.
    pub fn advance(&self, next: SessionState) -> bool {
        let changed = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                let current = SessionState::from(current);
                (current != SessionState::Failed && next > current).then_some(next as u8)
            })
            .is_ok();
        if changed {
            metrics::record_session_transition(next.as_str());
        }
        changed
    }

    /// Mark the session as failed.
    pub fn fail(&self) {
        let previous = self.0.swap(SessionState::Failed as u8, Ordering::SeqCst);
        if previous != SessionState::Failed as u8 {
            metrics::record_session_transition(SessionState::Failed.as_str());
        }
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only() {
        let state = StateCell::new();
        assert_eq!(state.get(), SessionState::Unauthenticated);

        assert!(state.advance(SessionState::Authenticated));
        assert!(state.advance(SessionState::SteadyState));
        // Re-authentication in steady state does not demote.
        assert!(!state.advance(SessionState::Authenticated));
        assert_eq!(state.get(), SessionState::SteadyState);
    }

    #[test]
    fn test_failed_is_terminal() {
        let state = StateCell::new();
        state.advance(SessionState::Authenticated);
        state.fail();
        assert_eq!(state.get(), SessionState::Failed);
        assert!(!state.advance(SessionState::Onboarded));
        assert_eq!(state.get(), SessionState::Failed);
    }

    #[test]
    fn test_u8_round_trip() {
        for s in [
            SessionState::Unauthenticated,
            SessionState::Authenticated,
            SessionState::Onboarded,
            SessionState::SteadyState,
            SessionState::Failed,
        ] {
            assert_eq!(SessionState::from(s as u8), s);
        }
        assert_eq!(SessionState::from(99), SessionState::Unauthenticated);
    }
}
