//! Fleet subsystem.
//!
//! # Data Flow
//! ```text
//! keys + proxies → assign_proxies → Vec<AccountSpec>
//!     → runner.rs: for each account, sleep i * stagger, build transport + session, start()
//!     → FleetReport { started, failed, sessions, handles }
//! ```
//!
//! # Design Decisions
//! - Positional pairing: account i gets proxy i when one exists
//! - A failing account never stops the rest of the fleet

pub mod runner;

pub use runner::{FleetReport, FleetRunner};

use crate::credentials::{PrivateKey, ProxyEndpoint};

/// One account to run: its key and optional proxy.
#[derive(Debug, Clone)]
pub struct AccountSpec {
    pub index: usize,
    pub key: PrivateKey,
    pub proxy: Option<ProxyEndpoint>,
}

/// Pair keys with proxies by position. Extra proxies are ignored.
pub fn assign_proxies(keys: Vec<PrivateKey>, proxies: Vec<ProxyEndpoint>) -> Vec<AccountSpec> {
    if proxies.len() > keys.len() {
        tracing::debug!(
            unused = proxies.len() - keys.len(),
            "More proxies than accounts"
        );
    }

    let mut proxies = proxies.into_iter();
    keys.into_iter()
        .enumerate()
        .map(|(index, key)| {
            let proxy = proxies.next();
            if proxy.is_none() {
                tracing::warn!(account = index, "No proxy available, connecting directly");
            }
            AccountSpec { index, key, proxy }
        })
        .collect()
}
