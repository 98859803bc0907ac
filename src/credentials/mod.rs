//! Credential source.
//!
//! # Data Flow
//! ```text
//! keys file    → keys.rs  → Vec<PrivateKey>     (missing or empty: fatal)
//! proxies file → proxy.rs → Vec<ProxyEndpoint>  (missing: empty list)
//!     → fleet runner pairs them positionally
//! ```
//!
//! # Security Constraints
//! - Private keys and proxy passwords are never logged

pub mod keys;
pub mod proxy;

pub use keys::{load_keys, parse_keys, PrivateKey};
pub use proxy::{load_proxies, parse_proxies, ProxyAuth, ProxyEndpoint, ProxyScheme};

/// Trimmed lines that are neither blank nor `#` comments, with 1-based line numbers.
pub(crate) fn significant_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}
