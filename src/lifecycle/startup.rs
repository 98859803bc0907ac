//! Startup orchestration.
//!
//! # Responsibilities
//! - Read the keys file (fatal when missing or empty)
//! - Read the proxies file (optional)
//! - Pair keys with proxies positionally
//!
//! # Design Decisions
//! - Fail fast: a malformed proxy line or missing key stops startup

use std::path::Path;

use crate::config::{ConfigError, FilesConfig};
use crate::credentials::{load_keys, load_proxies};
use crate::fleet::{assign_proxies, AccountSpec};

/// Load keys and proxies and pair them into account specs.
pub fn load_accounts(files: &FilesConfig) -> Result<Vec<AccountSpec>, ConfigError> {
    let keys = load_keys(Path::new(&files.keys))?;
    let proxies = load_proxies(Path::new(&files.proxies))?;

    tracing::info!(
        accounts = keys.len(),
        proxies = proxies.len(),
        "Credentials loaded"
    );

    Ok(assign_proxies(keys, proxies))
}
