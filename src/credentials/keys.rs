//! Private key list loading.

use std::fmt;
use std::path::Path;

use crate::config::loader::{read_file, ConfigError};
use crate::credentials::significant_lines;

/// An account's private signing key.
///
/// The raw value is never printed; `Debug` is fully redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Raw key material, as written by the operator.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

/// Parse keys from file content: one per line, `#` comments and blanks skipped.
pub fn parse_keys(content: &str) -> Vec<PrivateKey> {
    significant_lines(content)
        .map(|(_, line)| PrivateKey::new(line))
        .collect()
}

/// Load the key file. A missing file or a file without keys is fatal.
pub fn load_keys(path: &Path) -> Result<Vec<PrivateKey>, ConfigError> {
    let content = read_file(path)?;
    let keys = parse_keys(&content);

    if keys.is_empty() {
        return Err(ConfigError::NoCredentials(path.to_path_buf()));
    }

    tracing::info!(path = %path.display(), count = keys.len(), "Private keys loaded");
    Ok(keys)
}
