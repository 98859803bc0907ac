//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::FleetConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic validation failed.
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The key file yielded no usable keys.
    #[error("no private keys found in {0}")]
    NoCredentials(PathBuf),

    /// A proxy line could not be parsed.
    #[error("invalid proxy on line {line}: {reason}")]
    InvalidProxy { line: usize, reason: String },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a file into a string, attaching the path to the error.
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FleetConfig, ConfigError> {
    let content = read_file(path)?;
    let config: FleetConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://api.example.com\"\n\n[schedule]\nstagger_secs = 1"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.schedule.stagger_secs, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/node-fleet.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/node-fleet.toml"));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retries]\nmax_attempts = 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("retries.max_attempts"));
    }
}
