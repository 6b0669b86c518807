//! Tracker configuration, loadable from TOML.
//!
//! ```toml
//! # Longest accepted JSON Pointer, in bytes.
//! max_pointer_length = 1024
//! # Deepest accepted path, in segments.
//! max_path_depth = 256
//! # Verify pending unchecked records before each new mutation is recorded.
//! reconcile_before_record = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use track_changes_pointer::{PointerLimits, MAX_PATH_LENGTH, MAX_POINTER_LENGTH};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_max_pointer_length")]
    pub max_pointer_length: usize,
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: usize,
    #[serde(default = "default_true")]
    pub reconcile_before_record: bool,
}

fn default_max_pointer_length() -> usize {
    MAX_POINTER_LENGTH
}

fn default_max_path_depth() -> usize {
    MAX_PATH_LENGTH
}

fn default_true() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_pointer_length: default_max_pointer_length(),
            max_path_depth: default_max_path_depth(),
            reconcile_before_record: true,
        }
    }
}

impl TrackerConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pointer_length == 0 {
            return Err(ConfigError::Invalid("max_pointer_length must be positive"));
        }
        if self.max_path_depth == 0 {
            return Err(ConfigError::Invalid("max_path_depth must be positive"));
        }
        Ok(())
    }

    pub fn limits(&self) -> PointerLimits {
        PointerLimits {
            max_pointer_length: self.max_pointer_length,
            max_path_depth: self.max_path_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.limits(), PointerLimits::default());
    }

    #[test]
    fn test_partial_override() {
        let config = TrackerConfig::from_toml_str(
            "max_path_depth = 8\nreconcile_before_record = false\n",
        )
        .unwrap();
        assert_eq!(config.max_path_depth, 8);
        assert_eq!(config.max_pointer_length, MAX_POINTER_LENGTH);
        assert!(!config.reconcile_before_record);
    }

    #[test]
    fn test_rejects_zero_limits() {
        let err = TrackerConfig::from_toml_str("max_pointer_length = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = TrackerConfig::from_toml_str("max_path_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_pointer_length = 64").unwrap();
        let config = TrackerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_pointer_length, 64);

        let missing = TrackerConfig::from_file(Path::new("/nonexistent/track-changes.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
