//! Harness configuration
//!
//! Settings come from the `[test]` table of `atlas.toml`, then environment
//! variables override them:
//! - `ATLAS_NO_COLOR` or `NO_COLOR` disables colored labels
//! - `ATLAS_TEST_TIMEOUT_MS` sets the per-test time budget

use atlas_test_runtime::ExecutionContext;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Test harness configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Column the test name is padded to in outcome lines (default: 60)
    pub name_width: usize,

    /// Colorize outcome labels (default: true)
    pub color: bool,

    /// Per-test time budget in milliseconds (default: 30000)
    pub timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            name_width: 60,
            color: true,
            timeout_ms: 30_000,
        }
    }
}

/// The parts of `atlas.toml` the harness reads
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    test: Option<HarnessConfig>,
}

impl HarnessConfig {
    /// Parse a bare harness table
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: HarnessConfig =
            toml::from_str(source).map_err(|error| ConfigError::TomlParseError {
                file: PathBuf::from("<string>"),
                error,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the `[test]` table of an `atlas.toml`.
    ///
    /// A manifest without a `[test]` table yields the defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let source = fs::read_to_string(path)?;
        let manifest: Manifest =
            toml::from_str(&source).map_err(|error| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error,
            })?;
        let config = manifest.test.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Apply `ATLAS_*` environment overrides
    pub fn with_env_overrides(mut self) -> ConfigResult<Self> {
        if env::var_os("ATLAS_NO_COLOR").is_some() || env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }
        if let Ok(raw) = env::var("ATLAS_TEST_TIMEOUT_MS") {
            self.timeout_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "ATLAS_TEST_TIMEOUT_MS".to_string(),
                reason: format!("expected milliseconds, got '{}'", raw),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.name_width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "name_width".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Factory producing fresh contexts with the configured time budget
    pub fn context_factory(&self) -> impl Fn() -> ExecutionContext {
        let timeout = self.timeout();
        move || ExecutionContext::with_timeout(timeout)
    }
}
