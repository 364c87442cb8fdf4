use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub elevation: ElevationConfig,
    pub units: UnitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound of the parallel scan pool
    pub max_scan_workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Elevation helper, looked up on PATH unless absolute
    pub helper: String,
    /// Executable of this program, looked up on PATH unless absolute
    pub program: String,
    /// Hidden subcommand the elevated child runs
    pub subcommand: String,
    /// Wall-clock limit for the elevated child in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    /// Unit ids that are never registered
    pub disabled: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_scan_workers: 4 }
    }
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            helper: "pkexec".to_string(),
            program: "sweep".to_string(),
            subcommand: "clean-as-root".to_string(),
            timeout_secs: 300,
        }
    }
}

impl ElevationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default
    /// location is read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/sweep/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sweep").join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_scan_workers == 0 {
            return Err(ConfigError::Invalid(
                "engine.max_scan_workers must be at least 1".into(),
            ));
        }
        if self.elevation.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "elevation.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.elevation.helper.trim().is_empty() || self.elevation.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "elevation.helper and elevation.program must not be empty".into(),
            ));
        }
        Ok(())
    }
}
