//! Service configuration loaded from `config.toml` with environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;
use crate::registry::FsArtifactSource;

/// Default filename used to store the service configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const MODEL_PATH_ENV: &str = "ONCOSERVE_MODEL_PATH";
pub const SCALER_PATH_ENV: &str = "ONCOSERVE_SCALER_PATH";

/// Errors that may occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No usable config directory found.
    #[error("No suitable config directory found: {0}")]
    NoConfigDir(#[from] app_dirs::AppDirError),
    /// An explicitly requested config file does not exist.
    #[error("Config file not found at {path}")]
    Missing { path: PathBuf },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level service settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub artifacts: ArtifactSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the fitted artifacts live. Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSettings {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
        }
    }
}

impl ArtifactSettings {
    pub fn source(&self) -> FsArtifactSource {
        FsArtifactSource::new(&self.scaler_path, &self.model_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a per-launch log file under the app directory.
    #[serde(default)]
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: false,
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("breast_cancer_model.json")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("breast_cancer_scaler.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve the default configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration and apply environment overrides.
///
/// An explicit path must exist; the default location falls back to defaults
/// when no file is present.
pub fn load(explicit: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        Some(path) => load_from(path)?,
        None => {
            let path = config_path()?;
            if path.exists() {
                load_from(&path)?
            } else {
                tracing::debug!("No config at {}; using defaults", path.display());
                ServiceConfig::default()
            }
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Parse a TOML config file.
pub fn load_from(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

impl ServiceConfig {
    /// Override artifact paths from variables resolved by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(MODEL_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.artifacts.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(SCALER_PATH_ENV).filter(|v| !v.trim().is_empty()) {
            self.artifacts.scaler_path = PathBuf::from(path);
        }
    }
}
