// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration file loading
//!
//! Lookup order: an explicit path, then `SCHEDCTL_CONFIG`, then
//! `<config dir>/schedctl/config.toml`. The first two must exist; the last
//! one is optional and defaults apply when it is absent.

use crate::folder::FolderPath;
use crate::trigger::DEFAULT_START_DELAY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "SCHEDCTL_CONFIG";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also append logs to this file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Author recorded on definitions when no username is supplied
    #[serde(default)]
    pub author: Option<String>,
    /// Folder used when a command gets no `--folder`
    #[serde(default)]
    pub default_folder: FolderPath,
    /// Offset from now for daily/once triggers without an explicit time
    #[serde(default = "default_delay", with = "humantime_serde")]
    pub default_delay: Duration,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_delay() -> Duration {
    DEFAULT_START_DELAY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: None,
            default_folder: FolderPath::root(),
            default_delay: default_delay(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration following the documented lookup order
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::load_from(explicit, from_env.as_deref(), Self::default_path().as_deref())
    }

    fn load_from(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        default_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.or(from_env) {
            return Self::from_file(path);
        }
        match default_path {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/schedctl/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("schedctl").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            default_delay = %humantime::format_duration(config.default_delay),
            "loaded config"
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Default author identity: the configured one, else the current account
    pub fn resolved_author(&self) -> String {
        self.author
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(whoami::username)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
