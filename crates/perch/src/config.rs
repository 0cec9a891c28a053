//! TOML configuration for the `perch` CLI.
//!
//! Without `-c`, `~/.perch/perch.toml` is read if it exists; otherwise
//! every setting takes its default and the built-in logs are used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use perch_engine::DEFAULT_REFRESH_INTERVAL;
use perch_log::LogConfig;
use perch_witness::DEFAULT_DISTRIBUTOR_URL;
use serde::Deserialize;
use tracing::debug;

use crate::logs::builtin_logs;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PerchConfig {
    /// Witness distributor.
    pub distributor: DistributorSection,
    /// Background refresh and quorum.
    pub refresh: RefreshSection,
    /// Logging configuration.
    pub log: LogSection,
    /// Logs to inspect, in order; the first is selected by default.
    pub logs: Vec<LogConfig>,
}

/// `[distributor]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DistributorSection {
    /// Base URL of the distributor API.
    pub url: String,
}

impl Default for DistributorSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DISTRIBUTOR_URL.to_string(),
        }
    }
}

/// `[refresh]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    /// Seconds between checkpoint refreshes.
    pub interval_secs: u64,
    /// Initial witness quorum size.
    pub witnesses: usize,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_REFRESH_INTERVAL.as_secs(),
            witnesses: 1,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PerchConfig {
    /// Load config from a TOML file, falling back to the default location.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path)?;
        let config: PerchConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Configured logs, or the built-in set when none are listed.
    pub fn log_configs(&self) -> Vec<LogConfig> {
        if self.logs.is_empty() {
            builtin_logs()
        } else {
            self.logs.clone()
        }
    }

    /// Time between background refreshes. Never zero.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs.max(1))
    }
}

/// `~/.perch/perch.toml`.
fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".perch").join("perch.toml"))
}
