//! CLI configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use rvolution_core::DeviceConfig;
use serde::Deserialize;

/// CLI configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Player connection settings.
    /// Overrides: `RVOLUTION_HOST`, `RVOLUTION_TIMEOUT_SECS`
    pub device: DeviceConfig,

    /// Interval in seconds between status polls in `watch`.
    /// Override: `RVOLUTION_POLL_INTERVAL`
    pub poll_interval_secs: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            poll_interval_secs: 10,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies overrides looked up through `lookup`; unparseable values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("RVOLUTION_HOST") {
            if !host.trim().is_empty() {
                self.device.host = host;
            }
        }

        if let Some(val) = lookup("RVOLUTION_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.device.timeout_secs = secs;
            }
        }

        if let Some(val) = lookup("RVOLUTION_POLL_INTERVAL") {
            if let Ok(interval) = val.parse() {
                self.poll_interval_secs = interval;
            }
        }
    }
}
