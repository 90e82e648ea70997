// Scanner configuration

use crate::Result;
use crate::constants::{
    DEFAULT_MAX_CONCURRENT_SCANS, DEFAULT_PORT, DEFAULT_TIMEOUT_MS, DEFAULT_WARN_DAYS,
};
use crate::security::{validate_port, validate_timeout_ms, validate_warn_days};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Scanner settings, loadable from TOML. Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub default_port: u16,
    pub timeout_ms: u64,
    pub max_concurrent_scans: usize,
    pub warn_days: u32,
    /// Hosts scanned by `batch` when none are given on the command line
    pub targets: Vec<String>,
    /// Ports tried for every batch target that names no port of its own
    pub ports: Vec<u16>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            warn_days: DEFAULT_WARN_DAYS,
            targets: Vec::new(),
            ports: vec![DEFAULT_PORT],
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e)
        })?;

        let config: ScannerConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

        fs::write(path.as_ref(), toml_str).map_err(|e| {
            anyhow::anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e)
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_port(self.default_port)?;
        validate_timeout_ms(self.timeout_ms)?;
        validate_warn_days(self.warn_days)?;

        if self.max_concurrent_scans == 0 {
            anyhow::bail!("max_concurrent_scans must be at least 1");
        }
        if self.ports.is_empty() {
            anyhow::bail!("ports must list at least one port");
        }
        for port in &self.ports {
            validate_port(*port)?;
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
