// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Server configuration
//!
//! Loaded from `reqscope-server.toml` when present, then overridden by the
//! `PORT` environment variable and finally by command line flags.

use anyhow::{bail, Context, Result};
use reqscope_observability::{LogConfig, LogFormat, DEFAULT_APP_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "reqscope-server.toml";

/// Delay choices for the `/slow` route, in milliseconds
pub const DEFAULT_SLOW_DELAYS_MS: [u64; 9] = [100, 150, 200, 300, 600, 500, 1000, 1400, 2500];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Log output format
    pub log_format: LogFormat,

    /// Log filter; `RUST_LOG` applies when unset
    pub log_level: Option<String>,

    /// Value of the `app` field on request spans
    pub app_name: String,

    /// Prefix for the process metric names
    pub metrics_prefix: String,

    /// Behaviour of the `/slow` route
    pub slow_task: SlowTaskConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowTaskConfig {
    /// Candidate delays, one picked uniformly per request
    pub delays_ms: Vec<u64>,

    /// Probability in `[0, 1]` that a request fails
    pub failure_rate: f64,
}

impl Default for SlowTaskConfig {
    fn default() -> Self {
        Self {
            delays_ms: DEFAULT_SLOW_DELAYS_MS.to_vec(),
            failure_rate: 0.1,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_format: LogFormat::default(),
            log_level: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            metrics_prefix: String::new(),
            slow_task: SlowTaskConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `path`, or from `reqscope-server.toml` in the
    /// current directory, or use defaults.
    ///
    /// An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    tracing::info!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply the value of the `PORT` environment variable, if set
    pub fn apply_port_env(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {:?}", port))?;
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.slow_task.delays_ms.is_empty() {
            bail!("slow_task.delays_ms must not be empty");
        }
        if !(0.0..=1.0).contains(&self.slow_task.failure_rate) {
            bail!(
                "slow_task.failure_rate must be within [0, 1], got {}",
                self.slow_task.failure_rate
            );
        }
        Ok(())
    }

    /// Get the full bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Logging setup derived from this configuration
    pub fn log_config(&self) -> LogConfig {
        let config = LogConfig::new()
            .with_format(self.log_format)
            .with_app_name(self.app_name.clone());

        match &self.log_level {
            Some(level) => config.with_level(level.clone()),
            None => config,
        }
    }
}
