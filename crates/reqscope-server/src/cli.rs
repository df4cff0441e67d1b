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
//! Command line flags

use anyhow::Result;
use clap::Parser;
use reqscope_observability::LogFormat;
use std::path::PathBuf;

use crate::config::ServerConfig;

#[derive(Parser, Debug, Default)]
#[command(name = "reqscope-server")]
#[command(version, about = "HTTP server exposing request latency metrics", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./reqscope-server.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log format: pretty, compact or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Log filter, e.g. "info" or "reqscope_server=debug"
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: file, then `PORT`, then flags
    pub fn load_config(&self) -> Result<ServerConfig> {
        let mut config = ServerConfig::load(self.config.as_deref())?;
        config.apply_port_env(std::env::var("PORT").ok().as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Override `config` with the flags that were given
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "reqscope-server",
            "--host",
            "0.0.0.0",
            "-p",
            "8080",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let mut config = ServerConfig::default();
        config.port = 3001;
        cli.apply(&mut config);

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let cli = Cli::try_parse_from(["reqscope-server"]).unwrap();
        let mut config = ServerConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_flags_rejected() {
        assert!(Cli::try_parse_from(["reqscope-server", "--log-format", "xml"]).is_err());
        assert!(Cli::try_parse_from(["reqscope-server", "--port", "70000"]).is_err());
    }
}
