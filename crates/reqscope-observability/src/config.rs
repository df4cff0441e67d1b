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
//! Logging configuration
//!
//! Output format, level filter and line decorations for the subscriber
//! installed at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default value of the `app` field on request spans
pub const DEFAULT_APP_NAME: &str = "reqscope";

/// Filter used when neither the config nor `RUST_LOG` names one
pub const DEFAULT_FILTER: &str = "info";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    #[error("Invalid log output: {0}")]
    InvalidOutput(String),

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Line format of the `fmt` layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable
    #[default]
    Pretty,
    Compact,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub const ALL: [LogFormat; 3] = [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LogError::InvalidFormat(format!(
                    "{} (expected one of: pretty, compact, json)",
                    s
                ))
            })
    }
}

/// Stream the log lines are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stderr,
    Stdout,
}

impl FromStr for LogOutput {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" => Ok(LogOutput::Stderr),
            "stdout" => Ok(LogOutput::Stdout),
            other => Err(LogError::InvalidOutput(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,

    /// `EnvFilter` directives, e.g. "info" or "reqscope_server=debug".
    /// `RUST_LOG` applies when unset.
    pub level: Option<String>,

    /// Value of the `app` field on request spans
    pub app_name: String,

    /// ANSI colours (ignored for JSON)
    pub use_color: bool,

    pub use_timestamps: bool,
    pub include_thread_ids: bool,
    pub include_targets: bool,

    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: None,
            app_name: DEFAULT_APP_NAME.to_string(),
            use_color: true,
            use_timestamps: true,
            include_thread_ids: false,
            include_targets: true,
            output: LogOutput::default(),
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    pub fn with_thread_ids(mut self, include_thread_ids: bool) -> Self {
        self.include_thread_ids = include_thread_ids;
        self
    }

    pub fn with_targets(mut self, include_targets: bool) -> Self {
        self.include_targets = include_targets;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Root span carrying the `app` field.
    ///
    /// Events logged outside a request span get `app` from this span once it
    /// is entered. Create it after the subscriber is installed.
    pub fn app_span(&self) -> tracing::Span {
        tracing::info_span!("app", app = %self.app_name)
    }

    /// Filter directives in effect: the configured level, else `RUST_LOG`,
    /// else [`DEFAULT_FILTER`]
    pub fn effective_filter(&self) -> String {
        self.resolve_filter(std::env::var("RUST_LOG").ok())
    }

    fn resolve_filter(&self, from_env: Option<String>) -> String {
        self.level
            .clone()
            .or(from_env)
            .filter(|directives| !directives.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}
