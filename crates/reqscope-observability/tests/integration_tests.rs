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
//! Integration tests for logging setup
//!
//! A global subscriber can be installed once per process, so exactly one
//! test here installs it.

use reqscope_observability::{
    init_tracing, init_tracing_with_config, request_span, LogConfig, LogError, LogFormat,
    LogOutput, DEFAULT_APP_NAME,
};

#[test]
fn test_config_from_toml_style_map() {
    let config: LogConfig = serde_json::from_value(serde_json::json!({
        "format": "json",
        "level": "reqscope_server=debug",
        "output": "stdout",
        "include_thread_ids": true,
    }))
    .unwrap();

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.output, LogOutput::Stdout);
    assert!(config.include_thread_ids);
    assert_eq!(config.app_name, DEFAULT_APP_NAME);
    assert_eq!(config.effective_filter(), "reqscope_server=debug");
}

#[test]
fn test_builder_matches_fields() {
    let config = LogConfig::new()
        .with_format(LogFormat::Compact)
        .with_app_name("express")
        .with_color(false)
        .with_timestamps(false)
        .with_targets(false)
        .with_output(LogOutput::Stdout);

    assert_eq!(
        config,
        LogConfig {
            format: LogFormat::Compact,
            app_name: "express".to_string(),
            use_color: false,
            use_timestamps: false,
            include_targets: false,
            output: LogOutput::Stdout,
            ..LogConfig::default()
        }
    );
}

#[test]
fn test_invalid_filter_does_not_install() {
    let result = init_tracing_with_config(LogConfig::new().with_level("reqscope=verbose"));
    assert!(matches!(result, Err(LogError::InvalidFilter { .. })));
}

#[test]
fn test_install_once() {
    let config = LogConfig::new()
        .with_format(LogFormat::Json)
        .with_level("info")
        .with_output(LogOutput::Stdout);
    init_tracing_with_config(config).unwrap();

    let span = request_span!(DEFAULT_APP_NAME, "GET", "/");
    span.in_scope(|| tracing::info!("logged inside request span"));

    let again = init_tracing(LogFormat::Pretty, Some("debug"));
    assert!(matches!(again, Err(LogError::AlreadyInitialized(_))));
}
