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
use reqscope_metrics::{MetricsError, ProcessCollector, Registry, RequestMetrics};

use crate::config::ServerConfig;
use crate::heavy_task::HeavyTask;

/// Shared application state
pub struct AppState {
    /// Value of the `app` field on request spans
    pub app_name: String,

    /// Registry served on `/metrics`
    pub registry: Registry,

    /// Request counter and latency histogram
    pub requests: RequestMetrics,

    /// Work performed by `/slow`
    pub heavy_task: HeavyTask,
}

impl AppState {
    /// Create state with a fresh registry
    pub fn new(config: &ServerConfig) -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new(), config)
    }

    /// Register the request metrics and the process collector in `registry`.
    ///
    /// Fails with `DuplicateMetric` if `registry` already holds any of them.
    pub fn with_registry(registry: Registry, config: &ServerConfig) -> Result<Self, MetricsError> {
        let requests = RequestMetrics::new(&registry)?;
        let process = ProcessCollector::with_prefix(&config.metrics_prefix)?;
        registry.register_collector(Box::new(process))?;

        Ok(Self {
            app_name: config.app_name.clone(),
            registry,
            requests,
            heavy_task: HeavyTask::new(&config.slow_task),
        })
    }
}
