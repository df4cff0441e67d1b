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
//! Per-request instrumentation
//!
//! The route layer calls [`RequestMetrics::record`] exactly once for every
//! completed request, whatever its outcome. Nothing here deduplicates.

use tracing::trace;

use crate::counter::Counter;
use crate::descriptor::{HistogramOpts, Opts};
use crate::error::Result;
use crate::histogram::Histogram;
use crate::labels::LabelSet;
use crate::registry::Registry;

/// Name of the request counter
pub const TOTAL_REQUESTS: &str = "total_req";

/// Name of the request duration histogram
pub const REQUEST_DURATION: &str = "http_express_req_res_time";

/// Bucket bounds of the request duration histogram, in milliseconds
pub const REQUEST_DURATION_BUCKETS: [f64; 9] =
    [1.0, 50.0, 100.0, 200.0, 400.0, 500.0, 800.0, 1000.0, 2000.0];

/// Outcome of one completed request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    /// HTTP method
    pub method: String,
    /// Route or path the request was served on
    pub route: String,
    /// Response status code
    pub status_code: u16,
    /// Wall-clock time from request start to response completion
    pub elapsed_ms: f64,
}

/// Request counter and latency histogram
#[derive(Debug, Clone)]
pub struct RequestMetrics {
    total_requests: Counter,
    duration: Histogram,
}

impl RequestMetrics {
    /// Register the request metrics in `registry`
    ///
    /// Fails with `DuplicateMetric` if they are already registered.
    pub fn new(registry: &Registry) -> Result<Self> {
        let total_requests =
            registry.register_counter(Opts::new(TOTAL_REQUESTS, "Tells total req"), &[])?;

        let duration = registry.register_histogram(
            HistogramOpts::new(
                REQUEST_DURATION,
                "Time taken to process requests in milliseconds",
            )
            .buckets(REQUEST_DURATION_BUCKETS.to_vec()),
            &["method", "route", "status_code"],
        )?;

        Ok(Self {
            total_requests,
            duration,
        })
    }

    /// Record one completed request
    ///
    /// The counter is incremented first; an invalid `elapsed_ms` is reported
    /// after that increment and leaves the histogram unchanged.
    pub fn record(&self, method: &str, route: &str, status_code: u16, elapsed_ms: f64) -> Result<()> {
        self.total_requests.inc(&LabelSet::new())?;

        let labels = LabelSet::new()
            .with("method", method)
            .with("route", route)
            .with("status_code", status_code.to_string());
        self.duration.observe(&labels, elapsed_ms)?;

        trace!(method, route, status_code, elapsed_ms, "Recorded request");
        Ok(())
    }

    /// Record a [`RequestOutcome`]
    pub fn record_outcome(&self, outcome: &RequestOutcome) -> Result<()> {
        self.record(
            &outcome.method,
            &outcome.route,
            outcome.status_code,
            outcome.elapsed_ms,
        )
    }

    /// Request counter handle
    pub fn total_requests(&self) -> &Counter {
        &self.total_requests
    }

    /// Duration histogram handle
    pub fn duration(&self) -> &Histogram {
        &self.duration
    }
}
