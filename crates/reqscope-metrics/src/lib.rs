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
//! reqscope Metrics Module
//!
//! Metric primitives, a label-aware registry and Prometheus text exposition
//! for HTTP request telemetry.
//!
//! # Features
//!
//! - **Typed primitives**: [`Counter`], [`Gauge`] and [`Histogram`] with label schemas
//! - **Per-series locking**: updates to different label combinations never contend
//! - **Deterministic exposition**: registration order, first-seen series order
//! - **Process collectors**: CPU, memory, file descriptors and uptime sampled on scrape
//! - **HTTP Endpoint**: Axum-based `/metrics` endpoint for scraping
//!
//! # Example
//!
//! ```ignore
//! use reqscope_metrics::{ProcessCollector, Registry, RequestMetrics};
//!
//! let registry = Registry::new();
//! registry.register_collector(Box::new(ProcessCollector::for_self()?))?;
//! let requests = RequestMetrics::new(&registry)?;
//!
//! requests.record("GET", "/", 200, 3.2)?;
//!
//! let (content_type, body) = reqscope_metrics::render(&registry);
//! ```

pub mod collector;
pub mod counter;
pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod gauge;
pub mod histogram;
pub mod instrumentation;
pub mod labels;
pub mod process;
pub mod registry;
mod series;
pub mod server;
pub mod snapshot;
pub mod types;

pub use collector::Collector;
pub use counter::Counter;
pub use descriptor::{HistogramOpts, MetricDescriptor, Opts};
pub use encoder::{render, TextEncoder, TEXT_FORMAT};
pub use error::{MetricsError, Result};
pub use gauge::Gauge;
pub use histogram::{exponential_buckets, linear_buckets, Histogram, HistogramState, DEFAULT_BUCKETS};
pub use instrumentation::{RequestMetrics, RequestOutcome};
pub use labels::LabelSet;
pub use process::ProcessCollector;
pub use registry::{Metric, Registry};
pub use server::{MetricsConfig, MetricsServer};
pub use snapshot::{HistogramSample, MetricFamily, Sample, SampleValue, Snapshot};
pub use types::MetricType;
