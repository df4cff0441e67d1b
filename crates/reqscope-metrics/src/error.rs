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
//! Error types for metric registration and recording

use thiserror::Error;

/// Errors produced by metric primitives and the registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// A value was rejected by a primitive (negative counter delta, NaN observation)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A metric with the same name is already registered
    #[error("Metric already registered: {0}")]
    DuplicateMetric(String),

    /// Metric name, label names or bucket layout are malformed
    #[error("Invalid metric descriptor: {0}")]
    InvalidDescriptor(String),

    /// The label names supplied do not match the metric's label schema
    #[error("Label mismatch for {metric}: expected {expected:?}, got {got:?}")]
    LabelMismatch {
        /// Metric name
        metric: String,
        /// Label names declared at registration
        expected: Vec<String>,
        /// Label names supplied by the caller
        got: Vec<String>,
    },

    /// A collector could not read one process or runtime fact
    #[error("Failed to sample {metric}: {reason}")]
    CollectorSampleFailure {
        /// Metric that could not be sampled
        metric: String,
        /// Underlying cause
        reason: String,
    },
}

impl MetricsError {
    pub(crate) fn sample_failure(metric: &str, reason: impl ToString) -> Self {
        MetricsError::CollectorSampleFailure {
            metric: metric.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MetricsError>;
