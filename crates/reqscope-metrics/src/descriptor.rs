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
//! Metric descriptors and registration options

use crate::error::{MetricsError, Result};
use crate::labels::LabelSet;
use crate::types::MetricType;

/// Name and help text for a metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Metric name
    pub name: String,
    /// Help text shown on the `# HELP` line
    pub help: String,
}

impl Opts {
    /// Create options from a name and help text
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
        }
    }
}

/// Options for a histogram: name, help and bucket upper bounds
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramOpts {
    /// Name and help
    pub common: Opts,
    /// Finite, strictly increasing upper bounds. `+Inf` is implicit.
    pub buckets: Vec<f64>,
}

impl HistogramOpts {
    /// Create histogram options with [`crate::DEFAULT_BUCKETS`]
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            common: Opts::new(name, help),
            buckets: crate::histogram::DEFAULT_BUCKETS.to_vec(),
        }
    }

    /// Replace the bucket bounds
    pub fn buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = buckets;
        self
    }
}

/// Immutable description of a registered metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    name: String,
    help: String,
    kind: MetricType,
    label_names: Vec<String>,
}

impl MetricDescriptor {
    /// Validate and build a descriptor
    pub fn new(kind: MetricType, opts: Opts, label_names: &[&str]) -> Result<Self> {
        if !is_valid_metric_name(&opts.name) {
            return Err(MetricsError::InvalidDescriptor(format!(
                "invalid metric name '{}'",
                opts.name
            )));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(label_names.len());
        for &label in label_names {
            if !is_valid_label_name(label) {
                return Err(MetricsError::InvalidDescriptor(format!(
                    "invalid label name '{}' on {}",
                    label, opts.name
                )));
            }
            if kind == MetricType::Histogram && label == "le" {
                return Err(MetricsError::InvalidDescriptor(format!(
                    "label 'le' is reserved on histogram {}",
                    opts.name
                )));
            }
            if seen.contains(&label) {
                return Err(MetricsError::InvalidDescriptor(format!(
                    "duplicate label name '{}' on {}",
                    label, opts.name
                )));
            }
            seen.push(label);
        }

        Ok(Self {
            name: opts.name,
            help: opts.help,
            kind,
            label_names: label_names.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Metric name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Metric kind
    pub fn kind(&self) -> MetricType {
        self.kind
    }

    /// Label names in declaration order
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Check that `labels` carries exactly the declared label names
    pub fn check_labels(&self, labels: &LabelSet) -> Result<()> {
        let matches = labels.len() == self.label_names.len()
            && self
                .label_names
                .iter()
                .all(|name| labels.get(name).is_some());

        if matches {
            Ok(())
        } else {
            Err(MetricsError::LabelMismatch {
                metric: self.name.clone(),
                expected: self.label_names.clone(),
                got: labels.names(),
            })
        }
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, not starting with `__`
pub fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
