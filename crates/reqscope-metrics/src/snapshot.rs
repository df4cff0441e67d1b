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
//! Point-in-time copies of registry state

use crate::descriptor::MetricDescriptor;
use crate::labels::LabelSet;

/// Copied state of one histogram series
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSample {
    /// `(upper_bound, cumulative_count)` for every finite bound, ascending
    pub buckets: Vec<(f64, u64)>,
    /// Total observations, which is also the `+Inf` bucket
    pub count: u64,
    /// Sum of all observed values
    pub sum: f64,
}

/// Value of one series
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    /// Counter total
    Counter(f64),
    /// Gauge value
    Gauge(f64),
    /// Histogram buckets, count and sum
    Histogram(HistogramSample),
}

/// One series of a metric family
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Label values identifying the series
    pub labels: LabelSet,
    /// Copied accumulator state
    pub value: SampleValue,
}

/// A metric and all of its series
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    /// Descriptor of the metric
    pub desc: MetricDescriptor,
    /// Series in first-seen order
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Family with a single unlabelled sample
    pub fn single(desc: MetricDescriptor, value: SampleValue) -> Self {
        Self {
            desc,
            samples: vec![Sample {
                labels: LabelSet::new(),
                value,
            }],
        }
    }

    /// Sample for an exact label set
    pub fn sample(&self, labels: &LabelSet) -> Option<&Sample> {
        self.samples.iter().find(|s| &s.labels == labels)
    }
}

/// Immutable copy of every registered metric, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    families: Vec<MetricFamily>,
}

impl Snapshot {
    pub(crate) fn new(families: Vec<MetricFamily>) -> Self {
        Self { families }
    }

    /// All families
    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    /// Family by metric name
    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.iter().find(|f| f.desc.name() == name)
    }

    /// Number of families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// True when nothing was collected
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}
