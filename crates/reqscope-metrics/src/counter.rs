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
//! Counter primitive

use std::sync::Arc;

use crate::descriptor::MetricDescriptor;
use crate::error::{MetricsError, Result};
use crate::labels::LabelSet;
use crate::series::{AtomicF64, SeriesMap};
use crate::snapshot::{MetricFamily, Sample, SampleValue};

/// Monotonically non-decreasing total, one per label combination
///
/// Cloning is cheap and every clone updates the same series.
#[derive(Debug, Clone)]
pub struct Counter {
    core: Arc<SeriesMap<AtomicF64>>,
}

impl Counter {
    pub(crate) fn new(desc: MetricDescriptor) -> Result<Self> {
        let counter = Self {
            core: Arc::new(SeriesMap::new(desc)),
        };
        // Unlabelled counters are exported as 0 before the first increment
        if counter.desc().label_names().is_empty() {
            counter.core.get_or_create(&LabelSet::new(), AtomicF64::default)?;
        }
        Ok(counter)
    }

    /// Descriptor this counter was registered with
    pub fn desc(&self) -> &MetricDescriptor {
        self.core.desc()
    }

    /// Add 1
    pub fn inc(&self, labels: &LabelSet) -> Result<()> {
        self.inc_by(labels, 1.0)
    }

    /// Add `delta`, which must be finite and non-negative
    pub fn inc_by(&self, labels: &LabelSet, delta: f64) -> Result<()> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(MetricsError::InvalidArgument(format!(
                "counter {} cannot be incremented by {}",
                self.desc().name(),
                delta
            )));
        }

        let series = self.core.get_or_create(labels, AtomicF64::default)?;
        series.fetch_add(delta);
        Ok(())
    }

    /// Current total, 0 for a label set never incremented
    pub fn value(&self, labels: &LabelSet) -> f64 {
        self.core.get(labels).map(|s| s.load()).unwrap_or(0.0)
    }

    pub(crate) fn collect(&self) -> MetricFamily {
        let samples = self
            .core
            .entries()
            .into_iter()
            .map(|(labels, series)| Sample {
                labels,
                value: SampleValue::Counter(series.load()),
            })
            .collect();

        MetricFamily {
            desc: self.desc().clone(),
            samples,
        }
    }
}
