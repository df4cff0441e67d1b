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
//! Gauge primitive

use std::sync::Arc;

use crate::descriptor::MetricDescriptor;
use crate::error::{MetricsError, Result};
use crate::labels::LabelSet;
use crate::series::{AtomicF64, SeriesMap};
use crate::snapshot::{MetricFamily, Sample, SampleValue};

/// Value that can be set, raised or lowered, one per label combination
#[derive(Debug, Clone)]
pub struct Gauge {
    core: Arc<SeriesMap<AtomicF64>>,
}

impl Gauge {
    pub(crate) fn new(desc: MetricDescriptor) -> Result<Self> {
        let gauge = Self {
            core: Arc::new(SeriesMap::new(desc)),
        };
        if gauge.desc().label_names().is_empty() {
            gauge.core.get_or_create(&LabelSet::new(), AtomicF64::default)?;
        }
        Ok(gauge)
    }

    /// Descriptor this gauge was registered with
    pub fn desc(&self) -> &MetricDescriptor {
        self.core.desc()
    }

    /// Set the value
    pub fn set(&self, labels: &LabelSet, value: f64) -> Result<()> {
        self.check(value)?;
        self.core.get_or_create(labels, AtomicF64::default)?.store(value);
        Ok(())
    }

    /// Add `delta` (may be negative)
    pub fn add(&self, labels: &LabelSet, delta: f64) -> Result<()> {
        self.check(delta)?;
        self.core
            .get_or_create(labels, AtomicF64::default)?
            .fetch_add(delta);
        Ok(())
    }

    /// Current value, 0 for a label set never touched
    pub fn value(&self, labels: &LabelSet) -> f64 {
        self.core.get(labels).map(|s| s.load()).unwrap_or(0.0)
    }

    fn check(&self, value: f64) -> Result<()> {
        if value.is_nan() {
            return Err(MetricsError::InvalidArgument(format!(
                "gauge {} cannot take NaN",
                self.desc().name()
            )));
        }
        Ok(())
    }

    pub(crate) fn collect(&self) -> MetricFamily {
        let samples = self
            .core
            .entries()
            .into_iter()
            .map(|(labels, series)| Sample {
                labels,
                value: SampleValue::Gauge(series.load()),
            })
            .collect();

        MetricFamily {
            desc: self.desc().clone(),
            samples,
        }
    }
}
