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
//! Metrics registry shared by request handlers and the exposition endpoint

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::collector::Collector;
use crate::counter::Counter;
use crate::descriptor::{HistogramOpts, MetricDescriptor, Opts};
use crate::error::{MetricsError, Result};
use crate::gauge::Gauge;
use crate::histogram::Histogram;
use crate::snapshot::{MetricFamily, Snapshot};
use crate::types::MetricType;

/// Handle to a registered primitive
#[derive(Debug, Clone)]
pub enum Metric {
    /// Counter handle
    Counter(Counter),
    /// Gauge handle
    Gauge(Gauge),
    /// Histogram handle
    Histogram(Histogram),
}

impl Metric {
    /// Descriptor of the underlying primitive
    pub fn desc(&self) -> &MetricDescriptor {
        match self {
            Metric::Counter(c) => c.desc(),
            Metric::Gauge(g) => g.desc(),
            Metric::Histogram(h) => h.desc(),
        }
    }

    /// Counter handle, if this is a counter
    pub fn as_counter(&self) -> Option<&Counter> {
        match self {
            Metric::Counter(c) => Some(c),
            _ => None,
        }
    }

    /// Gauge handle, if this is a gauge
    pub fn as_gauge(&self) -> Option<&Gauge> {
        match self {
            Metric::Gauge(g) => Some(g),
            _ => None,
        }
    }

    /// Histogram handle, if this is a histogram
    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Metric::Histogram(h) => Some(h),
            _ => None,
        }
    }

    fn collect(&self) -> MetricFamily {
        match self {
            Metric::Counter(c) => c.collect(),
            Metric::Gauge(g) => g.collect(),
            Metric::Histogram(h) => h.collect(),
        }
    }
}

#[derive(Clone)]
enum Entry {
    Metric(Metric),
    Collector(Arc<dyn Collector>),
}

#[derive(Default)]
struct RegistryState {
    /// Registration order
    entries: Vec<Entry>,
    /// Metric name to index in `entries`
    names: HashMap<String, usize>,
}

/// Central metrics registry
///
/// Thread-safe registry that can be cloned and shared across async tasks.
/// Created once at startup and handed to every component that records or
/// exposes metrics.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<RegistryState>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter
    pub fn register_counter(&self, opts: Opts, label_names: &[&str]) -> Result<Counter> {
        let counter = Counter::new(MetricDescriptor::new(MetricType::Counter, opts, label_names)?)?;
        self.insert(
            vec![counter.desc().name().to_string()],
            Entry::Metric(Metric::Counter(counter.clone())),
        )?;
        Ok(counter)
    }

    /// Register a gauge
    pub fn register_gauge(&self, opts: Opts, label_names: &[&str]) -> Result<Gauge> {
        let gauge = Gauge::new(MetricDescriptor::new(MetricType::Gauge, opts, label_names)?)?;
        self.insert(
            vec![gauge.desc().name().to_string()],
            Entry::Metric(Metric::Gauge(gauge.clone())),
        )?;
        Ok(gauge)
    }

    /// Register a histogram
    pub fn register_histogram(&self, opts: HistogramOpts, label_names: &[&str]) -> Result<Histogram> {
        let histogram = Histogram::new(opts, label_names)?;
        self.insert(
            vec![histogram.desc().name().to_string()],
            Entry::Metric(Metric::Histogram(histogram.clone())),
        )?;
        Ok(histogram)
    }

    /// Register a collector; all of its declared names are reserved
    pub fn register_collector(&self, collector: Box<dyn Collector>) -> Result<()> {
        let names = collector
            .descriptors()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        self.insert(names, Entry::Collector(Arc::from(collector)))
    }

    fn insert(&self, names: Vec<String>, entry: Entry) -> Result<()> {
        let mut state = self.inner.write();

        for (i, name) in names.iter().enumerate() {
            if state.names.contains_key(name) || names[..i].contains(name) {
                return Err(MetricsError::DuplicateMetric(name.clone()));
            }
        }

        let idx = state.entries.len();
        state.entries.push(entry);
        for name in names {
            debug!("Registered metric {}", name);
            state.names.insert(name, idx);
        }
        Ok(())
    }

    /// Registered primitive by name
    ///
    /// Names claimed by collectors are reserved but have no handle.
    pub fn get(&self, name: &str) -> Option<Metric> {
        let state = self.inner.read();
        let idx = *state.names.get(name)?;
        match &state.entries[idx] {
            Entry::Metric(metric) => Some(metric.clone()),
            Entry::Collector(_) => None,
        }
    }

    /// True when `name` is registered or reserved by a collector
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().names.contains_key(name)
    }

    /// Point-in-time copy of every metric
    ///
    /// Collectors are sampled here. The registry lock is only held while the
    /// entry list is cloned; each series is then copied under its own lock,
    /// so concurrent updates are never blocked for longer than one copy.
    pub fn snapshot(&self) -> Snapshot {
        let entries = self.inner.read().entries.clone();

        let mut families = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                Entry::Metric(metric) => families.push(metric.collect()),
                Entry::Collector(collector) => families.extend(collector.collect()),
            }
        }
        Snapshot::new(families)
    }
}
