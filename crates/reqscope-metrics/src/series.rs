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
//! Per-metric series storage
//!
//! Each metric owns one [`SeriesMap`]. The map itself sits behind a
//! read-write lock that is only taken for writing when a new label
//! combination shows up; the series state lives behind its own `Arc` so that
//! updates to different series never contend on a shared lock.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::descriptor::MetricDescriptor;
use crate::error::Result;
use crate::labels::LabelSet;

/// `f64` stored as its bit pattern in an `AtomicU64`
#[derive(Debug, Default)]
pub(crate) struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub(crate) fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    pub(crate) fn fetch_add(&self, delta: f64) {
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self.bits.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

#[derive(Debug)]
struct SeriesIndex<S> {
    /// Series in first-seen order
    entries: Vec<(Arc<LabelSet>, Arc<S>)>,
    lookup: HashMap<LabelSet, usize>,
}

impl<S> Default for SeriesIndex<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct SeriesMap<S> {
    desc: MetricDescriptor,
    index: RwLock<SeriesIndex<S>>,
}

impl<S> SeriesMap<S> {
    pub(crate) fn new(desc: MetricDescriptor) -> Self {
        Self {
            desc,
            index: RwLock::new(SeriesIndex::default()),
        }
    }

    pub(crate) fn desc(&self) -> &MetricDescriptor {
        &self.desc
    }

    /// Existing series for `labels`, if any
    pub(crate) fn get(&self, labels: &LabelSet) -> Option<Arc<S>> {
        let index = self.index.read();
        index
            .lookup
            .get(labels)
            .map(|&idx| Arc::clone(&index.entries[idx].1))
    }

    /// Series for `labels`, created with `init` on first use
    pub(crate) fn get_or_create(&self, labels: &LabelSet, init: impl FnOnce() -> S) -> Result<Arc<S>> {
        if let Some(series) = self.get(labels) {
            return Ok(series);
        }

        self.desc.check_labels(labels)?;

        let mut index = self.index.write();
        // Another writer may have won the race between the two locks
        if let Some(&idx) = index.lookup.get(labels) {
            return Ok(Arc::clone(&index.entries[idx].1));
        }

        let series = Arc::new(init());
        let idx = index.entries.len();
        index
            .entries
            .push((Arc::new(labels.clone()), Arc::clone(&series)));
        index.lookup.insert(labels.clone(), idx);
        Ok(series)
    }

    /// All series in first-seen order.
    ///
    /// Only `Arc` handles are copied under the index lock; label sets are
    /// cloned after it is released.
    pub(crate) fn entries(&self) -> Vec<(LabelSet, Arc<S>)> {
        let handles: Vec<(Arc<LabelSet>, Arc<S>)> = self
            .index
            .read()
            .entries
            .iter()
            .map(|(labels, series)| (Arc::clone(labels), Arc::clone(series)))
            .collect();

        handles
            .into_iter()
            .map(|(labels, series)| (LabelSet::clone(&labels), series))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Opts;
    use crate::types::MetricType;

    fn map() -> SeriesMap<AtomicF64> {
        let desc =
            MetricDescriptor::new(MetricType::Counter, Opts::new("m", "help"), &["k"]).unwrap();
        SeriesMap::new(desc)
    }

    #[test]
    fn test_atomic_f64_add() {
        let value = AtomicF64::default();
        value.fetch_add(1.5);
        value.fetch_add(2.0);
        assert_eq!(value.load(), 3.5);
        value.store(-1.0);
        assert_eq!(value.load(), -1.0);
    }

    #[test]
    fn test_get_or_create_reuses_series() {
        let map = map();
        let labels = LabelSet::new().with("k", "a");

        let first = map.get_or_create(&labels, AtomicF64::default).unwrap();
        first.fetch_add(2.0);
        let second = map.get_or_create(&labels, AtomicF64::default).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(map.entries().len(), 1);
    }

    #[test]
    fn test_entries_keep_first_seen_order() {
        let map = map();
        for value in ["z", "a", "m"] {
            map.get_or_create(&LabelSet::new().with("k", value), AtomicF64::default)
                .unwrap();
        }
        let order: Vec<String> = map
            .entries()
            .iter()
            .map(|(labels, _)| labels.get("k").unwrap_or_default().to_string())
            .collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_label_mismatch_creates_nothing() {
        let map = map();
        let result = map.get_or_create(&LabelSet::new(), AtomicF64::default);
        assert!(result.is_err());
        assert!(map.entries().is_empty());
    }

    #[test]
    fn test_entries_share_series_and_release_index() {
        let map = map();
        let labels = LabelSet::new().with("k", "a");
        let series = map.get_or_create(&labels, AtomicF64::default).unwrap();

        let entries = map.entries();
        assert!(map.index.try_write().is_some());
        assert_eq!(entries[0].0, labels);
        assert!(Arc::ptr_eq(&entries[0].1, &series));

        map.get_or_create(&LabelSet::new().with("k", "b"), AtomicF64::default)
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(map.entries().len(), 2);
    }
}
