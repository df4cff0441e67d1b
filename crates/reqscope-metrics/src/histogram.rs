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
//! Histogram primitive with fixed bucket bounds
//!
//! Bucket counts are stored cumulatively: bucket `i` holds the number of
//! observations `<= bounds[i]`. The `+Inf` bucket is not stored, it is the
//! series' total count.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::descriptor::{HistogramOpts, MetricDescriptor};
use crate::error::{MetricsError, Result};
use crate::labels::LabelSet;
use crate::series::SeriesMap;
use crate::snapshot::{HistogramSample, MetricFamily, Sample, SampleValue};
use crate::types::MetricType;

/// Default bucket bounds, in seconds
pub const DEFAULT_BUCKETS: &[f64; 11] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// `count` buckets starting at `start`, each `width` apart
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 || !(width > 0.0) {
        return Err(MetricsError::InvalidDescriptor(format!(
            "linear buckets need count > 0 and width > 0, got count={} width={}",
            count, width
        )));
    }
    Ok((0..count).map(|i| start + width * i as f64).collect())
}

/// `count` buckets starting at `start`, each `factor` times the previous
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    if count == 0 || !(start > 0.0) || !(factor > 1.0) {
        return Err(MetricsError::InvalidDescriptor(format!(
            "exponential buckets need count > 0, start > 0 and factor > 1, got count={} start={} factor={}",
            count, start, factor
        )));
    }
    let mut next = start;
    let mut buckets = Vec::with_capacity(count);
    for _ in 0..count {
        buckets.push(next);
        next *= factor;
    }
    Ok(buckets)
}

/// Accumulator state of one histogram series
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramState {
    /// Cumulative count per finite bound
    pub buckets: Vec<u64>,
    /// Total observations
    pub count: u64,
    /// Sum of observed values
    pub sum: f64,
}

impl HistogramState {
    fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![0; bucket_count],
            count: 0,
            sum: 0.0,
        }
    }
}

/// Bucketed distribution of observations, one per label combination
#[derive(Debug, Clone)]
pub struct Histogram {
    core: Arc<SeriesMap<Mutex<HistogramState>>>,
    bounds: Arc<[f64]>,
}

impl Histogram {
    pub(crate) fn new(opts: HistogramOpts, label_names: &[&str]) -> Result<Self> {
        validate_bounds(&opts.common.name, &opts.buckets)?;
        let desc = MetricDescriptor::new(MetricType::Histogram, opts.common, label_names)?;

        Ok(Self {
            core: Arc::new(SeriesMap::new(desc)),
            bounds: opts.buckets.into(),
        })
    }

    /// Descriptor this histogram was registered with
    pub fn desc(&self) -> &MetricDescriptor {
        self.core.desc()
    }

    /// Finite bucket upper bounds
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Record one observation
    ///
    /// Negative, NaN and infinite values are rejected and leave every
    /// series untouched.
    pub fn observe(&self, labels: &LabelSet, value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidArgument(format!(
                "histogram {} cannot observe {}",
                self.desc().name(),
                value
            )));
        }

        let bucket_count = self.bounds.len();
        let series = self
            .core
            .get_or_create(labels, || Mutex::new(HistogramState::new(bucket_count)))?;

        // Smallest bound >= value; inclusive upper bounds
        let first = self.bounds.partition_point(|&bound| bound < value);

        let mut state = series.lock();
        for count in &mut state.buckets[first..] {
            *count += 1;
        }
        state.count += 1;
        state.sum += value;
        Ok(())
    }

    /// Copy of the series state, `None` for a label set never observed
    pub fn state(&self, labels: &LabelSet) -> Option<HistogramState> {
        self.core.get(labels).map(|series| series.lock().clone())
    }

    pub(crate) fn collect(&self) -> MetricFamily {
        let samples = self
            .core
            .entries()
            .into_iter()
            .map(|(labels, series)| {
                let state = series.lock().clone();
                Sample {
                    labels,
                    value: SampleValue::Histogram(HistogramSample {
                        buckets: self.bounds.iter().copied().zip(state.buckets).collect(),
                        count: state.count,
                        sum: state.sum,
                    }),
                }
            })
            .collect();

        MetricFamily {
            desc: self.desc().clone(),
            samples,
        }
    }
}

fn validate_bounds(name: &str, bounds: &[f64]) -> Result<()> {
    if bounds.is_empty() {
        return Err(MetricsError::InvalidDescriptor(format!(
            "histogram {} needs at least one bucket",
            name
        )));
    }
    if bounds.iter().any(|b| !b.is_finite()) {
        return Err(MetricsError::InvalidDescriptor(format!(
            "histogram {} bucket bounds must be finite",
            name
        )));
    }
    if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(MetricsError::InvalidDescriptor(format!(
            "histogram {} bucket bounds must be strictly increasing",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(bounds: &[f64]) -> Histogram {
        Histogram::new(
            HistogramOpts::new("latency", "help").buckets(bounds.to_vec()),
            &["method"],
        )
        .unwrap()
    }

    fn get() -> LabelSet {
        LabelSet::new().with("method", "GET")
    }

    #[test]
    fn test_single_observation() {
        let hist = histogram(&[1.0, 50.0, 100.0]);
        hist.observe(&get(), 75.0).unwrap();

        let state = hist.state(&get()).unwrap();
        assert_eq!(state.buckets, vec![0, 0, 1]);
        assert_eq!(state.count, 1);
        assert_eq!(state.sum, 75.0);
    }

    #[test]
    fn test_sequential_observations() {
        let hist = histogram(&[1.0, 50.0, 100.0]);
        for value in [75.0, 0.5, 60.0, 150.0] {
            hist.observe(&get(), value).unwrap();
        }

        let state = hist.state(&get()).unwrap();
        assert_eq!(state.buckets, vec![1, 1, 3]);
        assert_eq!(state.count, 4);
        assert_eq!(state.sum, 285.5);
    }

    #[test]
    fn test_bound_is_inclusive() {
        let hist = histogram(&[1.0, 50.0, 100.0]);
        hist.observe(&get(), 50.0).unwrap();
        assert_eq!(hist.state(&get()).unwrap().buckets, vec![0, 1, 1]);
    }

    #[test]
    fn test_value_above_all_bounds() {
        let hist = histogram(&[1.0, 50.0, 100.0]);
        hist.observe(&get(), 5000.0).unwrap();

        let state = hist.state(&get()).unwrap();
        assert_eq!(state.buckets, vec![0, 0, 0]);
        assert_eq!(state.count, 1);
    }

    #[test]
    fn test_invalid_observations_leave_state_unchanged() {
        let hist = histogram(&[1.0, 50.0, 100.0]);
        hist.observe(&get(), 10.0).unwrap();
        let before = hist.state(&get()).unwrap();

        for value in [-5.0, f64::NAN, f64::INFINITY] {
            let result = hist.observe(&get(), value);
            assert!(matches!(result, Err(MetricsError::InvalidArgument(_))));
        }
        assert_eq!(hist.state(&get()).unwrap(), before);

        // A rejected value must not create a new series either
        let post = LabelSet::new().with("method", "POST");
        assert!(hist.observe(&post, -1.0).is_err());
        assert!(hist.state(&post).is_none());
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        for bounds in [vec![], vec![1.0, 1.0], vec![5.0, 1.0], vec![1.0, f64::INFINITY]] {
            let result = Histogram::new(HistogramOpts::new("h", "help").buckets(bounds), &[]);
            assert!(matches!(result, Err(MetricsError::InvalidDescriptor(_))));
        }
    }

    #[test]
    fn test_bucket_helpers() {
        assert_eq!(linear_buckets(1.0, 2.0, 3).unwrap(), vec![1.0, 3.0, 5.0]);
        assert_eq!(exponential_buckets(1.0, 10.0, 3).unwrap(), vec![1.0, 10.0, 100.0]);
        assert!(linear_buckets(0.0, 0.0, 3).is_err());
        assert!(exponential_buckets(0.0, 2.0, 3).is_err());
        assert!(exponential_buckets(1.0, 2.0, 0).is_err());
    }

    #[test]
    fn test_collect_pairs_bounds_with_counts() {
        let hist = histogram(&[1.0, 50.0]);
        hist.observe(&get(), 0.5).unwrap();

        let family = hist.collect();
        match &family.samples[0].value {
            SampleValue::Histogram(sample) => {
                assert_eq!(sample.buckets, vec![(1.0, 1), (50.0, 1)]);
                assert_eq!(sample.count, 1);
            }
            other => panic!("unexpected sample {:?}", other),
        }
    }
}
