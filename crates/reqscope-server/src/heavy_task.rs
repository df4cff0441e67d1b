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
//! Simulated slow work behind the `/slow` route
//!
//! Each run either fails immediately with one of a few canned reasons or
//! sleeps for a delay picked from the configured list.

use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

use crate::config::SlowTaskConfig;

const FAILURE_REASONS: [&str; 4] = [
    "DB Payment Failure",
    "DB Server is Down",
    "Access Denied",
    "Not Found Error",
];

/// Canned failure of a heavy task run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct HeavyTaskError {
    pub reason: String,
}

/// What a single run will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPlan {
    /// Sleep this many milliseconds, then succeed
    Sleep(u64),
    /// Fail at once with this reason
    Fail(&'static str),
}

/// Random delay or failure generator backing `/slow`
#[derive(Debug, Clone)]
pub struct HeavyTask {
    delays_ms: Vec<u64>,
    failure_rate: f64,
}

impl HeavyTask {
    /// Build from config; the failure rate is clamped to `[0, 1]`, NaN as 0
    pub fn new(config: &SlowTaskConfig) -> Self {
        let failure_rate = if config.failure_rate.is_nan() {
            0.0
        } else {
            config.failure_rate.clamp(0.0, 1.0)
        };

        Self {
            delays_ms: config.delays_ms.clone(),
            failure_rate,
        }
    }

    /// Decide the outcome of one run
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> TaskPlan {
        if rng.gen_bool(self.failure_rate) {
            let reason = FAILURE_REASONS
                .choose(rng)
                .copied()
                .unwrap_or("Internal Server Error");
            return TaskPlan::Fail(reason);
        }

        TaskPlan::Sleep(self.delays_ms.choose(rng).copied().unwrap_or(0))
    }

    /// Run the task, returning the time spent in milliseconds
    pub async fn run(&self) -> Result<u64, HeavyTaskError> {
        let plan = self.plan(&mut rand::thread_rng());

        match plan {
            TaskPlan::Sleep(delay_ms) => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(delay_ms)
            }
            TaskPlan::Fail(reason) => Err(HeavyTaskError {
                reason: reason.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn task(delays_ms: Vec<u64>, failure_rate: f64) -> HeavyTask {
        HeavyTask::new(&SlowTaskConfig {
            delays_ms,
            failure_rate,
        })
    }

    #[test]
    fn test_plan_picks_configured_delay() {
        let task = task(vec![100, 150, 200], 0.0);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            match task.plan(&mut rng) {
                TaskPlan::Sleep(ms) => assert!([100, 150, 200].contains(&ms)),
                TaskPlan::Fail(reason) => panic!("unexpected failure: {}", reason),
            }
        }
    }

    #[test]
    fn test_plan_always_fails_at_full_rate() {
        let task = task(vec![100], 1.0);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            match task.plan(&mut rng) {
                TaskPlan::Fail(reason) => assert!(FAILURE_REASONS.contains(&reason)),
                TaskPlan::Sleep(ms) => panic!("unexpected success after {}ms", ms),
            }
        }
    }

    #[test]
    fn test_out_of_range_rate_is_clamped() {
        let task = task(vec![1], 3.0);
        assert!(matches!(task.plan(&mut StdRng::seed_from_u64(1)), TaskPlan::Fail(_)));
    }

    #[tokio::test]
    async fn test_run_reports_delay() {
        let task = task(vec![5], 0.0);
        assert_eq!(task.run().await, Ok(5));
    }

    #[tokio::test]
    async fn test_run_failure_message() {
        let err = task(vec![5], 1.0).run().await.unwrap_err();
        assert!(FAILURE_REASONS.contains(&err.reason.as_str()));
        assert_eq!(err.to_string(), err.reason);
    }
}
