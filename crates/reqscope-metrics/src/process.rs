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
//! Default process collectors
//!
//! Reads process facts from `/proc` on every snapshot. Each fact is sampled
//! independently; one that cannot be read is logged at debug level and its
//! family is left out of the snapshot. On platforms without `/proc` only the
//! uptime gauge is produced.

use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::collector::Collector;
use crate::descriptor::{MetricDescriptor, Opts};
use crate::error::{MetricsError, Result};
use crate::snapshot::{MetricFamily, SampleValue};
use crate::types::MetricType;

/// Clock ticks per second used by `/proc/<pid>/stat` (USER_HZ).
///
/// Assumes the kernel default of 100, which holds on x86, x86_64, arm and
/// aarch64. Kernels built with another USER_HZ report scaled CPU times.
const CLOCK_TICKS_PER_SEC: f64 = 100.0;

const PROC_SELF_STAT: &str = "/proc/self/stat";
const PROC_SELF_STATUS: &str = "/proc/self/status";
const PROC_SELF_LIMITS: &str = "/proc/self/limits";
const PROC_SELF_FD: &str = "/proc/self/fd";
const PROC_STAT: &str = "/proc/stat";

/// Fields of `/proc/self/stat` used by the collector
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProcStat {
    /// User CPU time in ticks
    pub utime: u64,
    /// System CPU time in ticks
    pub stime: u64,
    /// Start time in ticks since boot
    pub starttime: u64,
}

struct Descriptors {
    cpu_user: MetricDescriptor,
    cpu_system: MetricDescriptor,
    cpu_total: MetricDescriptor,
    start_time: MetricDescriptor,
    uptime: MetricDescriptor,
    resident_memory: MetricDescriptor,
    virtual_memory: MetricDescriptor,
    heap: MetricDescriptor,
    open_fds: MetricDescriptor,
    max_fds: MetricDescriptor,
    threads: MetricDescriptor,
}

/// Collector for process CPU, memory, file descriptor and uptime facts
pub struct ProcessCollector {
    descs: Descriptors,
    created: Instant,
}

impl ProcessCollector {
    /// Collector with unprefixed `process_*` names
    pub fn for_self() -> Result<Self> {
        Self::with_prefix("")
    }

    /// Collector whose metric names start with `prefix`
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        let counter = |name: &str, help: &str| {
            MetricDescriptor::new(MetricType::Counter, Opts::new(format!("{}{}", prefix, name), help), &[])
        };
        let gauge = |name: &str, help: &str| {
            MetricDescriptor::new(MetricType::Gauge, Opts::new(format!("{}{}", prefix, name), help), &[])
        };

        let descs = Descriptors {
            cpu_user: counter(
                "process_cpu_user_seconds_total",
                "Total user CPU time spent in seconds.",
            )?,
            cpu_system: counter(
                "process_cpu_system_seconds_total",
                "Total system CPU time spent in seconds.",
            )?,
            cpu_total: counter(
                "process_cpu_seconds_total",
                "Total user and system CPU time spent in seconds.",
            )?,
            start_time: gauge(
                "process_start_time_seconds",
                "Start time of the process since unix epoch in seconds.",
            )?,
            uptime: gauge(
                "process_uptime_seconds",
                "Seconds since the metrics collector was created.",
            )?,
            resident_memory: gauge(
                "process_resident_memory_bytes",
                "Resident memory size in bytes.",
            )?,
            virtual_memory: gauge(
                "process_virtual_memory_bytes",
                "Virtual memory size in bytes.",
            )?,
            heap: gauge("process_heap_bytes", "Process heap size in bytes.")?,
            open_fds: gauge("process_open_fds", "Number of open file descriptors.")?,
            max_fds: gauge(
                "process_max_fds",
                "Maximum number of open file descriptors.",
            )?,
            threads: gauge("process_threads", "Number of OS threads in the process.")?,
        };

        Ok(Self {
            descs,
            created: Instant::now(),
        })
    }

    fn push(
        families: &mut Vec<MetricFamily>,
        desc: &MetricDescriptor,
        sampled: Result<f64>,
    ) {
        match sampled {
            Ok(value) => {
                let value = match desc.kind() {
                    MetricType::Counter => SampleValue::Counter(value),
                    _ => SampleValue::Gauge(value),
                };
                families.push(MetricFamily::single(desc.clone(), value));
            }
            Err(e) => debug!("Omitting {} from snapshot: {}", desc.name(), e),
        }
    }
}

impl Collector for ProcessCollector {
    fn descriptors(&self) -> Vec<MetricDescriptor> {
        let d = &self.descs;
        vec![
            d.cpu_user.clone(),
            d.cpu_system.clone(),
            d.cpu_total.clone(),
            d.start_time.clone(),
            d.uptime.clone(),
            d.resident_memory.clone(),
            d.virtual_memory.clone(),
            d.heap.clone(),
            d.open_fds.clone(),
            d.max_fds.clone(),
            d.threads.clone(),
        ]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let d = &self.descs;
        let mut families = Vec::with_capacity(11);

        let stat = read_to_string(PROC_SELF_STAT, d.cpu_total.name()).and_then(|content| {
            parse_stat(&content)
                .ok_or_else(|| MetricsError::sample_failure(d.cpu_total.name(), "malformed stat line"))
        });
        let status = read_to_string(PROC_SELF_STATUS, d.resident_memory.name());

        let ticks = |f: fn(&ProcStat) -> u64| {
            stat.clone().map(|s| f(&s) as f64 / CLOCK_TICKS_PER_SEC)
        };
        Self::push(&mut families, &d.cpu_user, ticks(|s| s.utime));
        Self::push(&mut families, &d.cpu_system, ticks(|s| s.stime));
        Self::push(&mut families, &d.cpu_total, ticks(|s| s.utime + s.stime));

        let start_time = stat.clone().and_then(|s| {
            let content = read_to_string(PROC_STAT, d.start_time.name())?;
            let btime = parse_btime(&content)
                .ok_or_else(|| MetricsError::sample_failure(d.start_time.name(), "no btime in /proc/stat"))?;
            Ok(btime as f64 + s.starttime as f64 / CLOCK_TICKS_PER_SEC)
        });
        Self::push(&mut families, &d.start_time, start_time);

        Self::push(
            &mut families,
            &d.uptime,
            Ok(self.created.elapsed().as_secs_f64()),
        );

        let status_field = |desc: &MetricDescriptor, key: &str, kilobytes: bool| -> Result<f64> {
            let content = status.clone()?;
            let value = parse_status_field(&content, key).ok_or_else(|| {
                MetricsError::sample_failure(desc.name(), format!("no {} in status", key))
            })?;
            Ok(if kilobytes { value * 1024.0 } else { value })
        };
        Self::push(
            &mut families,
            &d.resident_memory,
            status_field(&d.resident_memory, "VmRSS", true),
        );
        Self::push(
            &mut families,
            &d.virtual_memory,
            status_field(&d.virtual_memory, "VmSize", true),
        );
        Self::push(&mut families, &d.heap, status_field(&d.heap, "VmData", true));

        Self::push(&mut families, &d.open_fds, count_open_fds(d.open_fds.name()));

        let max_fds = read_to_string(PROC_SELF_LIMITS, d.max_fds.name()).and_then(|content| {
            parse_max_fds(&content)
                .ok_or_else(|| MetricsError::sample_failure(d.max_fds.name(), "no open files limit"))
        });
        Self::push(&mut families, &d.max_fds, max_fds);

        Self::push(
            &mut families,
            &d.threads,
            status_field(&d.threads, "Threads", false),
        );

        families
    }
}

fn read_to_string(path: &str, metric: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MetricsError::sample_failure(metric, format!("{}: {}", path, e)))
}

fn count_open_fds(metric: &str) -> Result<f64> {
    let entries = fs::read_dir(Path::new(PROC_SELF_FD))
        .map_err(|e| MetricsError::sample_failure(metric, format!("{}: {}", PROC_SELF_FD, e)))?;
    Ok(entries.filter_map(|entry| entry.ok()).count() as f64)
}

/// Parse `/proc/<pid>/stat`. The command name may contain spaces and
/// parentheses, so fields are counted from the last `)`.
pub(crate) fn parse_stat(content: &str) -> Option<ProcStat> {
    let rest = &content[content.rfind(')')? + 1..];
    let fields: Vec<&str> = rest.split_whitespace().collect();
    // fields[0] is field 3 (state) of proc(5)
    Some(ProcStat {
        utime: fields.get(11)?.parse().ok()?,
        stime: fields.get(12)?.parse().ok()?,
        starttime: fields.get(19)?.parse().ok()?,
    })
}

/// `btime` line of `/proc/stat`
pub(crate) fn parse_btime(content: &str) -> Option<u64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("btime"))
        .and_then(|value| value.trim().parse().ok())
}

/// Numeric value of a `Key:\t  123 kB` line of `/proc/<pid>/status`
pub(crate) fn parse_status_field(content: &str, key: &str) -> Option<f64> {
    content.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name != key {
            return None;
        }
        value.split_whitespace().next()?.parse().ok()
    })
}

/// Soft limit from the `Max open files` row of `/proc/<pid>/limits`
pub(crate) fn parse_max_fds(content: &str) -> Option<f64> {
    let row = content
        .lines()
        .find_map(|line| line.strip_prefix("Max open files"))?;
    match row.split_whitespace().next()? {
        "unlimited" => Some(f64::INFINITY),
        soft => soft.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "4242 (my (odd) app) S 1 4242 4242 0 -1 4194560 1234 0 0 0 \
                        250 75 0 0 20 0 8 0 123456 104857600 2560 18446744073709551615";

    const STATUS: &str = "Name:\treqscope\nVmSize:\t  102400 kB\nVmRSS:\t   10240 kB\n\
                          VmData:\t   20480 kB\nThreads:\t8\n";

    const LIMITS: &str = "Limit                     Soft Limit           Hard Limit           Units\n\
                          Max cpu time              unlimited            unlimited            seconds\n\
                          Max open files            1024                 1048576              files\n";

    #[test]
    fn test_parse_stat_handles_parens_in_comm() {
        let stat = parse_stat(STAT).unwrap();
        assert_eq!(stat.utime, 250);
        assert_eq!(stat.stime, 75);
        assert_eq!(stat.starttime, 123456);
    }

    #[test]
    fn test_parse_stat_rejects_truncated_line() {
        assert!(parse_stat("1 (x) S 1 2").is_none());
        assert!(parse_stat("no parens").is_none());
    }

    #[test]
    fn test_parse_status_fields() {
        assert_eq!(parse_status_field(STATUS, "VmRSS"), Some(10240.0));
        assert_eq!(parse_status_field(STATUS, "VmSize"), Some(102400.0));
        assert_eq!(parse_status_field(STATUS, "Threads"), Some(8.0));
        assert_eq!(parse_status_field(STATUS, "VmSwap"), None);
    }

    #[test]
    fn test_parse_btime() {
        let content = "cpu  1 2 3 4\nbtime 1700000000\nprocesses 99\n";
        assert_eq!(parse_btime(content), Some(1_700_000_000));
        assert_eq!(parse_btime("cpu 1 2 3\n"), None);
    }

    #[test]
    fn test_parse_max_fds() {
        assert_eq!(parse_max_fds(LIMITS), Some(1024.0));
        let unlimited = "Max open files            unlimited            unlimited            files\n";
        assert_eq!(parse_max_fds(unlimited), Some(f64::INFINITY));
    }

    #[test]
    fn test_collect_always_reports_uptime() {
        let collector = ProcessCollector::for_self().unwrap();
        let families = collector.collect();
        assert!(families
            .iter()
            .any(|f| f.desc.name() == "process_uptime_seconds"));

        // Whatever was collected must have been declared
        let declared = collector.descriptors();
        for family in &families {
            assert!(declared.contains(&family.desc));
        }
    }

    #[test]
    fn test_prefix_applies_to_every_name() {
        let collector = ProcessCollector::with_prefix("reqscope_").unwrap();
        assert!(collector
            .descriptors()
            .iter()
            .all(|d| d.name().starts_with("reqscope_process_")));

        assert!(ProcessCollector::with_prefix("bad-prefix").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_collect_on_linux() {
        let families = ProcessCollector::for_self().unwrap().collect();
        let names: Vec<&str> = families.iter().map(|f| f.desc.name()).collect();
        assert!(names.contains(&"process_resident_memory_bytes"));
        assert!(names.contains(&"process_open_fds"));
    }
}
