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
//! Prometheus text exposition format (version 0.0.4)
//!
//! Output is a pure function of the snapshot: families in registration
//! order, series in first-seen order, labels in declaration order.

use std::io::Write;

use crate::descriptor::MetricDescriptor;
use crate::labels::LabelSet;
use crate::registry::Registry;
use crate::snapshot::{HistogramSample, MetricFamily, SampleValue, Snapshot};

/// Content type of the text exposition format
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Encodes snapshots in the Prometheus text format
#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncoder;

impl TextEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// Content type to send alongside the encoded body
    pub fn format_type(&self) -> &'static str {
        TEXT_FORMAT
    }

    /// Encode into a writer
    pub fn encode<W: Write>(&self, snapshot: &Snapshot, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(self.encode_to_string(snapshot).as_bytes())
    }

    /// Encode into a string
    pub fn encode_to_string(&self, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        for family in snapshot.families() {
            write_family(&mut out, family);
        }
        out
    }
}

/// Exposition endpoint body for `registry`: `(content_type, body)`
///
/// Takes a fresh snapshot on every call and cannot fail; metrics whose
/// sources are unavailable are simply absent.
pub fn render(registry: &Registry) -> (&'static str, String) {
    let encoder = TextEncoder::new();
    let body = encoder.encode_to_string(&registry.snapshot());
    (encoder.format_type(), body)
}

fn write_family(out: &mut String, family: &MetricFamily) {
    let desc = &family.desc;
    let name = desc.name();

    out.push_str("# HELP ");
    out.push_str(name);
    out.push(' ');
    escape_help(out, desc.help());
    out.push('\n');

    out.push_str("# TYPE ");
    out.push_str(name);
    out.push(' ');
    out.push_str(desc.kind().as_str());
    out.push('\n');

    for sample in &family.samples {
        match &sample.value {
            SampleValue::Counter(value) | SampleValue::Gauge(value) => {
                write_line(out, name, "", desc, &sample.labels, None, &format_float(*value));
            }
            SampleValue::Histogram(hist) => write_histogram(out, desc, &sample.labels, hist),
        }
    }
}

fn write_histogram(out: &mut String, desc: &MetricDescriptor, labels: &LabelSet, hist: &HistogramSample) {
    let name = desc.name();
    for (bound, count) in &hist.buckets {
        write_line(
            out,
            name,
            "_bucket",
            desc,
            labels,
            Some(&format_float(*bound)),
            &count.to_string(),
        );
    }
    let count = hist.count.to_string();
    write_line(out, name, "_bucket", desc, labels, Some("+Inf"), &count);
    write_line(out, name, "_sum", desc, labels, None, &format_float(hist.sum));
    write_line(out, name, "_count", desc, labels, None, &count);
}

fn write_line(
    out: &mut String,
    name: &str,
    suffix: &str,
    desc: &MetricDescriptor,
    labels: &LabelSet,
    le: Option<&str>,
    value: &str,
) {
    out.push_str(name);
    out.push_str(suffix);

    let mut pairs = desc
        .label_names()
        .iter()
        .map(|n| (n.as_str(), labels.get(n).unwrap_or_default()))
        .chain(le.map(|le| ("le", le)))
        .peekable();

    if pairs.peek().is_some() {
        out.push('{');
        for (i, (label, label_value)) in pairs.enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(label);
            out.push_str("=\"");
            escape_label_value(out, label_value);
            out.push('"');
        }
        out.push('}');
    }

    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

/// Locale-independent, shortest round-trip representation
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

fn escape_help(out: &mut String, help: &str) {
    for c in help.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

fn escape_label_value(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{HistogramOpts, Opts};

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(3.0), "3");
        assert_eq!(format_float(210.5), "210.5");
        assert_eq!(format_float(0.005), "0.005");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1e21), "1000000000000000000000");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_unlabelled_counter() {
        let registry = Registry::new();
        let counter = registry
            .register_counter(Opts::new("total_req", "Tells total req"), &[])
            .unwrap();
        counter.inc_by(&LabelSet::new(), 3.0).unwrap();

        let (content_type, body) = render(&registry);
        assert_eq!(content_type, TEXT_FORMAT);
        assert_eq!(
            body,
            "# HELP total_req Tells total req\n# TYPE total_req counter\ntotal_req 3\n"
        );
    }

    #[test]
    fn test_histogram_lines() {
        let registry = Registry::new();
        let hist = registry
            .register_histogram(
                HistogramOpts::new("latency", "Latency").buckets(vec![1.0, 50.0, 100.0]),
                &["method"],
            )
            .unwrap();
        hist.observe(&LabelSet::new().with("method", "GET"), 75.0).unwrap();

        let (_, body) = render(&registry);
        let expected = "# HELP latency Latency\n\
                        # TYPE latency histogram\n\
                        latency_bucket{method=\"GET\",le=\"1\"} 0\n\
                        latency_bucket{method=\"GET\",le=\"50\"} 0\n\
                        latency_bucket{method=\"GET\",le=\"100\"} 1\n\
                        latency_bucket{method=\"GET\",le=\"+Inf\"} 1\n\
                        latency_sum{method=\"GET\"} 75\n\
                        latency_count{method=\"GET\"} 1\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_unlabelled_histogram_only_has_le() {
        let registry = Registry::new();
        let hist = registry
            .register_histogram(HistogramOpts::new("h", "help").buckets(vec![0.5]), &[])
            .unwrap();
        hist.observe(&LabelSet::new(), 0.25).unwrap();

        let (_, body) = render(&registry);
        assert!(body.contains("h_bucket{le=\"0.5\"} 1\n"));
        assert!(body.contains("h_sum 0.25\n"));
        assert!(body.contains("h_count 1\n"));
    }

    #[test]
    fn test_labels_follow_declaration_order() {
        let registry = Registry::new();
        let counter = registry
            .register_counter(Opts::new("c", "help"), &["route", "method"])
            .unwrap();
        counter
            .inc(&LabelSet::new().with("method", "GET").with("route", "/"))
            .unwrap();

        let (_, body) = render(&registry);
        assert!(body.contains("c{route=\"/\",method=\"GET\"} 1\n"));
    }

    #[test]
    fn test_escaping() {
        let registry = Registry::new();
        let counter = registry
            .register_counter(Opts::new("c", "line one\nback\\slash"), &["path"])
            .unwrap();
        counter
            .inc(&LabelSet::new().with("path", "a\"b\\c\nd"))
            .unwrap();

        let (_, body) = render(&registry);
        assert!(body.contains("# HELP c line one\\nback\\\\slash\n"));
        assert!(body.contains("c{path=\"a\\\"b\\\\c\\nd\"} 1\n"));
    }

    #[test]
    fn test_family_without_series_prints_header_only() {
        let registry = Registry::new();
        registry
            .register_counter(Opts::new("labelled", "help"), &["method"])
            .unwrap();

        let (_, body) = render(&registry);
        assert_eq!(body, "# HELP labelled help\n# TYPE labelled counter\n");
    }

    #[test]
    fn test_encode_to_writer() {
        let registry = Registry::new();
        registry.register_gauge(Opts::new("g", "help"), &[]).unwrap();

        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&registry.snapshot(), &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            encoder.encode_to_string(&registry.snapshot())
        );
    }
}
