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
//! Global subscriber installation
//!
//! One `EnvFilter` plus one `fmt` layer in the configured format. Only the
//! first successful call in a process takes effect.

use std::io;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{LogConfig, LogError, LogFormat, LogOutput};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Install a subscriber with `format` and an optional filter.
///
/// ```ignore
/// use reqscope_observability::{init_tracing, LogFormat};
///
/// init_tracing(LogFormat::Compact, Some("debug"))?;
/// tracing::info!("Application started");
/// ```
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let config = LogConfig::new().with_format(format);
    init_tracing_with_config(match level {
        Some(level) => config.with_level(level),
        None => config,
    })
}

/// Install a subscriber built from `config`.
///
/// Fails with [`LogError::InvalidFilter`] for unparsable directives and
/// [`LogError::AlreadyInitialized`] when a global subscriber is already set.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let filter = env_filter(&config)?;

    Registry::default()
        .with(filter)
        .with(fmt_layer(&config, writer_for(config.output)))
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
}

fn env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let directives = config.effective_filter();

    EnvFilter::try_new(&directives).map_err(|e| LogError::InvalidFilter {
        filter: directives.clone(),
        reason: e.to_string(),
    })
}

fn fmt_layer<S, W>(config: &LogConfig, writer: W) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.include_targets)
        .with_thread_ids(config.include_thread_ids);

    match config.format {
        LogFormat::Pretty => with_timer(
            base.pretty()
                .with_thread_names(true)
                .with_ansi(config.use_color),
            config.use_timestamps,
        ),
        LogFormat::Compact => with_timer(
            base.compact()
                .with_ansi(config.use_color)
                .with_span_events(FmtSpan::CLOSE),
            config.use_timestamps,
        ),
        LogFormat::Json => with_timer(
            base.json()
                .with_current_span(true)
                .with_span_list(false)
                .with_ansi(false),
            config.use_timestamps,
        ),
    }
}

/// Box `layer`, dropping its timestamp when `timestamps` is off
fn with_timer<S, N, E, W>(
    layer: fmt::Layer<S, N, fmt::format::Format<E>, W>,
    timestamps: bool,
) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    N: for<'w> fmt::FormatFields<'w> + Send + Sync + 'static,
    E: Send + Sync + 'static,
    fmt::format::Format<E>: fmt::FormatEvent<S, N>,
    fmt::format::Format<E, ()>: fmt::FormatEvent<S, N>,
    W: for<'w> fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    if timestamps {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    }
}

fn writer_for(output: LogOutput) -> fn() -> Box<dyn io::Write + Send> {
    match output {
        LogOutput::Stderr => || Box::new(io::stderr()),
        LogOutput::Stdout => || Box::new(io::stdout()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// In-memory sink for formatted lines
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(config: &LogConfig, emit: impl FnOnce()) -> String {
        let sink = Captured::default();
        let subscriber = Registry::default().with(fmt_layer(config, sink.clone()));
        tracing::subscriber::with_default(subscriber, emit);
        sink.contents()
    }

    #[test]
    fn test_startup_events_carry_app() {
        let config = LogConfig::new()
            .with_format(LogFormat::Json)
            .with_app_name("express");

        let output = capture(&config, || {
            let _app = config.app_span().entered();
            tracing::info!("Server started");
        });

        assert!(output.contains("Server started"));
        assert!(output.contains(r#""app":"express""#), "{output}");
    }

    #[test]
    fn test_app_span_in_text_formats() {
        for format in [LogFormat::Pretty, LogFormat::Compact] {
            let config = LogConfig::new()
                .with_format(format)
                .with_color(false)
                .with_app_name("express");

            let output = capture(&config, || {
                let _app = config.app_span().entered();
                tracing::warn!("Shutdown signal received");
            });

            assert!(output.contains("app"), "{format}: {output}");
            assert!(output.contains("express"), "{format}: {output}");
        }
    }

    #[test]
    fn test_filter_directives_parse() {
        assert!(env_filter(&LogConfig::new().with_level("debug")).is_ok());
        assert!(env_filter(&LogConfig::new().with_level("reqscope_server=trace,info")).is_ok());
    }

    #[test]
    fn test_bad_directive_is_invalid_filter() {
        let result = env_filter(&LogConfig::new().with_level("reqscope=verbose"));
        assert!(matches!(
            result,
            Err(LogError::InvalidFilter { filter, .. }) if filter == "reqscope=verbose"
        ));
    }

    #[test]
    fn test_every_format_builds_a_layer() {
        for format in LogFormat::ALL {
            for timestamps in [true, false] {
                let config = LogConfig::new()
                    .with_format(format)
                    .with_timestamps(timestamps);
                let _layer: BoxedLayer<Registry> = fmt_layer(&config, io::sink);
            }
        }
    }
}
