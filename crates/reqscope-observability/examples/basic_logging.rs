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
//! Logging example demonstrating the output formats.
//!
//! Run with: cargo run -p reqscope-observability --example basic_logging -- <format>
//! Where <format> is one of: pretty, compact, json

use reqscope_observability::{init_tracing, request_span, task_span, LogFormat, DEFAULT_APP_NAME};
use std::env;
use std::time::Duration;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let format = env::args()
        .nth(1)
        .and_then(|s| s.parse::<LogFormat>().ok())
        .unwrap_or_default();

    println!("Initializing with format: {:?}", format);
    init_tracing(format, Some("debug"))?;

    tracing::info!("Application started");

    let elapsed = handle("GET", "/slow")
        .instrument(request_span!(DEFAULT_APP_NAME, "GET", "/slow"))
        .await;
    tracing::info!(elapsed_ms = elapsed, "Request finished");

    Ok(())
}

async fn handle(method: &str, route: &str) -> u64 {
    let delay_ms = 150;
    let span = task_span!("heavy_task", delay_ms);

    async {
        tracing::debug!(method, route, "Starting heavy task");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        tracing::info!("Heavy task completed in {}ms", delay_ms);
    }
    .instrument(span)
    .await;

    delay_ms
}
