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
//! Response-time middleware
//!
//! Runs inside the `request` span opened by the trace layer. Once the
//! response is produced its latency is recorded in the request metrics and
//! returned in the `X-Response-Time` header.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::state::AppState;

/// Header carrying the handling time, formatted as `12.345ms`
pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

/// Time the rest of the stack and record the request once it has a status.
///
/// Must wrap a panic-catching layer; an unwinding handler would skip the
/// recording.
pub async fn response_time(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();

    let start = Instant::now();
    let mut response = next.run(request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status_code = response.status().as_u16();

    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}ms", elapsed_ms)) {
        response.headers_mut().insert(RESPONSE_TIME_HEADER, value);
    }

    debug!(status_code, elapsed_ms, "Request completed");
    if let Err(e) = state.requests.record(&method, &route, status_code, elapsed_ms) {
        warn!(error = %e, "Failed to record request metrics");
    }

    response
}
