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
//! Instrumented HTTP application
//!
//! Serves a small set of routes and measures every request with
//! `reqscope-metrics`. The registry is exposed on `/metrics` in the
//! Prometheus text format.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod heavy_task;
pub mod middleware;
pub mod state;

pub use cli::Cli;
pub use config::{ServerConfig, SlowTaskConfig};
pub use error::{panic_response, AppError};
pub use heavy_task::{HeavyTask, HeavyTaskError};
pub use state::AppState;

use axum::{extract::Request, middleware as axum_middleware, routing::get, Router};
use reqscope_observability::request_span;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Create the axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::index))
        .route("/slow", get(handlers::slow))
        .route("/metrics", get(handlers::metrics))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found);

    instrument(routes, state)
}

/// Wrap `routes` so every request is traced, timed and recorded.
///
/// The trace layer opens the `request` span (`app`, `method`, `route`) that
/// everything below it logs into. Panics are turned into a 500 below the
/// response-time layer, so a panicking handler is still counted.
pub fn instrument(routes: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let app_name = state.app_name.clone();
    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request| {
        request_span!(app_name, request.method(), request.uri().path())
    });

    routes
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::response_time,
        ))
        .layer(trace)
        .with_state(state)
}
