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
//! HTTP request handlers

use axum::{
    extract::{OriginalUri, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::AppError;
use crate::state::AppState;

/// GET /
pub async fn index() -> Json<Value> {
    info!("Request received on /");
    Json(json!({ "message": "Hello from reqscope" }))
}

/// GET /slow
///
/// Runs the heavy task and reports how long it took, or a 500 with the
/// failure reason.
pub async fn slow(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    info!("Request received on /slow");

    match state.heavy_task.run().await {
        Ok(elapsed_ms) => Ok(Json(json!({
            "status": "Success",
            "message": format!("Heavy task completed in {}ms", elapsed_ms),
        }))),
        Err(e) => {
            error!(error = %e, "Heavy task failed");
            Err(e.into())
        }
    }
}

/// GET /metrics
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let (content_type, body) = reqscope_metrics::render(&state.registry);
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Any unmatched route
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
