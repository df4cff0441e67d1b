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
//! Standalone HTTP endpoint for the metrics registry
//!
//! For processes that do not serve `/metrics` from their own router. Binds
//! its own listener and serves `/metrics` and `/health` until the listener
//! fails or the shutdown future resolves.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::{encoder, Registry};

/// Listener settings for [`MetricsServer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Port for the metrics listener
    pub port: u16,

    /// Whether `serve` binds at all
    pub enabled: bool,

    /// Interface to bind
    pub bind_address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: 9090,
            enabled: false,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Enabled listener on the default interface
    pub fn enabled_on(port: u16) -> Self {
        Self {
            port,
            enabled: true,
            ..Self::default()
        }
    }

    /// `host:port` string passed to the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Scrape endpoint for one [`Registry`], independent of the application router
#[derive(Clone)]
pub struct MetricsServer {
    registry: Registry,
    config: MetricsConfig,
}

impl MetricsServer {
    /// Serve `registry` on `port`
    pub fn new(registry: Registry, port: u16) -> Self {
        Self::with_config(registry, MetricsConfig::enabled_on(port))
    }

    /// Serve `registry` with explicit listener settings
    pub fn with_config(registry: Registry, config: MetricsConfig) -> Self {
        Self { registry, config }
    }

    /// Address `serve` binds, as `host:port`
    pub fn bind_address(&self) -> String {
        self.config.addr()
    }

    /// Router serving `/metrics` and `/health`
    pub fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(self.registry.clone())
    }

    /// Serve until the listener fails
    ///
    /// ```ignore
    /// let server = MetricsServer::new(registry, 9090);
    /// tokio::spawn(async move { server.serve().await });
    /// ```
    pub async fn serve(self) -> anyhow::Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. Returns at once when disabled.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.config.enabled {
            info!("Metrics server disabled");
            return Ok(());
        }

        let listener = TcpListener::bind(self.config.addr()).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound `listener` until `shutdown` resolves
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!("Metrics server listening on http://{}/metrics", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Metrics server error: {}", e))?;

        info!("Metrics server on {} stopped", addr);
        Ok(())
    }
}

/// Handler for `/metrics`
pub async fn metrics_handler(State(registry): State<Registry>) -> Response {
    let (content_type, body) = encoder::render(&registry);
    debug!(bytes = body.len(), "Serving metrics");

    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
