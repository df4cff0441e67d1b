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
//! Structured logging for reqscope.
//!
//! Installs a global `tracing` subscriber with one of three output formats
//! (pretty, compact, JSON) filtered by `RUST_LOG` or an explicit level, and
//! provides the request span every served request runs inside.
//!
//! # Example
//!
//! ```ignore
//! use reqscope_observability::{init_tracing, LogFormat};
//!
//! init_tracing(LogFormat::Json, Some("info"))?;
//! tracing::info!("Server started");
//! ```

pub mod config;
pub mod initialization;
pub mod macros;

pub use config::{LogConfig, LogError, LogFormat, LogOutput, DEFAULT_APP_NAME, DEFAULT_FILTER};
pub use initialization::{init_tracing, init_tracing_with_config};

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level};

#[doc(hidden)]
pub use tracing;
