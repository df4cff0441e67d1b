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
//! Span macros shared by the server and its tests.

/// Create the span that wraps one HTTP request.
///
/// Every event logged while handling the request carries the `app`,
/// `method` and `route` fields.
///
/// ```ignore
/// let span = request_span!("reqscope", "GET", "/slow");
/// async { tracing::info!("handled") }.instrument(span).await;
/// ```
#[macro_export]
macro_rules! request_span {
    ($app:expr, $method:expr, $route:expr) => {
        $crate::tracing::info_span!(
            "request",
            app = %$app,
            method = %$method,
            route = %$route,
        )
    };
    ($app:expr, $method:expr, $route:expr, $($field:tt)+) => {
        $crate::tracing::info_span!(
            "request",
            app = %$app,
            method = %$method,
            route = %$route,
            $($field)+
        )
    };
}

/// Create a debug-level span for timing an inner operation
#[macro_export]
macro_rules! task_span {
    ($name:expr) => {
        $crate::tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        $crate::tracing::debug_span!($name, $($field)*)
    };
}
