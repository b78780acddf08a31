// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs every request as `METHOD /path?query STATUS DURATIONms` under the `http` target.
///
/// Successful responses are logged at DEBUG (visible with the `http` level), client errors at
/// WARN and server errors at ERROR.
pub async fn http_logger_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = match req.uri().query() {
        Some(query) => format!("{}?{}", req.uri().path(), query),
        None => req.uri().path().to_string(),
    };
    let start = Instant::now();

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        tracing::error!(target: "http", %method, %path, status, duration_ms, "{} {} {} {}ms", method, path, status, duration_ms);
    } else if response.status().is_client_error() {
        tracing::warn!(target: "http", %method, %path, status, duration_ms, "{} {} {} {}ms", method, path, status, duration_ms);
    } else {
        tracing::debug!(target: "http", %method, %path, status, duration_ms, "{} {} {} {}ms", method, path, status, duration_ms);
    }

    response
}
