// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::{logging::http_logger_middleware, routes, state::AppState};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::health_routes())
        .merge(routes::blocks::blocks_routes())
        .layer(middleware::from_fn(http_logger_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
