// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::API_VERSION;
use crate::{handlers::health, state::AppState};
use axum::{Router, routing::get};

pub fn health_routes() -> Router<AppState> {
    Router::new().route(&format!("{API_VERSION}/health"), get(health::get_health))
}
