// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::API_VERSION;
use crate::handlers::blocks;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn blocks_routes() -> Router<AppState> {
    Router::new()
        // Order matters: specific routes must come before /{blockId} to avoid capturing as a blockId
        .route(&format!("{API_VERSION}/blocks/head"), get(blocks::get_block_head))
        .route(
            &format!("{API_VERSION}/blocks/{{blockId}}"),
            get(blocks::get_block),
        )
}
