// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::get_block::{BlockQueryParams, GetBlockError, serve_block};
use crate::blocks::Block;
use crate::gateway::ChainApi;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};

/// Handler for GET /blocks/head
///
/// Serves the latest finalized block.
pub async fn get_block_head(
    State(state): State<AppState>,
    Query(params): Query<BlockQueryParams>,
) -> Result<Json<Block>, GetBlockError> {
    let hash = state.api.finalized_head().await?;
    serve_block(&state, hash, params).await
}
