// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::block_id::{BlockId, BlockIdParseError};
use crate::blocks::{self, AssembleError, Block, BlockOptions};
use crate::gateway::{ChainApi, GatewayError};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use sp_core::H256;
use std::error::Error as _;
use thiserror::Error;

/// Query parameters for `/blocks/{blockId}` and `/blocks/head`
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockQueryParams {
    /// When true, include documentation for events
    #[serde(default)]
    pub event_docs: bool,
    /// When true, include documentation for extrinsics
    #[serde(default)]
    pub extrinsic_docs: bool,
}

impl From<BlockQueryParams> for BlockOptions {
    fn from(params: BlockQueryParams) -> Self {
        Self {
            event_docs: params.event_docs,
            extrinsic_docs: params.extrinsic_docs,
        }
    }
}

#[derive(Debug, Error)]
pub enum GetBlockError {
    #[error(transparent)]
    InvalidBlockId(#[from] BlockIdParseError),

    #[error("Block at height {0} not found")]
    BlockNotFound(u64),

    #[error("Failed to resolve block")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

impl GetBlockError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBlockId(_) => StatusCode::BAD_REQUEST,
            Self::BlockNotFound(_) | Self::Assemble(AssembleError::BlockNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Gateway(_) | Self::Assemble(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The error and its sources, outermost first
    fn message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl IntoResponse for GetBlockError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "code": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.message(),
        }));

        (status, body).into_response()
    }
}

/// Handler for GET /blocks/{blockId}
pub async fn get_block(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    Query(params): Query<BlockQueryParams>,
) -> Result<Json<Block>, GetBlockError> {
    let hash = match block_id.parse::<BlockId>()? {
        BlockId::Hash(hash) => hash.into(),
        BlockId::Number(number) => state
            .api
            .block_hash(number)
            .await?
            .ok_or(GetBlockError::BlockNotFound(number))?,
    };

    serve_block(&state, hash, params).await
}

pub(super) async fn serve_block(
    state: &AppState,
    hash: H256,
    params: BlockQueryParams,
) -> Result<Json<Block>, GetBlockError> {
    let block = blocks::assemble(
        state.api.as_ref(),
        hash,
        params.into(),
        state.fee_tables.as_ref(),
    )
    .await?;
    Ok(Json(block))
}
