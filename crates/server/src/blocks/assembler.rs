// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Orchestration of a single block request.

use super::author;
use super::builder::ExtrinsicBuilder;
use super::error::AssembleError;
use super::events::{self, Lifecycle};
use super::fees::{self, FeeError};
use super::types::{Block, BlockOptions, DigestLog, FeeInfo};
use crate::gateway::{ChainApi, Header, TypeRegistry};
use crate::types::BlockHash;
use config::ChainFeeConfigs;
use sp_core::H256;

/// Fetch, decode and annotate the block with `hash`.
pub async fn assemble<A: ChainApi>(
    api: &A,
    hash: H256,
    options: BlockOptions,
    fee_tables: &ChainFeeConfigs,
) -> Result<Block, AssembleError> {
    let block_hash = BlockHash::from(hash);

    let (block, events, validators, registry) = tokio::join!(
        api.block(hash),
        api.events_at(hash),
        api.validators_at(hash),
        api.registry_at(hash),
    );

    let block = block
        .map_err(AssembleError::unavailable("block", block_hash))?
        .ok_or(AssembleError::BlockNotFound(block_hash))?;
    let registry = registry.map_err(AssembleError::unavailable("metadata", block_hash))?;
    let validators = validators.unwrap_or_else(|e| {
        tracing::warn!("Block {}: validator set unavailable: {}", block_hash, e);
        None
    });

    let mut extrinsics = block
        .extrinsics
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            registry
                .decode_extrinsic(bytes)
                .map(|decoded| ExtrinsicBuilder::new(bytes, decoded, &*registry))
                .map_err(|e| AssembleError::UpstreamInconsistency {
                    hash: block_hash,
                    reason: format!("extrinsic {index} could not be decoded: {e}"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Lifecycle {
        mut on_initialize,
        mut on_finalize,
    } = events::attribute(events, &mut extrinsics, block_hash)?;

    let header = block.header;
    let logs: Vec<DigestLog> = header.digest_logs.iter().map(DigestLog::from).collect();

    let author_id = if header.parent_hash.is_zero() {
        None
    } else {
        annotate_fees(api, &header, &mut extrinsics, fee_tables, block_hash).await;
        author::resolve(validators.as_deref(), &logs, api.ss58_prefix())
    };

    if options.extrinsic_docs {
        for extrinsic in extrinsics.iter_mut() {
            extrinsic.docs = registry.call_docs(&extrinsic.pallet_name, &extrinsic.call_name);
        }
    }
    if options.event_docs {
        let buckets = extrinsics
            .iter_mut()
            .map(|e| &mut e.events)
            .chain([&mut on_initialize.events, &mut on_finalize.events]);
        for events in buckets {
            for event in events.iter_mut() {
                event.docs = registry.event_docs(&event.pallet_name, &event.method.method);
            }
        }
    }

    Ok(Block {
        number: header.number.to_string(),
        hash: block_hash,
        parent_hash: header.parent_hash.into(),
        state_root: header.state_root.into(),
        extrinsics_root: header.extrinsics_root.into(),
        author_id,
        logs,
        on_initialize,
        extrinsics: extrinsics.into_iter().map(ExtrinsicBuilder::finish).collect(),
        on_finalize,
    })
}

/// Attach fee info to every signed extrinsic that pays a fee.
///
/// Failures are recorded on the affected extrinsics and never fail the block.
async fn annotate_fees<A: ChainApi>(
    api: &A,
    header: &Header,
    extrinsics: &mut [ExtrinsicBuilder],
    fee_tables: &ChainFeeConfigs,
    block_hash: BlockHash,
) {
    let paying = |e: &ExtrinsicBuilder| e.is_signed() && e.pays_fee == Some(true);
    if !extrinsics.iter().any(paying) {
        return;
    }

    let context = match fees::build_context(api, header, fee_tables).await {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!("Block {}: {}", block_hash, e);
            let reason = e.to_string();
            for extrinsic in extrinsics.iter_mut().filter(|e| paying(e)) {
                extrinsic.info = FeeInfo::Error(reason.clone());
            }
            return;
        }
    };

    for (index, extrinsic) in extrinsics.iter_mut().enumerate().filter(|(_, e)| paying(e)) {
        let dispatch = extrinsic.dispatch.as_ref();
        let weight = dispatch.and_then(|d| d.weight.clone());
        let ref_time = weight.as_ref().and_then(fees::parse_weight);

        extrinsic.info = match (weight, ref_time) {
            (Some(weight), Some(ref_time)) => FeeInfo::Computed {
                partial_fee: fees::compute_fee(&context, extrinsic.encoded_len, ref_time),
                class: dispatch
                    .and_then(|d| d.class.clone())
                    .unwrap_or_else(|| "Normal".to_string()),
                weight,
            },
            _ => {
                tracing::warn!(
                    "Block {}: extrinsic {}: {}",
                    block_hash,
                    index,
                    FeeError::MissingWeight
                );
                FeeInfo::Error(FeeError::MissingWeight.to_string())
            }
        };
    }
}
