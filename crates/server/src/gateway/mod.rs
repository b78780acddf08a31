// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Node access for block assembly.
//!
//! [`ChainApi`] is everything the block pipeline needs from a node: headers and bodies,
//! events, storage, constants, runtime versions and a per-block type registry able to decode
//! extrinsics and calls. [`NodeGateway`] implements it over JSON-RPC; tests implement it in
//! memory.
//!
//! Decoded values cross this boundary as `serde_json::Value` already normalized for the API:
//! numbers as decimal strings, field names in camelCase, byte sequences as `0x` hex and
//! account ids as SS58.

mod convert;
mod error;
mod metadata;
mod rpc;
mod shape;

pub use error::GatewayError;
pub use metadata::RuntimeRegistry;
pub use rpc::NodeGateway;

use serde_json::Value;
use sp_core::H256;
use sp_core::crypto::AccountId32;
use sp_runtime::generic::DigestItem;
use std::future::Future;
use std::sync::Arc;

/// Phase of block execution an event was emitted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ApplyExtrinsic(u32),
    Finalization,
    Initialization,
}

/// An event as read from `System.Events`
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub phase: Phase,
    pub pallet: String,
    pub method: String,
    pub data: Vec<Value>,
}

/// A call as decoded from SCALE, before argument sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    pub pallet: String,
    pub method: String,
    pub args: Vec<(String, CallArg)>,
}

/// A single call argument.
///
/// Calls nested directly in the call type (`utility.batch`, `sudo.sudo`) arrive already
/// decoded as [`CallArg::Call`]. Calls carried as encoded bytes arrive as
/// [`CallArg::Opaque`] and are decoded later with the block's registry.
#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    Value(Value),
    Call(Box<RawCall>),
    Sequence(Vec<CallArg>),
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignaturePayload {
    pub signer: Value,
    pub signature: Value,
    pub nonce: Option<u128>,
    pub tip: Option<u128>,
}

/// An extrinsic decoded with the registry of the block that contains it
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedExtrinsic {
    pub signature: Option<SignaturePayload>,
    pub call: RawCall,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub parent_hash: H256,
    pub number: u64,
    pub state_root: H256,
    pub extrinsics_root: H256,
    pub digest_logs: Vec<DigestItem>,
}

/// A block header plus its raw, length-prefixed extrinsics
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub header: Header,
    pub extrinsics: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersion {
    pub spec_name: String,
    pub spec_version: u32,
}

/// Decoding capabilities of one runtime's metadata
pub trait TypeRegistry: Send + Sync {
    fn decode_extrinsic(&self, bytes: &[u8]) -> Result<DecodedExtrinsic, GatewayError>;

    /// Decode a bare encoded call (no extrinsic envelope)
    fn decode_call(&self, bytes: &[u8]) -> Result<RawCall, GatewayError>;

    fn call_docs(&self, pallet: &str, method: &str) -> Option<String>;

    fn event_docs(&self, pallet: &str, method: &str) -> Option<String>;
}

/// Pallet constants of one runtime
pub trait ConstantLookup: Send + Sync {
    fn constant(&self, pallet: &str, name: &str) -> Option<Value>;
}

pub trait ChainApi: Send + Sync {
    type Registry: TypeRegistry;
    type Constants: ConstantLookup;

    fn finalized_head(&self) -> impl Future<Output = Result<H256, GatewayError>> + Send;

    /// Canonical hash at `number`, `None` when the chain is not that high
    fn block_hash(
        &self,
        number: u64,
    ) -> impl Future<Output = Result<Option<H256>, GatewayError>> + Send;

    fn block(&self, hash: H256)
    -> impl Future<Output = Result<Option<RawBlock>, GatewayError>> + Send;

    fn header(&self, hash: H256) -> impl Future<Output = Result<Header, GatewayError>> + Send;

    fn events_at(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Vec<RawEvent>, GatewayError>> + Send;

    /// `Session.Validators` at `hash`, `None` when the runtime has no session pallet
    fn validators_at(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Option<Vec<AccountId32>>, GatewayError>> + Send;

    fn runtime_version_at(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<RuntimeVersion, GatewayError>> + Send;

    /// Runtime the connected node is currently running
    fn live_runtime_version(
        &self,
    ) -> impl Future<Output = Result<RuntimeVersion, GatewayError>> + Send;

    fn live_constants(
        &self,
    ) -> impl Future<Output = Result<Arc<Self::Constants>, GatewayError>> + Send;

    /// Value of a plain (keyless) storage item, `None` when the item or its value is absent
    fn storage_at(
        &self,
        pallet: &str,
        name: &str,
        hash: H256,
    ) -> impl Future<Output = Result<Option<Value>, GatewayError>> + Send;

    fn raw_metadata_at(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Vec<u8>, GatewayError>> + Send;

    /// Decode raw metadata of the runtime `version`
    fn decode_metadata(
        &self,
        bytes: &[u8],
        version: &RuntimeVersion,
    ) -> Result<Self::Constants, GatewayError>;

    fn registry_at(
        &self,
        hash: H256,
    ) -> impl Future<Output = Result<Arc<Self::Registry>, GatewayError>> + Send;

    fn ss58_prefix(&self) -> u16;
}
