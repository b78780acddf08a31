// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

//! [`ChainApi`] over a node's legacy JSON-RPC methods.

use super::{
    ChainApi, GatewayError, Header, RawBlock, RawEvent, RuntimeRegistry, RuntimeVersion,
};
use parity_scale_codec::Decode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sp_core::H256;
use sp_core::crypto::AccountId32;
use sp_core::hashing::twox_128;
use sp_runtime::generic::DigestItem;
use std::collections::HashMap;
use std::sync::Arc;
use subxt_rpcs::RpcClient;
use subxt_rpcs::client::{RpcParams, rpc_params};
use tokio::sync::RwLock;

/// Generic Substrate prefix, used when the node does not report `ss58Format`
const DEFAULT_SS58_PREFIX: u16 = 42;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcHeader {
    parent_hash: H256,
    number: String,
    state_root: H256,
    extrinsics_root: H256,
    digest: RpcDigest,
}

#[derive(Debug, Deserialize)]
struct RpcDigest {
    logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RpcSignedBlock {
    block: RpcBlock,
}

#[derive(Debug, Deserialize)]
struct RpcBlock {
    header: RpcHeader,
    extrinsics: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcRuntimeVersion {
    spec_name: String,
    spec_version: u32,
}

impl From<RpcRuntimeVersion> for RuntimeVersion {
    fn from(v: RpcRuntimeVersion) -> Self {
        Self {
            spec_name: v.spec_name,
            spec_version: v.spec_version,
        }
    }
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, GatewayError> {
    hex::decode(value.strip_prefix("0x").unwrap_or(value)).map_err(GatewayError::hex(field))
}

impl TryFrom<RpcHeader> for Header {
    type Error = GatewayError;

    fn try_from(header: RpcHeader) -> Result<Self, Self::Error> {
        let number = u64::from_str_radix(header.number.trim_start_matches("0x"), 16)
            .map_err(|_| GatewayError::Shape(format!("invalid block number '{}'", header.number)))?;

        let digest_logs = header
            .digest
            .logs
            .iter()
            .map(|log| {
                let bytes = decode_hex("digest log", log)?;
                DigestItem::decode(&mut &bytes[..]).map_err(GatewayError::codec("digest log"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Header {
            parent_hash: header.parent_hash,
            number,
            state_root: header.state_root,
            extrinsics_root: header.extrinsics_root,
            digest_logs,
        })
    }
}

/// Storage key of a plain storage item: `twox128(pallet) ++ twox128(item)`
pub(crate) fn plain_storage_key(pallet: &str, name: &str) -> String {
    let mut key = twox_128(pallet.as_bytes()).to_vec();
    key.extend(twox_128(name.as_bytes()));
    format!("0x{}", hex::encode(key))
}

pub struct NodeGateway {
    rpc: RpcClient,
    ss58_prefix: u16,
    /// Decoded metadata keyed by spec version
    registries: RwLock<HashMap<u32, Arc<RuntimeRegistry>>>,
}

impl NodeGateway {
    pub async fn connect(url: &str) -> Result<Self, GatewayError> {
        let rpc = RpcClient::from_insecure_url(url)
            .await
            .map_err(GatewayError::rpc("connect"))?;
        Self::from_client(rpc).await
    }

    pub async fn from_client(rpc: RpcClient) -> Result<Self, GatewayError> {
        let properties: Value = rpc
            .request("system_properties", rpc_params![])
            .await
            .map_err(GatewayError::rpc("system_properties"))?;

        let ss58_prefix = properties
            .get("ss58Format")
            .and_then(|v| v.as_u64())
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SS58_PREFIX);

        Ok(Self {
            rpc,
            ss58_prefix,
            registries: RwLock::new(HashMap::new()),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: RpcParams,
    ) -> Result<T, GatewayError> {
        self.rpc
            .request(method, params)
            .await
            .map_err(GatewayError::rpc(method))
    }

    async fn storage_raw(&self, key: &str, hash: H256) -> Result<Option<Vec<u8>>, GatewayError> {
        let value: Option<String> = self
            .request("state_getStorage", rpc_params![key, hash])
            .await?;
        value.map(|v| decode_hex("storage value", &v)).transpose()
    }

    async fn cached_registry(&self, spec_version: u32) -> Option<Arc<RuntimeRegistry>> {
        self.registries.read().await.get(&spec_version).cloned()
    }

    async fn cache_registry(
        &self,
        version: &RuntimeVersion,
        bytes: &[u8],
    ) -> Result<Arc<RuntimeRegistry>, GatewayError> {
        let registry = Arc::new(self.decode_metadata(bytes, version)?);
        tracing::debug!("Cached metadata for spec version {}", version.spec_version);
        self.registries
            .write()
            .await
            .insert(version.spec_version, registry.clone());
        Ok(registry)
    }
}

impl ChainApi for NodeGateway {
    type Registry = RuntimeRegistry;
    type Constants = RuntimeRegistry;

    async fn finalized_head(&self) -> Result<H256, GatewayError> {
        self.request("chain_getFinalizedHead", rpc_params![]).await
    }

    async fn block_hash(&self, number: u64) -> Result<Option<H256>, GatewayError> {
        self.request("chain_getBlockHash", rpc_params![number]).await
    }

    async fn block(&self, hash: H256) -> Result<Option<RawBlock>, GatewayError> {
        let block: Option<RpcSignedBlock> =
            self.request("chain_getBlock", rpc_params![hash]).await?;
        let Some(RpcSignedBlock { block }) = block else {
            return Ok(None);
        };

        let extrinsics = block
            .extrinsics
            .iter()
            .map(|xt| decode_hex("extrinsic", xt))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(RawBlock {
            header: block.header.try_into()?,
            extrinsics,
        }))
    }

    async fn header(&self, hash: H256) -> Result<Header, GatewayError> {
        let header: Option<RpcHeader> = self.request("chain_getHeader", rpc_params![hash]).await?;
        header
            .ok_or_else(|| GatewayError::BlockNotFound(format!("{hash:?}")))?
            .try_into()
    }

    async fn events_at(&self, hash: H256) -> Result<Vec<RawEvent>, GatewayError> {
        let key = plain_storage_key("System", "Events");
        let (registry, raw) = tokio::try_join!(self.registry_at(hash), self.storage_raw(&key, hash))?;
        match raw {
            Some(bytes) => registry.decode_events(&bytes),
            None => Ok(Vec::new()),
        }
    }

    async fn validators_at(&self, hash: H256) -> Result<Option<Vec<AccountId32>>, GatewayError> {
        let key = plain_storage_key("Session", "Validators");
        let Some(bytes) = self.storage_raw(&key, hash).await? else {
            return Ok(None);
        };
        let validators = Vec::<AccountId32>::decode(&mut &bytes[..])
            .map_err(GatewayError::codec("Session.Validators"))?;
        Ok(Some(validators))
    }

    async fn runtime_version_at(&self, hash: H256) -> Result<RuntimeVersion, GatewayError> {
        let version: RpcRuntimeVersion = self
            .request("state_getRuntimeVersion", rpc_params![hash])
            .await?;
        Ok(version.into())
    }

    async fn live_runtime_version(&self) -> Result<RuntimeVersion, GatewayError> {
        let version: RpcRuntimeVersion = self
            .request("state_getRuntimeVersion", rpc_params![])
            .await?;
        Ok(version.into())
    }

    async fn live_constants(&self) -> Result<Arc<RuntimeRegistry>, GatewayError> {
        let version = self.live_runtime_version().await?;
        if let Some(registry) = self.cached_registry(version.spec_version).await {
            return Ok(registry);
        }
        let metadata: String = self.request("state_getMetadata", rpc_params![]).await?;
        let bytes = decode_hex("metadata", &metadata)?;
        self.cache_registry(&version, &bytes).await
    }

    async fn storage_at(
        &self,
        pallet: &str,
        name: &str,
        hash: H256,
    ) -> Result<Option<Value>, GatewayError> {
        let registry = self.registry_at(hash).await?;
        if !registry.has_storage(pallet, name) {
            return Ok(None);
        }
        let raw = self
            .storage_raw(&plain_storage_key(pallet, name), hash)
            .await?;
        registry.decode_storage(pallet, name, raw.as_deref())
    }

    async fn raw_metadata_at(&self, hash: H256) -> Result<Vec<u8>, GatewayError> {
        let metadata: String = self
            .request("state_getMetadata", rpc_params![hash])
            .await?;
        decode_hex("metadata", &metadata)
    }

    fn decode_metadata(
        &self,
        bytes: &[u8],
        version: &RuntimeVersion,
    ) -> Result<RuntimeRegistry, GatewayError> {
        RuntimeRegistry::from_bytes(bytes, version, self.ss58_prefix)
    }

    async fn registry_at(&self, hash: H256) -> Result<Arc<RuntimeRegistry>, GatewayError> {
        let version = self.runtime_version_at(hash).await?;
        if let Some(registry) = self.cached_registry(version.spec_version).await {
            return Ok(registry);
        }
        let bytes = self.raw_metadata_at(hash).await?;
        self.cache_registry(&version, &bytes).await
    }

    fn ss58_prefix(&self) -> u16 {
        self.ss58_prefix
    }
}
