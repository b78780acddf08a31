//! Decoding against one runtime's metadata.
//!
//! V14 and V15 runtimes describe their types in a portable registry. V9 to V13 runtimes only
//! name their types, so those names are resolved against the chain's historic type
//! definitions plus the call and event enums recovered from the metadata itself.

use super::convert::{JsonConverter, first_u128};
use super::shape::{Shape, is_byte_collection, shape_of};
use super::{
    CallArg, ConstantLookup, DecodedExtrinsic, GatewayError, Phase, RawCall, RawEvent,
    RuntimeVersion, SignaturePayload, TypeRegistry,
};
use frame_decode::constants::ConstantTypeInfo;
use frame_decode::extrinsics::ExtrinsicTypeInfo;
use frame_decode::helpers::{ToTypeRegistry, type_registry_from_metadata};
use frame_decode::legacy_types;
use frame_decode::storage::StorageTypeInfo;
use frame_metadata::decode_different::DecodeDifferent;
use frame_metadata::{RuntimeMetadata, RuntimeMetadataPrefixed, v9, v10, v11, v12, v13, v14, v15};
use lazy_static::lazy_static;
use parity_scale_codec::{Compact, Decode};
use scale_info::form::PortableForm;
use scale_info::{PortableRegistry, TypeDef, Variant};
use scale_info_legacy::{ChainTypeRegistry, TypeRegistrySet};
use scale_type_resolver::TypeResolver;
use scale_value::scale::decode_as_type;
use scale_value::{Composite, Value, ValueDef};
use serde_json::Value as Json;
use std::collections::HashMap;

const SIGNED_BIT: u8 = 0b1000_0000;
const GENERAL_BIT: u8 = 0b0100_0000;
const VERSION_MASK: u8 = 0b0011_1111;

/// Name under which historic metadata exposes the outer call enum
const HISTORIC_CALL_PATH: &str = "builtin::Call";

lazy_static! {
    static ref POLKADOT_TYPES: ChainTypeRegistry = legacy_types::polkadot::relay_chain();
    static ref KUSAMA_TYPES: ChainTypeRegistry = legacy_types::kusama::relay_chain();
    static ref KUSAMA_ASSET_HUB_TYPES: ChainTypeRegistry = legacy_types::kusama::asset_hub();
}

/// Historic type definitions for a chain, Polkadot's unless the spec name says otherwise
fn historic_types(spec_name: &str) -> &'static ChainTypeRegistry {
    match spec_name {
        "kusama" => &*KUSAMA_TYPES,
        "statemine" | "asset-hub-kusama" => &*KUSAMA_ASSET_HUB_TYPES,
        _ => &*POLKADOT_TYPES,
    }
}

fn historic_types_for<Md: ToTypeRegistry>(
    metadata: &Md,
    version: &RuntimeVersion,
) -> Result<TypeRegistrySet<'static>, GatewayError> {
    let from_metadata =
        type_registry_from_metadata(metadata).map_err(|e| GatewayError::Decode {
            what: "runtime metadata",
            reason: e.to_string(),
        })?;
    let mut types =
        historic_types(&version.spec_name).for_spec_version(u64::from(version.spec_version));
    types.prepend(from_metadata);
    Ok(types)
}

#[derive(Debug, Default)]
struct CallDocs {
    docs: String,
    /// Declared type name of each argument, as written in the pallet
    arg_types: Vec<Option<String>>,
}

/// Call and event documentation, keyed by pallet then by name
#[derive(Debug, Default)]
struct Docs {
    calls: HashMap<String, HashMap<String, CallDocs>>,
    events: HashMap<String, HashMap<String, String>>,
}

impl Docs {
    fn call(&self, pallet: &str, method: &str) -> Option<&CallDocs> {
        self.calls.get(pallet)?.get(method)
    }

    fn event(&self, pallet: &str, method: &str) -> Option<&String> {
        self.events.get(pallet)?.get(method)
    }
}

fn variants(
    types: &PortableRegistry,
    type_id: u32,
) -> impl Iterator<Item = &Variant<PortableForm>> {
    types
        .resolve(type_id)
        .into_iter()
        .flat_map(|ty| match &ty.type_def {
            TypeDef::Variant(def) => def.variants.as_slice(),
            _ => &[],
        })
}

macro_rules! portable_docs {
    ($metadata:expr) => {{
        let mut docs = Docs::default();
        for pallet in &$metadata.pallets {
            if let Some(calls) = &pallet.calls {
                let entries = variants(&$metadata.types, calls.ty.id)
                    .map(|v| {
                        let call = CallDocs {
                            docs: v.docs.join("\n"),
                            arg_types: v.fields.iter().map(|f| f.type_name.clone()).collect(),
                        };
                        (v.name.clone(), call)
                    })
                    .collect();
                docs.calls.insert(pallet.name.clone(), entries);
            }
            if let Some(event) = &pallet.event {
                let entries = variants(&$metadata.types, event.ty.id)
                    .map(|v| (v.name.clone(), v.docs.join("\n")))
                    .collect();
                docs.events.insert(pallet.name.clone(), entries);
            }
        }
        docs
    }};
}

fn decoded<B, O>(value: &DecodeDifferent<B, O>) -> Option<&O> {
    match value {
        DecodeDifferent::Decoded(value) => Some(value),
        DecodeDifferent::Encode(_) => None,
    }
}

fn joined<B>(lines: &DecodeDifferent<B, Vec<String>>) -> String {
    decoded(lines).map(|l| l.join("\n")).unwrap_or_default()
}

macro_rules! historic_docs {
    ($metadata:expr) => {{
        let mut docs = Docs::default();
        for module in decoded(&$metadata.modules).into_iter().flatten() {
            let Some(pallet) = decoded(&module.name) else {
                continue;
            };
            if let Some(calls) = module.calls.as_ref().and_then(decoded) {
                let entries = calls
                    .iter()
                    .filter_map(|call| {
                        let args = decoded(&call.arguments)?;
                        let info = CallDocs {
                            docs: joined(&call.documentation),
                            arg_types: args.iter().map(|a| decoded(&a.ty).cloned()).collect(),
                        };
                        Some((decoded(&call.name)?.clone(), info))
                    })
                    .collect();
                docs.calls.insert(pallet.clone(), entries);
            }
            if let Some(events) = module.event.as_ref().and_then(decoded) {
                let entries = events
                    .iter()
                    .filter_map(|event| {
                        Some((decoded(&event.name)?.clone(), joined(&event.documentation)))
                    })
                    .collect();
                docs.events.insert(pallet.clone(), entries);
            }
        }
        docs
    }};
}

/// `Call` type parameter of a V14 extrinsic type
fn v14_call_ty(metadata: &v14::RuntimeMetadataV14) -> Result<u32, GatewayError> {
    metadata
        .types
        .resolve(metadata.extrinsic.ty.id)
        .and_then(|ty| ty.type_params.iter().find(|p| p.name == "Call"))
        .and_then(|p| p.ty.as_ref())
        .map(|t| t.id)
        .ok_or_else(|| GatewayError::Shape("extrinsic type has no 'Call' parameter".to_string()))
}

#[derive(Debug)]
struct Runtime<Md, R> {
    metadata: Md,
    types: R,
    /// Type path of the outer call enum, used to spot nested calls
    call_path: String,
    docs: Docs,
    ss58_prefix: u16,
}

impl<Md> Runtime<Md, PortableRegistry> {
    fn modern(
        metadata: Md,
        types: PortableRegistry,
        call_ty: u32,
        docs: Docs,
        ss58_prefix: u16,
    ) -> Result<Self, GatewayError> {
        let Shape::Variant { path } = shape_of(&types, call_ty) else {
            return Err(GatewayError::Shape("call type is not an enum".to_string()));
        };
        Ok(Self {
            metadata,
            types,
            call_path: path,
            docs,
            ss58_prefix,
        })
    }
}

macro_rules! historic_runtime {
    ($variant:ident, $metadata:expr, $version:expr, $ss58_prefix:expr) => {{
        let metadata = $metadata;
        let types = historic_types_for(&metadata, $version)?;
        let docs = historic_docs!(metadata);
        AnyRuntime::$variant(Runtime {
            metadata,
            types,
            call_path: HISTORIC_CALL_PATH.to_string(),
            docs,
            ss58_prefix: $ss58_prefix,
        })
    }};
}

fn info_error(what: &'static str, error: impl std::fmt::Display) -> GatewayError {
    GatewayError::Decode {
        what,
        reason: error.to_string(),
    }
}

impl<Md, R> Runtime<Md, R>
where
    R: TypeResolver,
    Md: ExtrinsicTypeInfo<TypeId = R::TypeId>
        + ConstantTypeInfo<TypeId = R::TypeId>
        + StorageTypeInfo<TypeId = R::TypeId>,
{
    fn converter(&self) -> JsonConverter<'_, R> {
        JsonConverter::new(&self.types, self.ss58_prefix)
    }

    fn decode_value(
        &self,
        cursor: &mut &[u8],
        type_id: R::TypeId,
        what: &'static str,
    ) -> Result<Value<R::TypeId>, GatewayError> {
        decode_as_type(cursor, type_id, &self.types).map_err(|e| GatewayError::Decode {
            what,
            reason: e.to_string(),
        })
    }

    fn decode_extrinsic(&self, bytes: &[u8]) -> Result<DecodedExtrinsic, GatewayError> {
        let mut cursor = bytes;
        Compact::<u32>::decode(&mut cursor).map_err(GatewayError::codec("extrinsic length"))?;
        let version = u8::decode(&mut cursor).map_err(GatewayError::codec("extrinsic version"))?;

        let signature = match (version & VERSION_MASK, version & !VERSION_MASK) {
            (4 | 5, 0) => None,
            (4, SIGNED_BIT) => {
                let info = self
                    .metadata
                    .extrinsic_signature_info()
                    .map_err(|e| info_error("signature", e))?;
                let address = self.decode_value(&mut cursor, info.address_id, "address")?;
                let signature = self.decode_value(&mut cursor, info.signature_id, "signature")?;
                let (nonce, tip) = self.extensions_at(&mut cursor, None)?;

                let converter = self.converter();
                Some(SignaturePayload {
                    signer: converter.convert(&address),
                    signature: converter.convert(&signature),
                    nonce,
                    tip,
                })
            }
            (5, GENERAL_BIT) => {
                let extension_version =
                    u8::decode(&mut cursor).map_err(GatewayError::codec("extension version"))?;
                self.extensions_at(&mut cursor, Some(extension_version))?;
                None
            }
            (other, _) => {
                return Err(GatewayError::Decode {
                    what: "extrinsic",
                    reason: format!("unsupported extrinsic version {other}"),
                });
            }
        };

        Ok(DecodedExtrinsic {
            signature,
            call: self.call_at(&mut cursor)?,
        })
    }

    /// Decode the transaction extensions, returning the nonce and tip they carry
    fn extensions_at(
        &self,
        cursor: &mut &[u8],
        extension_version: Option<u8>,
    ) -> Result<(Option<u128>, Option<u128>), GatewayError> {
        let info = self
            .metadata
            .extrinsic_extension_info(extension_version)
            .map_err(|e| info_error("signed extensions", e))?;

        let mut nonce = None;
        let mut tip = None;
        for extension in &info.extension_ids {
            let value = self.decode_value(cursor, extension.id.clone(), "signed extension")?;
            match &*extension.name {
                "CheckNonce" => nonce = first_u128(&value),
                "ChargeTransactionPayment" | "ChargeAssetTxPayment" => tip = first_u128(&value),
                _ => {}
            }
        }
        Ok((nonce, tip))
    }

    fn call_at(&self, cursor: &mut &[u8]) -> Result<RawCall, GatewayError> {
        let pallet_index = u8::decode(cursor).map_err(GatewayError::codec("pallet index"))?;
        let call_index = u8::decode(cursor).map_err(GatewayError::codec("call index"))?;
        let info = self
            .metadata
            .extrinsic_call_info_by_index(pallet_index, call_index)
            .map_err(|e| info_error("call", e))?;
        let arg_types = self
            .docs
            .call(&info.pallet_name, &info.call_name)
            .map(|c| c.arg_types.as_slice())
            .unwrap_or_default();

        let mut args = Vec::with_capacity(info.args.len());
        for (i, arg) in info.args.iter().enumerate() {
            let type_name = arg_types.get(i).and_then(|n| n.as_deref());
            let value = self.arg_at(cursor, arg.id.clone(), type_name)?;
            let name = if arg.name.is_empty() {
                i.to_string()
            } else {
                arg.name.to_string()
            };
            args.push((name, value));
        }

        Ok(RawCall {
            pallet: info.pallet_name.to_string(),
            method: info.call_name.to_string(),
            args,
        })
    }

    fn arg_at(
        &self,
        cursor: &mut &[u8],
        type_id: R::TypeId,
        type_name: Option<&str>,
    ) -> Result<CallArg, GatewayError> {
        let shape = shape_of(&self.types, type_id.clone());
        if shape.is_variant_at(&self.call_path) {
            return Ok(CallArg::Call(Box::new(self.call_at(cursor)?)));
        }

        // Kept as bytes here: the inner call may not decode, which must not fail the outer one
        let named = |name: &str| type_name.is_some_and(|n| n.contains(name));
        let opaque = shape.is_opaque_wrapper()
            || named("WrapperKeepOpaque")
            || (named("OpaqueCall") && is_byte_collection(&self.types, &shape));
        if opaque {
            let bytes = Vec::<u8>::decode(cursor).map_err(GatewayError::codec("opaque call"))?;
            return Ok(CallArg::Opaque(bytes));
        }

        if let Shape::Sequence { element } = &shape
            && shape_of(&self.types, element.clone()).is_variant_at(&self.call_path)
        {
            let Compact(len) =
                Compact::<u32>::decode(cursor).map_err(GatewayError::codec("call count"))?;
            let mut calls = Vec::with_capacity((len as usize).min(cursor.len()));
            for _ in 0..len {
                calls.push(CallArg::Call(Box::new(self.call_at(cursor)?)));
            }
            return Ok(CallArg::Sequence(calls));
        }

        let value = self.decode_value(cursor, type_id, "call argument")?;
        Ok(CallArg::Value(self.converter().convert(&value)))
    }

    fn decode_call(&self, bytes: &[u8]) -> Result<RawCall, GatewayError> {
        let mut cursor = bytes;
        let call = self.call_at(&mut cursor)?;
        if !cursor.is_empty() {
            return Err(GatewayError::Decode {
                what: "call",
                reason: format!("{} trailing bytes", cursor.len()),
            });
        }
        Ok(call)
    }

    fn has_storage(&self, pallet: &str, name: &str) -> bool {
        self.metadata
            .storage_info(pallet, name)
            .is_ok_and(|info| info.keys.is_empty())
    }

    fn decode_storage(
        &self,
        pallet: &str,
        name: &str,
        raw: Option<&[u8]>,
    ) -> Result<Option<Json>, GatewayError> {
        let Ok(info) = self.metadata.storage_info(pallet, name) else {
            return Ok(None);
        };
        if !info.keys.is_empty() {
            return Ok(None);
        }
        let Some(mut bytes) = raw.or(info.default_value.as_deref()) else {
            return Ok(None);
        };
        let value = self.decode_value(&mut bytes, info.value_id.clone(), "storage value")?;
        Ok(Some(self.converter().convert(&value)))
    }

    fn decode_events(&self, bytes: &[u8]) -> Result<Vec<RawEvent>, GatewayError> {
        let info = self.metadata.storage_info("System", "Events").map_err(|e| {
            GatewayError::Shape(format!("runtime has no System.Events storage: {e}"))
        })?;
        let value = self.decode_value(&mut &bytes[..], info.value_id.clone(), "System.Events")?;
        let ValueDef::Composite(records) = &value.value else {
            return Err(GatewayError::Shape("System.Events is not a sequence".to_string()));
        };

        records.values().map(|record| self.raw_event(record)).collect()
    }

    fn raw_event(&self, record: &Value<R::TypeId>) -> Result<RawEvent, GatewayError> {
        let ValueDef::Composite(Composite::Named(fields)) = &record.value else {
            return Err(GatewayError::Shape("event record is not a struct".to_string()));
        };
        let field = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v)
                .ok_or_else(|| GatewayError::Shape(format!("event record has no '{name}'")))
        };

        let phase = match &field("phase")?.value {
            ValueDef::Variant(v) => match v.name.as_str() {
                "ApplyExtrinsic" => v
                    .values
                    .values()
                    .next()
                    .and_then(first_u128)
                    .and_then(|n| u32::try_from(n).ok())
                    .map(Phase::ApplyExtrinsic)
                    .ok_or_else(|| {
                        GatewayError::Shape("ApplyExtrinsic phase without index".to_string())
                    })?,
                "Finalization" => Phase::Finalization,
                "Initialization" => Phase::Initialization,
                other => return Err(GatewayError::Shape(format!("unknown phase '{other}'"))),
            },
            _ => return Err(GatewayError::Shape("event phase is not an enum".to_string())),
        };

        let (pallet, method, values) = nested_variant(field("event")?)
            .ok_or_else(|| GatewayError::Shape("event is not a pallet/event pair".to_string()))?;
        let converter = self.converter();

        Ok(RawEvent {
            phase,
            pallet: pallet.to_string(),
            method: method.to_string(),
            data: values.values().map(|v| converter.convert(v)).collect(),
        })
    }

    fn constant(&self, pallet: &str, name: &str) -> Option<Json> {
        let info = self.metadata.constant_info(pallet, name).ok()?;
        let mut bytes = info.bytes;
        match self.decode_value(&mut bytes, info.type_id.clone(), "constant") {
            Ok(value) => Some(self.converter().convert(&value)),
            Err(e) => {
                tracing::debug!("Failed to decode constant {}.{}: {}", pallet, name, e);
                None
            }
        }
    }
}

/// `Outer(Inner { .. })`, the shape of events
fn nested_variant<T>(value: &Value<T>) -> Option<(&str, &str, &Composite<T>)> {
    let ValueDef::Variant(outer) = &value.value else {
        return None;
    };
    let inner = outer.values.values().next()?;
    let ValueDef::Variant(variant) = &inner.value else {
        return None;
    };
    Some((outer.name.as_str(), variant.name.as_str(), &variant.values))
}

#[derive(Debug)]
enum AnyRuntime {
    V9(Runtime<v9::RuntimeMetadataV9, TypeRegistrySet<'static>>),
    V10(Runtime<v10::RuntimeMetadataV10, TypeRegistrySet<'static>>),
    V11(Runtime<v11::RuntimeMetadataV11, TypeRegistrySet<'static>>),
    V12(Runtime<v12::RuntimeMetadataV12, TypeRegistrySet<'static>>),
    V13(Runtime<v13::RuntimeMetadataV13, TypeRegistrySet<'static>>),
    V14(Runtime<v14::RuntimeMetadataV14, PortableRegistry>),
    V15(Runtime<v15::RuntimeMetadataV15, PortableRegistry>),
}

macro_rules! with_runtime {
    ($any:expr, $runtime:ident => $body:expr) => {
        match $any {
            AnyRuntime::V9($runtime) => $body,
            AnyRuntime::V10($runtime) => $body,
            AnyRuntime::V11($runtime) => $body,
            AnyRuntime::V12($runtime) => $body,
            AnyRuntime::V13($runtime) => $body,
            AnyRuntime::V14($runtime) => $body,
            AnyRuntime::V15($runtime) => $body,
        }
    };
}

/// Types, pallets and extrinsic layout of one runtime.
///
/// Serves both as the block's [`TypeRegistry`] and as a [`ConstantLookup`].
#[derive(Debug)]
pub struct RuntimeRegistry {
    runtime: AnyRuntime,
}

impl RuntimeRegistry {
    /// Decode `state_getMetadata` bytes of the runtime `version`
    pub fn from_bytes(
        bytes: &[u8],
        version: &RuntimeVersion,
        ss58_prefix: u16,
    ) -> Result<Self, GatewayError> {
        let metadata = RuntimeMetadataPrefixed::decode(&mut &bytes[..])
            .map_err(GatewayError::codec("runtime metadata"))?;
        Self::from_metadata(metadata, version, ss58_prefix)
    }

    pub fn from_metadata(
        metadata: RuntimeMetadataPrefixed,
        version: &RuntimeVersion,
        ss58_prefix: u16,
    ) -> Result<Self, GatewayError> {
        let runtime = match metadata.1 {
            RuntimeMetadata::V9(m) => historic_runtime!(V9, m, version, ss58_prefix),
            RuntimeMetadata::V10(m) => historic_runtime!(V10, m, version, ss58_prefix),
            RuntimeMetadata::V11(m) => historic_runtime!(V11, m, version, ss58_prefix),
            RuntimeMetadata::V12(m) => historic_runtime!(V12, m, version, ss58_prefix),
            RuntimeMetadata::V13(m) => historic_runtime!(V13, m, version, ss58_prefix),
            RuntimeMetadata::V14(m) => {
                let call_ty = v14_call_ty(&m)?;
                let docs = portable_docs!(m);
                let types = m.types.clone();
                AnyRuntime::V14(Runtime::modern(m, types, call_ty, docs, ss58_prefix)?)
            }
            RuntimeMetadata::V15(m) => {
                let call_ty = m.extrinsic.call_ty.id;
                let docs = portable_docs!(m);
                let types = m.types.clone();
                AnyRuntime::V15(Runtime::modern(m, types, call_ty, docs, ss58_prefix)?)
            }
            other => return Err(GatewayError::UnsupportedMetadata(other.version())),
        };
        Ok(Self { runtime })
    }

    /// Whether the runtime declares the plain (keyless) storage item
    pub(crate) fn has_storage(&self, pallet: &str, name: &str) -> bool {
        with_runtime!(&self.runtime, r => r.has_storage(pallet, name))
    }

    /// Decode a plain storage value, falling back to the item's default when nothing is stored.
    ///
    /// `None` when the runtime has no such item, or it has no default and nothing is stored.
    pub(crate) fn decode_storage(
        &self,
        pallet: &str,
        name: &str,
        raw: Option<&[u8]>,
    ) -> Result<Option<Json>, GatewayError> {
        with_runtime!(&self.runtime, r => r.decode_storage(pallet, name, raw))
    }

    /// Decode the content of `System.Events`
    pub(crate) fn decode_events(&self, bytes: &[u8]) -> Result<Vec<RawEvent>, GatewayError> {
        with_runtime!(&self.runtime, r => r.decode_events(bytes))
    }

    fn docs(&self) -> &Docs {
        with_runtime!(&self.runtime, r => &r.docs)
    }
}

impl TypeRegistry for RuntimeRegistry {
    fn decode_extrinsic(&self, bytes: &[u8]) -> Result<DecodedExtrinsic, GatewayError> {
        with_runtime!(&self.runtime, r => r.decode_extrinsic(bytes))
    }

    fn decode_call(&self, bytes: &[u8]) -> Result<RawCall, GatewayError> {
        with_runtime!(&self.runtime, r => r.decode_call(bytes))
    }

    fn call_docs(&self, pallet: &str, method: &str) -> Option<String> {
        self.docs().call(pallet, method).map(|c| c.docs.clone())
    }

    fn event_docs(&self, pallet: &str, method: &str) -> Option<String> {
        self.docs().event(pallet, method).cloned()
    }
}

impl ConstantLookup for RuntimeRegistry {
    fn constant(&self, pallet: &str, name: &str) -> Option<Json> {
        with_runtime!(&self.runtime, r => r.constant(pallet, name))
    }
}




#[cfg(test)]
mod historic_tests {
    use super::historic_test_runtime::*;
    use super::*;
    use parity_scale_codec::Encode;
    use sp_core::H256;
    use sp_core::crypto::{AccountId32, Ss58Codec};
    use sp_runtime::{MultiAddress, MultiSignature};

    fn transfer(value: u128) -> Vec<u8> {
        let mut call = vec![5u8, 0];
        call.extend(MultiAddress::<AccountId32, u32>::Id(AccountId32::from([2u8; 32])).encode());
        call.extend(Compact(value).encode());
        call
    }

    fn with_length_prefix(body: Vec<u8>) -> Vec<u8> {
        let mut bytes = Compact(body.len() as u32).encode();
        bytes.extend(body);
        bytes
    }

    #[test]
    fn test_decode_historic_signed_extrinsic() {
        let registry = registry();
        let signer = AccountId32::from([1u8; 32]);

        let mut body = vec![4 | SIGNED_BIT];
        body.extend(MultiAddress::<AccountId32, u32>::Id(signer.clone()).encode());
        body.extend(MultiSignature::Sr25519(sp_core::sr25519::Signature::from_raw([7u8; 64])).encode());
        body.extend(Compact(3u32).encode());
        body.extend(Compact(50u128).encode());
        body.extend(transfer(12_345));

        let decoded = registry.decode_extrinsic(&with_length_prefix(body)).unwrap();
        let signature = decoded.signature.unwrap();
        assert_eq!(signature.nonce, Some(3));
        assert_eq!(signature.tip, Some(50));
        assert_eq!(
            signature.signer,
            serde_json::json!({ "id": signer.to_ss58check_with_version(0u16.into()) })
        );
        assert_eq!(decoded.call.pallet, "Balances");
        assert_eq!(decoded.call.method, "transfer");
        assert_eq!(
            decoded.call.args[1],
            ("value".to_string(), CallArg::Value(Json::String("12345".into())))
        );
    }

    #[test]
    fn test_historic_nested_and_opaque_calls() {
        let registry = registry();

        let mut batch = vec![26u8, 0];
        batch.extend(Compact(2u32).encode());
        batch.extend(transfer(1));
        batch.extend(transfer(2));
        let decoded = registry.decode_call(&batch).unwrap();
        let CallArg::Sequence(calls) = &decoded.args[0].1 else {
            panic!("expected a sequence of calls, got {:?}", decoded.args[0].1);
        };
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[1], CallArg::Call(c) if c.method == "transfer"));

        let mut as_multi = vec![30u8, 0];
        as_multi.extend(2u16.encode());
        as_multi.extend(vec![0xde_u8, 0xad].encode());
        let decoded = registry.decode_call(&as_multi).unwrap();
        assert_eq!(decoded.args[1].1, CallArg::Opaque(vec![0xde, 0xad]));
    }

    #[test]
    fn test_decode_historic_events() {
        let registry = registry();
        let mut bytes = Compact(1u32).encode();
        // Phase::ApplyExtrinsic(2)
        bytes.push(0);
        bytes.extend(2u32.encode());
        // System.ExtrinsicSuccess(DispatchInfo { weight, class: Normal, pays_fee: Yes })
        bytes.extend([0u8, 0]);
        bytes.extend(161_493_000u64.encode());
        bytes.extend([0u8, 0]);
        bytes.extend(Vec::<H256>::new().encode());

        let events = registry.decode_events(&bytes).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::ApplyExtrinsic(2));
        assert_eq!(events[0].pallet, "System");
        assert_eq!(events[0].method, "ExtrinsicSuccess");
        assert_eq!(events[0].data[0]["weight"], "161493000");
    }

    #[test]
    fn test_historic_docs_constants_and_storage() {
        let registry = registry();
        assert_eq!(
            registry.call_docs("Balances", "transfer").as_deref(),
            Some("Transfer some liquid free balance to another account.")
        );
        assert_eq!(
            registry.event_docs("System", "ExtrinsicSuccess").as_deref(),
            Some("An extrinsic completed successfully.")
        );
        assert_eq!(
            registry.constant("TransactionPayment", "TransactionByteFee"),
            Some(Json::String("1000000".into()))
        );
        assert_eq!(
            registry.decode_storage("System", "Events", None).unwrap(),
            Some(Json::Array(vec![]))
        );
    }
}
