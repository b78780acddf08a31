use super::call_tree;
use super::types::{CallArgs, Event, Extrinsic, ExtrinsicSuccess, FeeInfo, MethodName, Signature};
use crate::gateway::{DecodedExtrinsic, TypeRegistry};
use serde_json::Value;
use sp_core::hashing::blake2_256;

/// `DispatchInfo` reported by an extrinsic's outcome event
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DispatchInfo {
    /// As rendered in the event: a bare number or `{ refTime, proofSize }`
    pub weight: Option<Value>,
    pub class: Option<String>,
}

/// An extrinsic while its block is being assembled.
///
/// The attribution and fee passes mutate it in place, [`ExtrinsicBuilder::finish`] freezes it.
#[derive(Debug, Clone)]
pub(crate) struct ExtrinsicBuilder {
    pub method: MethodName,
    /// Pallet and call as named by the runtime, for docs lookup
    pub pallet_name: String,
    pub call_name: String,
    pub signature: Option<Signature>,
    pub nonce: Option<u128>,
    pub tip: Option<u128>,
    pub args: CallArgs,
    pub hash: String,
    pub encoded_len: usize,
    pub events: Vec<Event>,
    pub success: ExtrinsicSuccess,
    pub pays_fee: Option<bool>,
    pub dispatch: Option<DispatchInfo>,
    pub info: FeeInfo,
    pub docs: Option<String>,
}

impl ExtrinsicBuilder {
    pub fn new<R: TypeRegistry + ?Sized>(
        bytes: &[u8],
        decoded: DecodedExtrinsic,
        registry: &R,
    ) -> Self {
        let call = call_tree::parse(&decoded.call, registry);
        let signed = decoded.signature.is_some();
        let (signature, nonce, tip) = match decoded.signature {
            Some(payload) => (
                Some(Signature {
                    signature: payload.signature,
                    signer: payload.signer,
                }),
                payload.nonce,
                payload.tip,
            ),
            None => (None, None, None),
        };

        Self {
            method: call.method,
            pallet_name: decoded.call.pallet,
            call_name: decoded.call.method,
            signature,
            nonce,
            tip,
            args: call.args,
            hash: format!("0x{}", hex::encode(blake2_256(bytes))),
            encoded_len: bytes.len(),
            events: Vec::new(),
            success: ExtrinsicSuccess::Unknown,
            // Unsigned extrinsics never pay fees
            pays_fee: if signed { None } else { Some(false) },
            dispatch: None,
            info: FeeInfo::Absent,
            docs: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    pub fn finish(self) -> Extrinsic {
        Extrinsic {
            method: self.method,
            signature: self.signature,
            nonce: self.nonce.map(|n| n.to_string()),
            args: self.args,
            tip: self.tip.map(|t| t.to_string()),
            hash: self.hash,
            info: self.info,
            events: self.events,
            success: self.success,
            pays_fee: self.pays_fee,
            docs: self.docs,
        }
    }
}
