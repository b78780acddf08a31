//! Response types for an assembled block.

use crate::gateway::Phase;
use crate::types::BlockHash;
use heck::ToLowerCamelCase;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use sp_runtime::ConsensusEngineId;
use sp_runtime::generic::DigestItem;

/// Options controlling optional parts of the block response
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockOptions {
    pub event_docs: bool,
    pub extrinsic_docs: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: String,
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub logs: Vec<DigestLog>,
    pub on_initialize: EventBucket,
    pub extrinsics: Vec<Extrinsic>,
    pub on_finalize: EventBucket,
}

/// Events emitted outside of any extrinsic
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventBucket {
    pub events: Vec<Event>,
}

/// Pallet and method of a call or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodName {
    pub pallet: String,
    pub method: String,
}

impl MethodName {
    /// Both parts in lowerCamelCase, as for calls
    pub fn call(pallet: &str, method: &str) -> Self {
        Self {
            pallet: pallet.to_lower_camel_case(),
            method: method.to_lower_camel_case(),
        }
    }

    /// Pallet in lowerCamelCase, event name untouched
    pub fn event(pallet: &str, method: &str) -> Self {
        Self {
            pallet: pallet.to_lower_camel_case(),
            method: method.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub method: MethodName,
    /// Pallet as named by the runtime
    #[serde(skip)]
    pub pallet_name: String,
    pub data: Vec<Value>,
    #[serde(skip)]
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    pub signature: Value,
    pub signer: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrinsic {
    pub method: MethodName,
    pub signature: Option<Signature>,
    pub nonce: Option<String>,
    pub args: CallArgs,
    pub tip: Option<String>,
    pub hash: String,
    pub info: FeeInfo,
    pub events: Vec<Event>,
    pub success: ExtrinsicSuccess,
    pub pays_fee: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// A decoded call with its arguments sanitized into a tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedCall {
    pub method: MethodName,
    pub args: CallArgs,
}

/// Named call arguments, serialized as an ordered JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs(pub Vec<(String, SanitizedArg)>);

impl CallArgs {
    pub fn get(&self, name: &str) -> Option<&SanitizedArg> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, arg)| arg)
    }
}

impl Serialize for CallArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, arg) in &self.0 {
            map.serialize_entry(name, arg)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SanitizedArg {
    Value(Value),
    Call(Box<SanitizedCall>),
    Sequence(Vec<SanitizedArg>),
}

/// Outcome of an extrinsic as reported by its events.
///
/// Serializes as `null`, `true`, `false`, or the reason string when events could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtrinsicSuccess {
    #[default]
    Unknown,
    Success,
    Failed,
    Unavailable(String),
}

impl ExtrinsicSuccess {
    /// Whether an outcome event has already been attributed
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl Serialize for ExtrinsicSuccess {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unknown => serializer.serialize_none(),
            Self::Success => serializer.serialize_bool(true),
            Self::Failed => serializer.serialize_bool(false),
            Self::Unavailable(reason) => serializer.serialize_str(reason),
        }
    }
}

/// Fee information of an extrinsic
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FeeInfo {
    /// Not computed (unsigned, fee-exempt, or genesis)
    #[default]
    Absent,
    Computed {
        weight: Value,
        class: String,
        partial_fee: u128,
    },
    Error(String),
}

impl Serialize for FeeInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_map(Some(0))?.end(),
            Self::Computed {
                weight,
                class,
                partial_fee,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("weight", weight)?;
                map.serialize_entry("class", class)?;
                map.serialize_entry("partialFee", &partial_fee.to_string())?;
                map.end()
            }
            Self::Error(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", reason)?;
                map.end()
            }
        }
    }
}

/// A header digest item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestLog {
    PreRuntime {
        engine: ConsensusEngineId,
        payload: Vec<u8>,
    },
    Consensus {
        engine: ConsensusEngineId,
        payload: Vec<u8>,
    },
    Seal {
        engine: ConsensusEngineId,
        payload: Vec<u8>,
    },
    RuntimeEnvironmentUpdated,
    Other(Vec<u8>),
}

impl DigestLog {
    fn type_name(&self) -> &'static str {
        match self {
            Self::PreRuntime { .. } => "PreRuntime",
            Self::Consensus { .. } => "Consensus",
            Self::Seal { .. } => "Seal",
            Self::RuntimeEnvironmentUpdated => "RuntimeEnvironmentUpdated",
            Self::Other(_) => "Other",
        }
    }

    /// SCALE discriminant of the item in `DigestItem`
    fn index(&self) -> u8 {
        match self {
            Self::Other(_) => 0,
            Self::Consensus { .. } => 4,
            Self::Seal { .. } => 5,
            Self::PreRuntime { .. } => 6,
            Self::RuntimeEnvironmentUpdated => 8,
        }
    }
}

impl From<&DigestItem> for DigestLog {
    fn from(item: &DigestItem) -> Self {
        match item {
            DigestItem::PreRuntime(engine, payload) => Self::PreRuntime {
                engine: *engine,
                payload: payload.clone(),
            },
            DigestItem::Consensus(engine, payload) => Self::Consensus {
                engine: *engine,
                payload: payload.clone(),
            },
            DigestItem::Seal(engine, payload) => Self::Seal {
                engine: *engine,
                payload: payload.clone(),
            },
            DigestItem::RuntimeEnvironmentUpdated => Self::RuntimeEnvironmentUpdated,
            DigestItem::Other(data) => Self::Other(data.clone()),
        }
    }
}

fn hex_with_prefix(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

struct EngineAndPayload<'a>(&'a ConsensusEngineId, &'a [u8]);

impl Serialize for EngineAndPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&hex_with_prefix(self.0))?;
        seq.serialize_element(&hex_with_prefix(self.1))?;
        seq.end()
    }
}

/// Serialized as `{ "type", "index", "value" }`
impl Serialize for DigestLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", self.type_name())?;
        map.serialize_entry("index", &self.index().to_string())?;
        match self {
            Self::PreRuntime { engine, payload }
            | Self::Consensus { engine, payload }
            | Self::Seal { engine, payload } => {
                map.serialize_entry("value", &EngineAndPayload(engine, payload))?
            }
            Self::RuntimeEnvironmentUpdated => map.serialize_entry("value", &Value::Null)?,
            Self::Other(data) => map.serialize_entry("value", &hex_with_prefix(data))?,
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_serialization() {
        assert_eq!(serde_json::to_value(ExtrinsicSuccess::Unknown).unwrap(), Value::Null);
        assert_eq!(serde_json::to_value(ExtrinsicSuccess::Success).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(ExtrinsicSuccess::Failed).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(ExtrinsicSuccess::Unavailable("events unavailable".into()))
                .unwrap(),
            json!("events unavailable")
        );
    }

    #[test]
    fn test_fee_info_serialization() {
        assert_eq!(serde_json::to_value(FeeInfo::Absent).unwrap(), json!({}));
        assert_eq!(
            serde_json::to_value(FeeInfo::Error("nope".into())).unwrap(),
            json!({ "error": "nope" })
        );
        assert_eq!(
            serde_json::to_value(FeeInfo::Computed {
                weight: json!({ "refTime": "100", "proofSize": "0" }),
                class: "Normal".into(),
                partial_fee: 1_234_567_890_123,
            })
            .unwrap(),
            json!({
                "weight": { "refTime": "100", "proofSize": "0" },
                "class": "Normal",
                "partialFee": "1234567890123"
            })
        );
    }

    #[test]
    fn test_digest_log_serialization() {
        let log = DigestLog::from(&DigestItem::PreRuntime(*b"BABE", vec![0xab]));
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!({ "type": "PreRuntime", "index": "6", "value": ["0x42414245", "0xab"] })
        );

        let log = DigestLog::from(&DigestItem::Other(vec![1, 2]));
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!({ "type": "Other", "index": "0", "value": "0x0102" })
        );

        let log = DigestLog::from(&DigestItem::RuntimeEnvironmentUpdated);
        assert_eq!(
            serde_json::to_value(&log).unwrap(),
            json!({ "type": "RuntimeEnvironmentUpdated", "index": "8", "value": null })
        );
    }

    #[test]
    fn test_nested_call_serialization() {
        let call = SanitizedCall {
            method: MethodName::call("Utility", "batch_all"),
            args: CallArgs(vec![(
                "calls".into(),
                SanitizedArg::Sequence(vec![SanitizedArg::Call(Box::new(SanitizedCall {
                    method: MethodName::call("Balances", "transfer_keep_alive"),
                    args: CallArgs(vec![("value".into(), SanitizedArg::Value(json!("10")))]),
                }))]),
            )]),
        };

        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "method": { "pallet": "utility", "method": "batchAll" },
                "args": {
                    "calls": [{
                        "method": { "pallet": "balances", "method": "transferKeepAlive" },
                        "args": { "value": "10" }
                    }]
                }
            })
        );
    }
}
