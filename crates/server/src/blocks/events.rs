//! Attribution of a block's events to its extrinsics.

use super::builder::{DispatchInfo, ExtrinsicBuilder};
use super::error::AssembleError;
use super::types::{Event, EventBucket, ExtrinsicSuccess, MethodName};
use crate::gateway::{GatewayError, Phase, RawEvent};
use crate::types::BlockHash;
use serde_json::Value;

/// Events emitted before and after the extrinsics of a block
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    pub on_initialize: EventBucket,
    pub on_finalize: EventBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failed,
}

fn outcome_of(event: &RawEvent) -> Option<Outcome> {
    if event.pallet != "System" {
        return None;
    }
    match event.method.as_str() {
        "ExtrinsicSuccess" => Some(Outcome::Success),
        "ExtrinsicFailed" => Some(Outcome::Failed),
        _ => None,
    }
}

/// Attach events to the extrinsic they were emitted by and record each extrinsic's outcome.
///
/// When the events could not be fetched, every extrinsic's success becomes
/// [`ExtrinsicSuccess::Unavailable`] and both lifecycle buckets stay empty.
pub(crate) fn attribute(
    events: Result<Vec<RawEvent>, GatewayError>,
    extrinsics: &mut [ExtrinsicBuilder],
    hash: BlockHash,
) -> Result<Lifecycle, AssembleError> {
    let events = match events {
        Ok(events) => events,
        Err(e) => {
            let reason = format!("Unable to fetch events: {e}");
            tracing::warn!("Block {}: {}", hash, reason);
            for extrinsic in extrinsics.iter_mut() {
                extrinsic.success = ExtrinsicSuccess::Unavailable(reason.clone());
            }
            return Ok(Lifecycle::default());
        }
    };

    let mut lifecycle = Lifecycle::default();
    let count = extrinsics.len();

    for raw in events {
        let outcome = outcome_of(&raw);
        let event = Event {
            method: MethodName::event(&raw.pallet, &raw.method),
            pallet_name: raw.pallet,
            phase: raw.phase,
            docs: None,
            data: raw.data,
        };

        match event.phase {
            Phase::ApplyExtrinsic(index) => {
                let extrinsic = extrinsics.get_mut(index as usize).ok_or_else(|| {
                    AssembleError::UpstreamInconsistency {
                        hash,
                        reason: format!(
                            "event {}.{} refers to extrinsic {} but the block has {}",
                            event.method.pallet, event.method.method, index, count
                        ),
                    }
                })?;

                if let Some(outcome) = outcome {
                    record_outcome(extrinsic, outcome, &event.data, index, hash);
                }
                extrinsic.events.push(event);
            }
            Phase::Finalization => lifecycle.on_finalize.events.push(event),
            Phase::Initialization => lifecycle.on_initialize.events.push(event),
        }
    }

    Ok(lifecycle)
}

fn record_outcome(
    extrinsic: &mut ExtrinsicBuilder,
    outcome: Outcome,
    data: &[Value],
    index: u32,
    hash: BlockHash,
) {
    if extrinsic.success.is_settled() {
        tracing::debug!(
            "Block {}: ignoring second outcome event for extrinsic {}",
            hash,
            index
        );
        return;
    }

    extrinsic.success = match outcome {
        Outcome::Success => ExtrinsicSuccess::Success,
        Outcome::Failed => ExtrinsicSuccess::Failed,
    };

    let Some(dispatch_info) = data.iter().find(|v| v.get("paysFee").is_some()) else {
        return;
    };

    if extrinsic.is_signed()
        && let Some(pays_fee) = dispatch_info.get("paysFee").and_then(pays_fee_from_value)
    {
        extrinsic.pays_fee = Some(pays_fee);
    }

    extrinsic.dispatch = Some(DispatchInfo {
        weight: dispatch_info.get("weight").cloned(),
        class: dispatch_info.get("class").and_then(class_from_value),
    });
}

/// `paysFee` is a boolean, `"Yes"`/`"No"`, or `{ "name": "Yes" }` depending on the runtime
fn pays_fee_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => yes_no(s),
        Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()).and_then(yes_no),
        _ => {
            tracing::debug!("Unexpected paysFee value: {:?}", value);
            None
        }
    }
}

fn yes_no(s: &str) -> Option<bool> {
    match s {
        "Yes" => Some(true),
        "No" => Some(false),
        _ => {
            tracing::debug!("Unknown paysFee value: {}", s);
            None
        }
    }
}

fn class_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()).map(String::from),
        _ => None,
    }
}
