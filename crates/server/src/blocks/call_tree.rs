//! Sanitization of decoded calls into a labeled argument tree.
//!
//! Nested calls (`utility.batch`, `sudo.sudo`, `council.propose`) become nested
//! [`SanitizedCall`] nodes. Calls carried as encoded bytes (`OpaqueCall`, the multisig inner
//! call) are decoded with the block's own registry; if that fails the bytes are kept as hex.

use super::types::{CallArgs, MethodName, SanitizedArg, SanitizedCall};
use crate::gateway::{CallArg, RawCall, TypeRegistry};
use heck::ToLowerCamelCase;
use serde_json::Value;

pub fn parse<R: TypeRegistry + ?Sized>(call: &RawCall, registry: &R) -> SanitizedCall {
    let args = call
        .args
        .iter()
        .map(|(name, arg)| (name.to_lower_camel_case(), parse_arg(arg, registry)))
        .collect();

    SanitizedCall {
        method: MethodName::call(&call.pallet, &call.method),
        args: CallArgs(args),
    }
}

fn parse_arg<R: TypeRegistry + ?Sized>(arg: &CallArg, registry: &R) -> SanitizedArg {
    match arg {
        CallArg::Value(value) => SanitizedArg::Value(value.clone()),
        CallArg::Call(call) => SanitizedArg::Call(Box::new(parse(call, registry))),
        CallArg::Sequence(items) => {
            SanitizedArg::Sequence(items.iter().map(|item| parse_arg(item, registry)).collect())
        }
        CallArg::Opaque(bytes) => match registry.decode_call(bytes) {
            Ok(call) => SanitizedArg::Call(Box::new(parse(&call, registry))),
            Err(e) => {
                tracing::debug!("Keeping opaque call as bytes: {}", e);
                SanitizedArg::Value(Value::String(format!("0x{}", hex::encode(bytes))))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{DecodedExtrinsic, GatewayError};
    use serde_json::json;

    /// Decodes `[0xaa]` as `balances.transfer`, fails for anything else
    struct OneCallRegistry;

    impl TypeRegistry for OneCallRegistry {
        fn decode_extrinsic(&self, _bytes: &[u8]) -> Result<DecodedExtrinsic, GatewayError> {
            Err(GatewayError::Shape("unused".into()))
        }

        fn decode_call(&self, bytes: &[u8]) -> Result<RawCall, GatewayError> {
            match bytes {
                [0xaa] => Ok(transfer("5")),
                _ => Err(GatewayError::Decode {
                    what: "call",
                    reason: "unknown pallet index".into(),
                }),
            }
        }

        fn call_docs(&self, _pallet: &str, _method: &str) -> Option<String> {
            None
        }

        fn event_docs(&self, _pallet: &str, _method: &str) -> Option<String> {
            None
        }
    }

    fn transfer(value: &str) -> RawCall {
        RawCall {
            pallet: "Balances".into(),
            method: "transfer_keep_alive".into(),
            args: vec![
                ("dest".into(), CallArg::Value(json!({ "id": "5Grw" }))),
                ("value".into(), CallArg::Value(json!(value))),
            ],
        }
    }

    #[test]
    fn test_flat_call() {
        let parsed = parse(&transfer("10"), &OneCallRegistry);
        assert_eq!(parsed.method, MethodName::call("Balances", "transfer_keep_alive"));
        assert_eq!(parsed.method.method, "transferKeepAlive");
        assert_eq!(parsed.args.get("value"), Some(&SanitizedArg::Value(json!("10"))));
    }

    #[test]
    fn test_three_level_tree() {
        // council.propose(multisig.as_multi(balances.transfer))
        let multisig = RawCall {
            pallet: "Multisig".into(),
            method: "as_multi".into(),
            args: vec![
                ("threshold".into(), CallArg::Value(json!("2"))),
                ("call".into(), CallArg::Opaque(vec![0xaa])),
            ],
        };
        let council = RawCall {
            pallet: "Council".into(),
            method: "propose".into(),
            args: vec![
                ("threshold".into(), CallArg::Value(json!("3"))),
                ("proposal".into(), CallArg::Call(Box::new(multisig))),
                ("length_bound".into(), CallArg::Value(json!("42"))),
            ],
        };

        let parsed = parse(&council, &OneCallRegistry);
        assert!(parsed.args.get("lengthBound").is_some());

        let Some(SanitizedArg::Call(proposal)) = parsed.args.get("proposal") else {
            panic!("proposal should be a nested call");
        };
        assert_eq!(proposal.method.method, "asMulti");

        let Some(SanitizedArg::Call(inner)) = proposal.args.get("call") else {
            panic!("opaque call should be decoded");
        };
        assert_eq!(inner.method.pallet, "balances");
        assert_eq!(inner.args.get("value"), Some(&SanitizedArg::Value(json!("5"))));
    }

    #[test]
    fn test_opaque_fallback_keeps_hex() {
        let call = RawCall {
            pallet: "Multisig".into(),
            method: "as_multi".into(),
            args: vec![("call".into(), CallArg::Opaque(vec![0xde, 0xad]))],
        };

        let parsed = parse(&call, &OneCallRegistry);
        assert_eq!(parsed.args.get("call"), Some(&SanitizedArg::Value(json!("0xdead"))));
    }

    #[test]
    fn test_sequence_mixes_calls_and_values() {
        let call = RawCall {
            pallet: "Utility".into(),
            method: "batch".into(),
            args: vec![(
                "calls".into(),
                CallArg::Sequence(vec![
                    CallArg::Call(Box::new(transfer("1"))),
                    CallArg::Value(json!("untouched")),
                ]),
            )],
        };

        let parsed = parse(&call, &OneCallRegistry);
        let Some(SanitizedArg::Sequence(items)) = parsed.args.get("calls") else {
            panic!("calls should be a sequence");
        };
        assert!(matches!(&items[0], SanitizedArg::Call(c) if c.method.method == "transferKeepAlive"));
        assert_eq!(items[1], SanitizedArg::Value(json!("untouched")));
    }
}
