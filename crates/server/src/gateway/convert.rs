//! SCALE value to API JSON conversion.
//!
//! - integers become decimal strings
//! - named fields become camelCase keys
//! - unit variants become their name, variants with data become `{ "<variant>": data }`
//! - newtype wrappers are unwrapped, `Option` becomes the inner value or `null`
//! - byte sequences and byte arrays become `0x` hex
//! - `AccountId32` becomes SS58 with the chain prefix

use super::shape::{Shape, is_byte_collection, shape_of};
use heck::ToLowerCamelCase;
use scale_type_resolver::TypeResolver;
use scale_value::{Composite, Primitive, Value, ValueDef};
use serde_json::{Map, Value as Json};
use sp_core::crypto::{AccountId32, Ss58Codec};

pub(crate) struct JsonConverter<'a, R> {
    types: &'a R,
    ss58_prefix: u16,
}

impl<'a, R: TypeResolver> JsonConverter<'a, R> {
    pub(crate) fn new(types: &'a R, ss58_prefix: u16) -> Self {
        Self { types, ss58_prefix }
    }

    pub(crate) fn convert(&self, value: &Value<R::TypeId>) -> Json {
        let shape = shape_of(self.types, value.context.clone());

        if shape.is_account_id()
            && let Some(bytes) = bytes_of(value)
            && let Ok(raw) = <[u8; 32]>::try_from(bytes.as_slice())
        {
            return Json::String(
                AccountId32::from(raw).to_ss58check_with_version(self.ss58_prefix.into()),
            );
        }

        match &value.value {
            ValueDef::Composite(composite) => self.composite(composite, Some(&shape)),
            ValueDef::Variant(variant) => {
                if shape.is_option() {
                    return match variant.values.values().next() {
                        Some(inner) if variant.name == "Some" => self.convert(inner),
                        _ => Json::Null,
                    };
                }
                if variant.values.is_empty() {
                    return Json::String(variant.name.clone());
                }
                let mut map = Map::new();
                map.insert(
                    variant.name.to_lower_camel_case(),
                    self.composite(&variant.values, None),
                );
                Json::Object(map)
            }
            ValueDef::Primitive(primitive) => primitive_to_json(primitive),
            ValueDef::BitSequence(bits) => {
                Json::String(bits.iter().map(|b| if b { '1' } else { '0' }).collect())
            }
        }
    }

    fn composite(&self, composite: &Composite<R::TypeId>, shape: Option<&Shape<R::TypeId>>) -> Json {
        match composite {
            Composite::Named(fields) => {
                let map = fields
                    .iter()
                    .map(|(name, v)| (name.to_lower_camel_case(), self.convert(v)))
                    .collect::<Map<_, _>>();
                Json::Object(map)
            }
            Composite::Unnamed(values) => {
                if shape.is_some_and(|s| is_byte_collection(self.types, s))
                    && let Some(bytes) = collect_bytes(values)
                {
                    return Json::String(format!("0x{}", hex::encode(bytes)));
                }

                let is_wrapper = shape.is_none_or(|s| s.is_composite());
                if is_wrapper && values.len() == 1 {
                    return self.convert(&values[0]);
                }

                Json::Array(values.iter().map(|v| self.convert(v)).collect())
            }
        }
    }
}

fn primitive_to_json(primitive: &Primitive) -> Json {
    match primitive {
        Primitive::Bool(b) => Json::Bool(*b),
        Primitive::Char(c) => Json::String(c.to_string()),
        Primitive::String(s) => Json::String(s.clone()),
        Primitive::U128(n) => Json::String(n.to_string()),
        Primitive::I128(n) => Json::String(n.to_string()),
        Primitive::U256(bytes) | Primitive::I256(bytes) => {
            Json::String(format!("0x{}", hex::encode(bytes)))
        }
    }
}

fn collect_bytes<T>(values: &[Value<T>]) -> Option<Vec<u8>> {
    values
        .iter()
        .map(|v| match &v.value {
            ValueDef::Primitive(Primitive::U128(n)) => u8::try_from(*n).ok(),
            _ => None,
        })
        .collect()
}

/// Bytes of a value that is, or wraps, a sequence of `u8`
pub(crate) fn bytes_of<T>(value: &Value<T>) -> Option<Vec<u8>> {
    match &value.value {
        ValueDef::Composite(Composite::Unnamed(values)) => {
            if let [inner] = values.as_slice()
                && matches!(inner.value, ValueDef::Composite(_))
            {
                return bytes_of(inner);
            }
            collect_bytes(values)
        }
        ValueDef::Composite(Composite::Named(fields)) if fields.len() == 1 => bytes_of(&fields[0].1),
        _ => None,
    }
}

/// First unsigned integer found in a value, preferring a `tip` field.
///
/// Signed extensions wrap their payload differently across runtimes: `CheckNonce(Compact<u32>)`,
/// `ChargeTransactionPayment(Compact<u128>)` or `ChargeAssetTxPayment { tip, asset_id }`.
pub(crate) fn first_u128<T>(value: &Value<T>) -> Option<u128> {
    match &value.value {
        ValueDef::Primitive(Primitive::U128(n)) => Some(*n),
        ValueDef::Composite(Composite::Named(fields)) => fields
            .iter()
            .find(|(name, _)| name == "tip")
            .or_else(|| fields.first())
            .and_then(|(_, v)| first_u128(v)),
        ValueDef::Composite(Composite::Unnamed(values)) => values.first().and_then(first_u128),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scale_info::{MetaType, PortableRegistry, Registry, TypeInfo};

    fn registry_for<T: TypeInfo + 'static>() -> (PortableRegistry, u32) {
        let mut registry = Registry::new();
        let id = registry.register_type(&MetaType::new::<T>()).id;
        (registry.into(), id)
    }

    fn decode<T: TypeInfo + parity_scale_codec::Encode + 'static>(value: T) -> Json {
        let (types, id) = registry_for::<T>();
        let bytes = value.encode();
        let decoded = scale_value::scale::decode_as_type(&mut &bytes[..], id, &types).unwrap();
        JsonConverter::new(&types, 42).convert(&decoded)
    }

    #[derive(TypeInfo, parity_scale_codec::Encode)]
    struct DispatchInfo {
        weight: Weight,
        class: DispatchClass,
        pays_fee: Pays,
    }

    #[derive(TypeInfo, parity_scale_codec::Encode)]
    struct Weight {
        ref_time: u64,
        proof_size: u64,
    }

    #[derive(TypeInfo, parity_scale_codec::Encode)]
    #[allow(dead_code)]
    enum DispatchClass {
        Normal,
        Operational,
    }

    #[derive(TypeInfo, parity_scale_codec::Encode)]
    #[allow(dead_code)]
    enum Pays {
        Yes,
        No,
    }

    #[test]
    fn test_named_fields_become_camel_case() {
        let json = decode(DispatchInfo {
            weight: Weight {
                ref_time: 161_493_000,
                proof_size: 3593,
            },
            class: DispatchClass::Normal,
            pays_fee: Pays::Yes,
        });

        assert_eq!(
            json,
            serde_json::json!({
                "weight": { "refTime": "161493000", "proofSize": "3593" },
                "class": "Normal",
                "paysFee": "Yes"
            })
        );
    }

    #[test]
    fn test_bytes_become_hex() {
        assert_eq!(decode(vec![0xde_u8, 0xad]), Json::String("0xdead".into()));
        assert_eq!(decode([1u8, 2, 3, 4]), Json::String("0x01020304".into()));
    }

    #[test]
    fn test_option_unwraps() {
        assert_eq!(decode(Some(5u32)), Json::String("5".into()));
        assert_eq!(decode(None::<u32>), Json::Null);
    }

    #[test]
    fn test_sequence_of_numbers_stays_array() {
        assert_eq!(decode(vec![7u32]), serde_json::json!(["7"]));
    }

    #[test]
    fn test_account_id_becomes_ss58() {
        let account = AccountId32::from([1u8; 32]);
        let expected = account.to_ss58check_with_version(42u16.into());
        assert_eq!(decode(account), Json::String(expected));
    }

    #[test]
    fn test_first_u128_prefers_tip() {
        #[derive(TypeInfo, parity_scale_codec::Encode)]
        struct ChargeAssetTxPayment {
            #[codec(compact)]
            tip: u128,
            asset_id: Option<u32>,
        }

        let (types, id) = registry_for::<ChargeAssetTxPayment>();
        let bytes = parity_scale_codec::Encode::encode(&ChargeAssetTxPayment {
            tip: 99,
            asset_id: None,
        });
        let value = scale_value::scale::decode_as_type(&mut &bytes[..], id, &types).unwrap();
        assert_eq!(first_u128(&value), Some(99));
    }

    #[test]
    fn test_historic_types_convert_like_portable_ones() {
        use parity_scale_codec::{Compact, Encode};
        use scale_info_legacy::LookupName;

        let historic = frame_decode::legacy_types::polkadot::relay_chain();
        let types = historic.for_spec_version(30);
        let account = AccountId32::from([1u8; 32]);

        let mut bytes = 161_493_000u64.encode();
        bytes.extend([0u8, 0u8]);
        let id = LookupName::parse("DispatchInfo").unwrap();
        let value = scale_value::scale::decode_as_type(&mut &bytes[..], id, &types).unwrap();
        assert_eq!(
            JsonConverter::new(&types, 0).convert(&value),
            serde_json::json!({ "weight": "161493000", "class": "Normal", "paysFee": "Yes" })
        );

        let bytes = (account.clone(), Compact(5u128)).encode();
        let id = LookupName::parse("(AccountId, Compact<Balance>)").unwrap();
        let value = scale_value::scale::decode_as_type(&mut &bytes[..], id, &types).unwrap();
        assert_eq!(
            JsonConverter::new(&types, 0).convert(&value),
            serde_json::json!([account.to_ss58check_with_version(0u16.into()), "5"])
        );
    }
}
