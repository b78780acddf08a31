use super::FeeError;
use crate::gateway::{ChainApi, ConstantLookup, Header};
use config::{ChainFeeConfigs, MultiplierFormat};
use serde_json::Value;
use sp_runtime::{FixedI64, FixedI128, FixedU128, Perbill};

/// One term of a weight-to-fee polynomial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coefficient {
    pub coeff_integer: u128,
    pub coeff_frac: Perbill,
    pub negative: bool,
    pub degree: u8,
}

/// Fee multiplier in the encoding used by the runtime that stored it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplier {
    FixedU128(FixedU128),
    Fixed128(FixedI128),
    Fixed64(FixedI64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthFee {
    PerByte(u128),
    /// `TransactionPayment.LengthToFee`, for runtimes without a flat byte fee
    Polynomial(Vec<Coefficient>),
}

/// Everything the fee formula needs for the extrinsics of one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeContext {
    pub spec_name: String,
    pub spec_version: u32,
    pub coefficients: Vec<Coefficient>,
    pub base_extrinsic_weight: u64,
    pub multiplier: Multiplier,
    pub length_fee: LengthFee,
}

/// Where a runtime keeps its base extrinsic weight, most legacy first
struct ConstantLocation {
    pallet: &'static str,
    name: &'static str,
    path: &'static [&'static str],
}

const BASE_WEIGHT_LOCATIONS: &[ConstantLocation] = &[
    ConstantLocation {
        pallet: "System",
        name: "ExtrinsicBaseWeight",
        path: &[],
    },
    ConstantLocation {
        pallet: "System",
        name: "BlockWeights",
        path: &["perClass", "normal", "baseExtrinsic"],
    },
];

/// Resolve the fee parameters for the extrinsics of the block with `header`.
///
/// The runtime version is read at the grandparent: the block that enacts a runtime upgrade
/// still reports the new version at its parent although it executed under the old one.
pub async fn build_context<A: ChainApi>(
    api: &A,
    header: &Header,
    fee_tables: &ChainFeeConfigs,
) -> Result<FeeContext, FeeError> {
    let version_hash = if header.number > 1 {
        api.header(header.parent_hash).await?.parent_hash
    } else {
        header.parent_hash
    };

    let (version, multiplier, constants, live_version) = tokio::join!(
        api.runtime_version_at(version_hash),
        api.storage_at("TransactionPayment", "NextFeeMultiplier", header.parent_hash),
        api.live_constants(),
        api.live_runtime_version(),
    );
    let version = version?;
    let multiplier = multiplier?;
    let constants = constants?;
    let live_version = live_version?;

    let unsupported = || FeeError::Unsupported {
        spec_name: version.spec_name.clone(),
        spec_version: version.spec_version,
    };

    let Some(multiplier) = multiplier else {
        return Err(unsupported());
    };
    let format = fee_tables.multiplier_format(&version.spec_name, version.spec_version);
    let multiplier = parse_multiplier(&multiplier, format)?;

    let coefficients = constants
        .constant("TransactionPayment", "WeightToFee")
        .map(|value| parse_coefficients(&value))
        .transpose()?
        .ok_or_else(unsupported)?;

    // Historical metadata is only fetched when the block ran under another runtime
    let base_weight = if live_version == version {
        base_extrinsic_weight(&*constants)?
    } else {
        tracing::debug!(
            "Reading base extrinsic weight from historical metadata of {}#{}",
            version.spec_name,
            version.spec_version
        );
        let bytes = api.raw_metadata_at(version_hash).await?;
        let historical = api.decode_metadata(&bytes, &version)?;
        base_extrinsic_weight(&historical)?
    };
    let base_extrinsic_weight = base_weight.ok_or_else(unsupported)?;

    let length_fee = match fee_tables.per_byte_fee_override(&version.spec_name, header.number) {
        Some(per_byte) => LengthFee::PerByte(per_byte),
        None => length_fee(&*constants)?.ok_or_else(unsupported)?,
    };

    Ok(FeeContext {
        spec_name: version.spec_name.clone(),
        spec_version: version.spec_version,
        coefficients,
        base_extrinsic_weight,
        multiplier,
        length_fee,
    })
}

fn base_extrinsic_weight<C: ConstantLookup + ?Sized>(
    constants: &C,
) -> Result<Option<u64>, FeeError> {
    for location in BASE_WEIGHT_LOCATIONS {
        let Some(constant) = constants.constant(location.pallet, location.name) else {
            continue;
        };
        let value = location
            .path
            .iter()
            .try_fold(&constant, |value, key| value.get(key));
        if let Some(value) = value {
            return parse_weight(value)
                .map(Some)
                .ok_or_else(|| malformed("base extrinsic weight", value));
        }
    }
    Ok(None)
}

fn length_fee<C: ConstantLookup + ?Sized>(constants: &C) -> Result<Option<LengthFee>, FeeError> {
    if let Some(value) = constants.constant("TransactionPayment", "TransactionByteFee") {
        let per_byte = parse_u128(&value).ok_or_else(|| malformed("byte fee", &value))?;
        return Ok(Some(LengthFee::PerByte(per_byte)));
    }
    constants
        .constant("TransactionPayment", "LengthToFee")
        .map(|value| parse_coefficients(&value).map(LengthFee::Polynomial))
        .transpose()
}

/// Reference time of a weight, either a bare number or `{ refTime, proofSize }`
pub fn parse_weight(value: &Value) -> Option<u64> {
    match value {
        Value::Object(obj) => obj.get("refTime").and_then(parse_u128),
        other => parse_u128(other),
    }
    .and_then(|w| u64::try_from(w).ok())
}

fn parse_coefficients(value: &Value) -> Result<Vec<Coefficient>, FeeError> {
    let terms = value
        .as_array()
        .ok_or_else(|| malformed("weight-to-fee coefficients", value))?;
    terms
        .iter()
        .map(|term| {
            let coeff_integer = term.get("coeffInteger").and_then(parse_u128);
            let coeff_frac = term
                .get("coeffFrac")
                .and_then(parse_u128)
                .and_then(|parts| u32::try_from(parts).ok());
            let negative = term.get("negative").and_then(Value::as_bool);
            let degree = term
                .get("degree")
                .and_then(parse_u128)
                .and_then(|d| u8::try_from(d).ok());

            match (coeff_integer, coeff_frac, negative, degree) {
                (Some(coeff_integer), Some(frac), Some(negative), Some(degree)) => {
                    Ok(Coefficient {
                        coeff_integer,
                        coeff_frac: Perbill::from_parts(frac),
                        negative,
                        degree,
                    })
                }
                _ => Err(malformed("weight-to-fee coefficient", term)),
            }
        })
        .collect()
}

fn parse_multiplier(value: &Value, format: MultiplierFormat) -> Result<Multiplier, FeeError> {
    let invalid = || malformed("fee multiplier", value);
    let multiplier = match format {
        MultiplierFormat::FixedU128 => {
            Multiplier::FixedU128(FixedU128::from_inner(parse_u128(value).ok_or_else(invalid)?))
        }
        MultiplierFormat::Fixed128 => {
            Multiplier::Fixed128(FixedI128::from_inner(parse_i128(value).ok_or_else(invalid)?))
        }
        MultiplierFormat::Fixed64 => {
            let inner = parse_i128(value)
                .and_then(|n| i64::try_from(n).ok())
                .ok_or_else(invalid)?;
            Multiplier::Fixed64(FixedI64::from_inner(inner))
        }
    };
    Ok(multiplier)
}

fn parse_u128(value: &Value) -> Option<u128> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}

fn parse_i128(value: &Value) -> Option<i128> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().map(i128::from),
        _ => None,
    }
}

fn malformed(what: &'static str, value: &Value) -> FeeError {
    FeeError::Malformed {
        what,
        value: value.to_string(),
    }
}
