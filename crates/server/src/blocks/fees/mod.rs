//! Reconstruction of the partial fee paid by an extrinsic.
//!
//! The formula parameters are read once per block by [`build_context`], resolving the runtime
//! that was in force when the block was authored. [`compute_fee`] is then pure arithmetic.

mod calc;
mod context;

pub use calc::{compute_fee, weight_to_fee};
pub use context::{Coefficient, FeeContext, LengthFee, Multiplier, build_context, parse_weight};

use crate::gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeeError {
    #[error("Fee calculation not supported for {spec_name}#{spec_version}")]
    Unsupported { spec_name: String, spec_version: u32 },

    #[error("Failed to fetch fee parameters: {0}")]
    Upstream(#[from] GatewayError),

    #[error("Malformed {what}: {value}")]
    Malformed { what: &'static str, value: String },

    #[error("Dispatch weight not reported for extrinsic")]
    MissingWeight,
}
