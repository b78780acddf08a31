// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use super::context::{Coefficient, FeeContext, LengthFee, Multiplier};
use sp_runtime::FixedPointNumber;

/// Evaluate a weight-to-fee polynomial at `weight`.
///
/// Positive and negative terms are summed separately, a negative total saturates to zero.
pub fn weight_to_fee(coefficients: &[Coefficient], weight: u64) -> u128 {
    let (positive, negative) = coefficients.iter().fold((0u128, 0u128), |(pos, neg), c| {
        let w = (weight as u128).saturating_pow(c.degree.into());
        let term = c
            .coeff_integer
            .saturating_mul(w)
            .saturating_add(c.coeff_frac * w);
        if c.negative {
            (pos, neg.saturating_add(term))
        } else {
            (pos.saturating_add(term), neg)
        }
    });
    positive.saturating_sub(negative)
}

/// Partial fee of an extrinsic of `len` encoded bytes with dispatch `weight`.
pub fn compute_fee(ctx: &FeeContext, len: usize, weight: u64) -> u128 {
    let base_fee = weight_to_fee(&ctx.coefficients, ctx.base_extrinsic_weight);
    let len_fee = match &ctx.length_fee {
        LengthFee::PerByte(per_byte) => per_byte.saturating_mul(len as u128),
        LengthFee::Polynomial(coefficients) => {
            weight_to_fee(coefficients, u64::try_from(len).unwrap_or(u64::MAX))
        }
    };
    let weight_fee = weight_to_fee(&ctx.coefficients, weight);

    match ctx.multiplier {
        Multiplier::FixedU128(m) => base_fee
            .saturating_add(len_fee)
            .saturating_add(m.saturating_mul_int(weight_fee)),
        // Legacy runtimes adjusted the length fee too
        Multiplier::Fixed128(m) => {
            base_fee.saturating_add(m.saturating_mul_acc_int(len_fee.saturating_add(weight_fee)))
        }
        Multiplier::Fixed64(m) => {
            base_fee.saturating_add(m.saturating_mul_acc_int(len_fee.saturating_add(weight_fee)))
        }
    }
}
