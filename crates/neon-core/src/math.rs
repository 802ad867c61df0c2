// SPDX-License-Identifier: AGPL-3.0-only
//! Integer fixed-point helpers. No floating point anywhere in the ledger.

/// Basis-point denominator (1 bps = 0.01%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Percent denominator.
pub const PERCENT_DENOMINATOR: u128 = 100;

/// `floor(amount * numerator / denominator)` without an intermediate overflow.
///
/// Splits `amount = q * denominator + r`, so the result is
/// `q * numerator + floor(r * numerator / denominator)`, which is exact.
/// Returns `None` on a zero denominator or when the result itself overflows.
pub fn mul_div_floor(amount: u128, numerator: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = amount / denominator;
    let r = amount % denominator;
    let whole = q.checked_mul(numerator)?;
    let part = r.checked_mul(numerator)? / denominator;
    whole.checked_add(part)
}

/// `floor(amount * rate / 10_000)`
pub fn apply_bps(amount: u128, rate_bps: u16) -> Option<u128> {
    mul_div_floor(amount, u128::from(rate_bps), BPS_DENOMINATOR)
}

/// `floor(amount * pct / 100)`
pub fn apply_percent(amount: u128, pct: u16) -> Option<u128> {
    mul_div_floor(amount, u128::from(pct), PERCENT_DENOMINATOR)
}
