//! Fixed-point math utilities for deterministic decisions.
//!
//! Ownership ratios are compared with fixed-point arithmetic so that the
//! same snapshot always produces the same plan, independent of platform
//! floating-point behavior.

use fixed::types::I32F32;

/// Fixed-point number type for all ratio math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Ratio `numerator / denominator` in fixed-point.
///
/// A zero denominator yields zero rather than dividing.
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> Fixed {
    if denominator == 0 {
        return Fixed::ZERO;
    }
    Fixed::from_num(numerator) / Fixed::from_num(denominator)
}

/// Integer share `amount * weight / total`, rounded down.
///
/// Used when splitting a troop pool proportionally to difficulty.
#[must_use]
pub fn proportional_share(amount: i64, weight: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (amount * weight).div_euclid(total)
}
