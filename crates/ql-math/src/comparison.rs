//! Guarded division.

use ql_core::Real;

/// Divide `numerator` by `denominator`, returning `None` instead of an
/// infinite or NaN quotient.
///
/// A denominator that is zero, subnormal, or non-finite yields `None`, as does
/// a quotient that overflows.
#[inline]
pub fn safe_div(numerator: Real, denominator: Real) -> Option<Real> {
    if !denominator.is_normal() || !numerator.is_finite() {
        return None;
    }
    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}
