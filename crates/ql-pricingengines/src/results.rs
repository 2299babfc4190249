//! Output checks shared by the option engines.

use ql_core::{ensure_post, Price, Real, Result};
use ql_instruments::OptionPriceResult;

/// Negative prices no larger than this fraction of `max(S, K)` are rounding
/// noise and reported as zero.
const NEGATIVE_PRICE_TOLERANCE: Real = 1.0e-10;

/// Snap rounding-noise negatives to zero; anything more negative fails.
pub(crate) fn clean_price(price: Price, scale: Real, method: &str) -> Result<Price> {
    ensure_post!(price.is_finite(), "{method} produced a non-finite price: {price}");
    if price >= 0.0 {
        return Ok(price);
    }
    ensure_post!(
        price >= -NEGATIVE_PRICE_TOLERANCE * scale,
        "{method} produced a negative price: {price}"
    );
    Ok(0.0)
}

/// Apply [`clean_price`] and check that every Greek is finite.
pub(crate) fn finish(mut result: OptionPriceResult, scale: Real) -> Result<OptionPriceResult> {
    result.price = clean_price(result.price, scale, &result.method)?;
    result.ensure_valid()?;
    Ok(result)
}
