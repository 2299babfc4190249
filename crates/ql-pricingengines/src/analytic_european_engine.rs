//! Analytic European option engine (Black-Scholes-Merton).
//!
//! Prices European vanilla options on an underlying paying a continuous
//! dividend yield with the closed-form Black-Scholes-Merton formula.
//! Computes the price and first/second-order Greeks.

use crate::results;
use ql_core::{ensure, Real, Result};
use ql_instruments::{ExerciseType, OptionContract, OptionPriceResult, OptionType, PricingEngine};
use ql_math::distributions::{normal_cdf, normal_pdf};
use tracing::debug;

/// Method tag of analytic results.
pub const METHOD: &str = "Black-Scholes";

/// Analytic pricing engine for European vanilla options.
///
/// Implements the Black-Scholes-Merton closed-form solution:
///
/// $$C = S e^{-qT} N(d_1) - K e^{-rT} N(d_2)$$
/// $$P = K e^{-rT} N(-d_2) - S e^{-qT} N(-d_1)$$
///
/// where $d_{1,2} = \frac{\ln(S/K) + (r - q \pm \sigma^2/2)T}{\sigma\sqrt{T}}$
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEuropeanEngine;

impl AnalyticEuropeanEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }
}

/// Compute Black-Scholes price and Greeks for a European option.
///
/// Returns `(price, delta, gamma, vega, theta, rho)`. Inputs are not
/// checked; `σ`, `T`, `S` and `K` must be positive.
pub fn black_scholes_merton(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    risk_free_rate: Real,
    dividend_yield: Real,
    volatility: Real,
    time_to_expiry: Real,
) -> (Real, Real, Real, Real, Real, Real) {
    let phi = option_type.sign();
    let t = time_to_expiry;
    let r = risk_free_rate;
    let q = dividend_yield;
    let sigma = volatility;
    let sqrt_t = t.sqrt();
    let std_dev = sigma * sqrt_t;
    let df_r = (-r * t).exp();
    let df_q = (-q * t).exp();

    let d1 = ((spot / strike).ln() + (r - q + 0.5 * sigma * sigma) * t) / std_dev;
    let d2 = d1 - std_dev;

    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    // Price
    let price = phi * (spot * df_q * nd1 - strike * df_r * nd2);
    // Delta
    let delta = phi * df_q * nd1;
    // Gamma
    let gamma = df_q * npd1 / (spot * std_dev);
    // Vega (per 1.0 absolute vol, not per 1%)
    let vega = spot * df_q * npd1 * sqrt_t;
    // Theta (per year)
    let theta = {
        let term1 = -(spot * df_q * npd1 * sigma) / (2.0 * sqrt_t);
        let term2 = -phi * r * strike * df_r * nd2;
        let term3 = phi * q * spot * df_q * nd1;
        term1 + term2 + term3
    };
    // Rho (per 1.0 rate shift)
    let rho = phi * strike * t * df_r * nd2;

    (price, delta, gamma, vega, theta, rho)
}

impl PricingEngine<OptionContract> for AnalyticEuropeanEngine {
    type Output = OptionPriceResult;

    fn calculate(&self, contract: &OptionContract) -> Result<OptionPriceResult> {
        contract.validate()?;
        ensure!(
            contract.exercise == ExerciseType::European,
            "the analytic engine prices European exercise only, got {}",
            contract.exercise
        );
        debug!(
            option_type = %contract.option_type,
            spot = contract.spot,
            strike = contract.strike,
            rate = contract.rate,
            dividend_yield = contract.dividend_yield,
            volatility = contract.volatility,
            maturity = contract.maturity,
            "pricing European option"
        );

        let (price, delta, gamma, vega, theta, rho) = black_scholes_merton(
            contract.option_type,
            contract.spot,
            contract.strike,
            contract.rate,
            contract.dividend_yield,
            contract.volatility,
            contract.maturity,
        );

        results::finish(
            OptionPriceResult {
                price,
                delta,
                gamma,
                vega,
                theta,
                rho,
                method: METHOD.to_string(),
            },
            contract.price_scale(),
        )
    }
}
