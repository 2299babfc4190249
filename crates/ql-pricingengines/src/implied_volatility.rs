//! Black-Scholes implied volatility.
//!
//! The European price is strictly increasing in `σ` (vega > 0), so a price
//! strictly inside the no-arbitrage bounds has exactly one implied
//! volatility. The solver runs Newton-Raphson with the analytic vega from a
//! closed-form initial guess and falls back to bisection over the volatility
//! bracket.

use crate::analytic_european_engine::black_scholes_merton;
use ql_core::{ensure, ensure_post, Price, Rate, Real, Result, Time, Volatility};
use ql_instruments::OptionType;
use ql_math::{newton_bisection, safe_div, SolverConfig};
use std::f64::consts::PI;
use tracing::debug;

/// Default volatility bracket `[1e-6, 5.0]`.
pub const DEFAULT_VOLATILITY_BRACKET: (Volatility, Volatility) = (1.0e-6, 5.0);

/// Below this Manaster-Koehler guess the option is treated as at-the-money
/// forward and the Brenner-Subrahmanyam guess is used instead.
const MIN_MONEYNESS_GUESS: Volatility = 1.0e-3;

/// Newton steps taken on `σ` after the price-residual search has converged.
const MAX_REFINEMENT_STEPS: u32 = 10;

/// No-arbitrage bounds `(lower, upper)` of a European option price.
///
/// * call: `max(S·e^(−qT) − K·e^(−rT), 0) ≤ C ≤ S·e^(−qT)`
/// * put: `max(K·e^(−rT) − S·e^(−qT), 0) ≤ P ≤ K·e^(−rT)`
pub fn option_price_bounds(
    option_type: OptionType,
    spot: Price,
    strike: Price,
    rate: Rate,
    dividend_yield: Rate,
    maturity: Time,
) -> Result<(Price, Price)> {
    validate_market(spot, strike, rate, dividend_yield, maturity)?;
    let discounted_spot = spot * (-dividend_yield * maturity).exp();
    let discounted_strike = strike * (-rate * maturity).exp();
    let bounds = match option_type {
        OptionType::Call => ((discounted_spot - discounted_strike).max(0.0), discounted_spot),
        OptionType::Put => ((discounted_strike - discounted_spot).max(0.0), discounted_strike),
    };
    Ok(bounds)
}

fn validate_market(
    spot: Price,
    strike: Price,
    rate: Rate,
    dividend_yield: Rate,
    maturity: Time,
) -> Result<()> {
    ensure!(spot.is_finite() && spot > 0.0, "underlying price must be positive, got {spot}");
    ensure!(strike.is_finite() && strike > 0.0, "strike must be positive, got {strike}");
    ensure!(
        maturity.is_finite() && maturity > 0.0,
        "time to maturity must be positive, got {maturity}"
    );
    ensure!(
        rate.is_finite() && dividend_yield.is_finite(),
        "rates must be finite, got r = {rate}, q = {dividend_yield}"
    );
    Ok(())
}

/// Inverts the Black-Scholes price with respect to volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolatilitySolver {
    config: SolverConfig,
}

impl Default for ImpliedVolatilitySolver {
    fn default() -> Self {
        let (lower, upper) = DEFAULT_VOLATILITY_BRACKET;
        Self {
            config: SolverConfig::new(lower, upper),
        }
    }
}

impl ImpliedVolatilitySolver {
    /// Solver with custom tolerances and bracket. The bracket must be
    /// strictly positive.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        ensure!(
            config.lower > 0.0,
            "volatility bracket must be positive, got [{}, {}]",
            config.lower,
            config.upper
        );
        Ok(Self { config })
    }

    /// The root-finder configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The volatility at which the Black-Scholes price equals `target_price`.
    ///
    /// Prices on or outside the no-arbitrage bounds are `InvalidInput`; no
    /// root inside the bracket, or a non-converged search, is
    /// `CalculationFailed`.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &self,
        option_type: OptionType,
        target_price: Price,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        maturity: Time,
    ) -> Result<Volatility> {
        ensure!(
            target_price.is_finite(),
            "option price must be finite, got {target_price}"
        );
        let (lower, upper) =
            option_price_bounds(option_type, spot, strike, rate, dividend_yield, maturity)?;
        ensure!(
            target_price > lower && target_price < upper,
            "option price {target_price} is outside the no-arbitrage bounds ({lower}, {upper})"
        );

        let guess = self.initial_guess(target_price, spot, strike, rate, dividend_yield, maturity);
        debug!(
            option_type = %option_type,
            target_price,
            spot,
            strike,
            rate,
            dividend_yield,
            maturity,
            guess,
            "solving implied volatility"
        );

        let objective = |sigma: Volatility| {
            let (price, _, _, vega, _, _) = black_scholes_merton(
                option_type,
                spot,
                strike,
                rate,
                dividend_yield,
                sigma,
                maturity,
            );
            (price - target_price, vega)
        };
        let result = newton_bisection(&objective, guess, &self.config)?;
        debug!(
            root = result.root,
            iterations = result.iterations,
            used_bisection = result.used_bisection,
            "implied volatility search finished"
        );
        let sigma = self.refine(&objective, result.root_or_fail("implied volatility")?);
        ensure_post!(
            sigma.is_finite() && sigma > 0.0,
            "implied volatility is not a positive finite number: {sigma}"
        );
        Ok(sigma)
    }

    /// Newton steps on `σ` until the step itself is below `root_accuracy`.
    ///
    /// A price residual under `accuracy` still leaves `σ` off by
    /// `accuracy / vega`, which is large where vega is small (deep out of the
    /// money, low volatility).
    fn refine<F>(&self, objective: F, mut sigma: Volatility) -> Volatility
    where
        F: Fn(Volatility) -> (Real, Real),
    {
        for _ in 0..MAX_REFINEMENT_STEPS {
            let (error, vega) = objective(sigma);
            let Some(step) = safe_div(error, vega) else {
                break;
            };
            let next = sigma - step;
            if !(next > self.config.lower && next < self.config.upper) {
                break;
            }
            sigma = next;
            if step.abs() <= self.config.root_accuracy {
                break;
            }
        }
        sigma
    }

    /// Manaster-Koehler `√(2|ln(F/K)|/T)`, or Brenner-Subrahmanyam
    /// `√(2π/T)·price/(S·e^(−qT))` near the money, clamped into the bracket.
    fn initial_guess(
        &self,
        price: Price,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        maturity: Time,
    ) -> Volatility {
        let forward = spot * ((rate - dividend_yield) * maturity).exp();
        let moneyness: Real = (2.0 * (forward / strike).ln().abs() / maturity).sqrt();
        let guess = if moneyness >= MIN_MONEYNESS_GUESS {
            moneyness
        } else {
            let discounted_spot = spot * (-dividend_yield * maturity).exp();
            (2.0 * PI / maturity).sqrt() * price / discounted_spot
        };
        guess.clamp(self.config.lower, self.config.upper)
    }
}
