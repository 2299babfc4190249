//! # ql-calculator
//!
//! Option, bond, yield and implied-volatility calculator.
//!
//! This crate is a **façade** over the `ql-*` engine crates. It exposes the
//! five calculator operations as flat functions taking plain numbers, a
//! configurable [`Calculator`] for callers that need other lattice sizes or
//! solver tolerances, and re-exports of the underlying crates.
//!
//! Every operation is a pure, synchronous function of its inputs and fails
//! with one of two error kinds: [`Error::InvalidInput`] for parameters outside
//! the model's domain, [`Error::CalculationFailed`] for results that cannot be
//! trusted.
//!
//! ## Quick start
//!
//! ```rust
//! use ql_calculator::{price_bond, price_european_option, OptionType};
//!
//! let call = price_european_option(OptionType::Call, 100.0, 100.0, 0.05, 0.0, 0.2, 1.0)?;
//! assert!((call.price - 10.4506).abs() < 1e-4);
//! assert!((call.delta - 0.6368).abs() < 1e-4);
//!
//! let par = price_bond(1000.0, 0.05, 0.05, 5.0, 2)?;
//! assert!((par - 1000.0).abs() < 1e-8);
//! # Ok::<(), ql_calculator::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;

/// Scalar aliases and the error type.
pub use ql_core as core;

/// Payment frequencies.
pub use ql_time as time;

/// Normal distribution and root finding.
pub use ql_math as math;

/// Binomial lattices.
pub use ql_methods as methods;

/// Bond cash flows, duration and convexity.
pub use ql_cashflows as cashflows;

/// Option and bond contracts.
pub use ql_instruments as instruments;

/// Pricing engines and solvers.
pub use ql_pricingengines as pricingengines;

pub use config::CalculatorConfig;
pub use ql_core::{Error, Price, Rate, Real, Result, Time, Volatility};
pub use ql_instruments::{
    BondAnalytics, BondContract, ExerciseType, OptionContract, OptionPriceResult, OptionType,
};
pub use ql_math::SolverConfig;
pub use ql_methods::TreeKind;
pub use ql_pricingengines::BinomialSettings;
pub use ql_time::Frequency;

use ql_instruments::PricingEngine;
use ql_pricingengines::{
    AnalyticEuropeanEngine, BinomialVanillaEngine, BondYieldSolver, DiscountingBondEngine,
    ImpliedVolatilitySolver,
};

// ── Calculator ────────────────────────────────────────────────────────────────

/// The engines and solvers behind the five calculator operations.
///
/// Holds no market state; one instance can serve any number of independent
/// calls, from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator {
    european: AnalyticEuropeanEngine,
    american: BinomialVanillaEngine,
    bond_yield: BondYieldSolver,
    implied_volatility: ImpliedVolatilitySolver,
}

impl Calculator {
    /// Build the engines described by `config`, validating every section.
    pub fn new(config: CalculatorConfig) -> Result<Self> {
        Ok(Self {
            european: AnalyticEuropeanEngine::new(),
            american: BinomialVanillaEngine::new(config.lattice)?,
            bond_yield: BondYieldSolver::new(config.bond_yield)?,
            implied_volatility: ImpliedVolatilitySolver::new(config.implied_volatility)?,
        })
    }

    /// The configuration this calculator runs with.
    pub fn config(&self) -> CalculatorConfig {
        CalculatorConfig {
            lattice: *self.american.settings(),
            bond_yield: *self.bond_yield.config(),
            implied_volatility: *self.implied_volatility.config(),
        }
    }

    /// Price `contract` with the engine matching its exercise style:
    /// Black-Scholes for European, the binomial lattice for American.
    pub fn price_option(&self, contract: &OptionContract) -> Result<OptionPriceResult> {
        match contract.exercise {
            ExerciseType::European => self.european.calculate(contract),
            ExerciseType::American => self.american.calculate(contract),
        }
    }

    /// Black-Scholes-Merton price and analytic Greeks.
    #[allow(clippy::too_many_arguments)]
    pub fn price_european_option(
        &self,
        option_type: OptionType,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
        maturity: Time,
    ) -> Result<OptionPriceResult> {
        let contract = OptionContract::european(
            option_type,
            spot,
            strike,
            rate,
            dividend_yield,
            volatility,
            maturity,
        )?;
        self.european.calculate(&contract)
    }

    /// Binomial lattice price with early exercise, and bump Greeks.
    #[allow(clippy::too_many_arguments)]
    pub fn price_american_option(
        &self,
        option_type: OptionType,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
        maturity: Time,
    ) -> Result<OptionPriceResult> {
        let contract = OptionContract::american(
            option_type,
            spot,
            strike,
            rate,
            dividend_yield,
            volatility,
            maturity,
        )?;
        self.american.calculate(&contract)
    }

    /// Present value of a fixed-rate bond discounted at `yield_rate`,
    /// compounded `frequency` times per year.
    pub fn price_bond(
        &self,
        face_value: Price,
        coupon_rate: Rate,
        yield_rate: Rate,
        maturity: Time,
        frequency: i64,
    ) -> Result<Price> {
        let bond = BondContract::with_periods_per_year(face_value, coupon_rate, maturity, frequency)?;
        DiscountingBondEngine::new(yield_rate)?.npv(&bond)
    }

    /// Price, Macaulay and modified duration, and convexity of `bond` at
    /// `yield_rate`.
    pub fn bond_analytics(&self, bond: &BondContract, yield_rate: Rate) -> Result<BondAnalytics> {
        DiscountingBondEngine::new(yield_rate)?.calculate(bond)
    }

    /// Yield to maturity at which the bond is worth `price`.
    pub fn solve_bond_yield(
        &self,
        price: Price,
        face_value: Price,
        coupon_rate: Rate,
        maturity: Time,
        frequency: i64,
    ) -> Result<Rate> {
        let bond = BondContract::with_periods_per_year(face_value, coupon_rate, maturity, frequency)?;
        self.bond_yield.solve(&bond, price)
    }

    /// Black-Scholes volatility reproducing `observed_price`.
    #[allow(clippy::too_many_arguments)]
    pub fn solve_implied_volatility(
        &self,
        option_type: OptionType,
        observed_price: Price,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        maturity: Time,
    ) -> Result<Volatility> {
        self.implied_volatility.solve(
            option_type,
            observed_price,
            spot,
            strike,
            rate,
            dividend_yield,
            maturity,
        )
    }
}

// ── Flat operations ───────────────────────────────────────────────────────────

/// Price a European option with Black-Scholes-Merton.
///
/// `InvalidInput` unless `spot`, `strike`, `volatility` and `maturity` are
/// positive and every input is finite.
pub fn price_european_option(
    option_type: OptionType,
    spot: Price,
    strike: Price,
    rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    maturity: Time,
) -> Result<OptionPriceResult> {
    Calculator::default().price_european_option(
        option_type,
        spot,
        strike,
        rate,
        dividend_yield,
        volatility,
        maturity,
    )
}

/// Price an American option on a 1000-step Cox-Ross-Rubinstein lattice.
///
/// Greeks come from re-pricing bumped lattices. When the carry is large
/// against the volatility the lattice takes as many more steps as its branch
/// probabilities need. Use a [`Calculator`] for another step count or tree.
pub fn price_american_option(
    option_type: OptionType,
    spot: Price,
    strike: Price,
    rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
    maturity: Time,
) -> Result<OptionPriceResult> {
    Calculator::default().price_american_option(
        option_type,
        spot,
        strike,
        rate,
        dividend_yield,
        volatility,
        maturity,
    )
}

/// Price a fixed-rate bond at a yield compounded at the coupon frequency.
///
/// `frequency` is the number of payments per year and must be one of
/// 1, 2, 3, 4, 6 or 12.
pub fn price_bond(
    face_value: Price,
    coupon_rate: Rate,
    yield_rate: Rate,
    maturity: Time,
    frequency: i64,
) -> Result<Price> {
    Calculator::default().price_bond(face_value, coupon_rate, yield_rate, maturity, frequency)
}

/// Solve for the yield to maturity of a fixed-rate bond from its price.
pub fn solve_bond_yield(
    price: Price,
    face_value: Price,
    coupon_rate: Rate,
    maturity: Time,
    frequency: i64,
) -> Result<Rate> {
    Calculator::default().solve_bond_yield(price, face_value, coupon_rate, maturity, frequency)
}

/// Solve for the Black-Scholes volatility of a European option price.
///
/// Prices outside the no-arbitrage bounds are `InvalidInput`.
pub fn solve_implied_volatility(
    option_type: OptionType,
    observed_price: Price,
    spot: Price,
    strike: Price,
    rate: Rate,
    dividend_yield: Rate,
    maturity: Time,
) -> Result<Volatility> {
    Calculator::default().solve_implied_volatility(
        option_type,
        observed_price,
        spot,
        strike,
        rate,
        dividend_yield,
        maturity,
    )
}
