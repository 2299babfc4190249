//! Vanilla option contracts on a single underlying with continuous dividend
//! yield.

use crate::exercise::ExerciseType;
use crate::payoff::{OptionType, PlainVanillaPayoff};
use ql_core::{ensure, Price, Rate, Real, Result, Time, Volatility};

/// A plain vanilla option together with the market data needed to price it.
///
/// The contract is a plain value: build it with [`OptionContract::european`]
/// or [`OptionContract::american`], which validate it, or fill the fields
/// directly and call [`OptionContract::validate`]. Engines validate again
/// before pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Exercise style.
    pub exercise: ExerciseType,
    /// Call or put.
    pub option_type: OptionType,
    /// Underlying price `S`.
    pub spot: Price,
    /// Strike `K`.
    pub strike: Price,
    /// Continuously compounded risk-free rate `r`.
    pub rate: Rate,
    /// Continuous dividend yield `q`.
    pub dividend_yield: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
    /// Time to maturity `T` in years.
    pub maturity: Time,
}

impl OptionContract {
    /// A validated European option.
    pub fn european(
        option_type: OptionType,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
        maturity: Time,
    ) -> Result<Self> {
        let contract = Self {
            exercise: ExerciseType::European,
            option_type,
            spot,
            strike,
            rate,
            dividend_yield,
            volatility,
            maturity,
        };
        contract.validate()?;
        Ok(contract)
    }

    /// A validated American option.
    pub fn american(
        option_type: OptionType,
        spot: Price,
        strike: Price,
        rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
        maturity: Time,
    ) -> Result<Self> {
        let contract = Self {
            exercise: ExerciseType::American,
            ..Self::european(
                option_type,
                spot,
                strike,
                rate,
                dividend_yield,
                volatility,
                maturity,
            )?
        };
        Ok(contract)
    }

    /// Check the model domain: `S`, `K`, `σ` and `T` strictly positive,
    /// everything finite.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.spot.is_finite() && self.spot > 0.0,
            "underlying price must be positive, got {}",
            self.spot
        );
        ensure!(
            self.strike.is_finite() && self.strike > 0.0,
            "strike must be positive, got {}",
            self.strike
        );
        ensure!(
            self.volatility.is_finite() && self.volatility > 0.0,
            "volatility must be positive, got {}",
            self.volatility
        );
        ensure!(
            self.maturity.is_finite() && self.maturity > 0.0,
            "time to maturity must be positive, got {}",
            self.maturity
        );
        ensure!(
            self.rate.is_finite(),
            "risk-free rate must be finite, got {}",
            self.rate
        );
        ensure!(
            self.dividend_yield.is_finite(),
            "dividend yield must be finite, got {}",
            self.dividend_yield
        );
        Ok(())
    }

    /// The exercise payoff.
    pub fn payoff(&self) -> PlainVanillaPayoff {
        PlainVanillaPayoff::new(self.option_type, self.strike)
    }

    /// Copy with a different underlying price.
    pub fn with_spot(&self, spot: Price) -> Self {
        Self { spot, ..*self }
    }

    /// Copy with a different volatility.
    pub fn with_volatility(&self, volatility: Volatility) -> Self {
        Self { volatility, ..*self }
    }

    /// Copy with a different risk-free rate.
    pub fn with_rate(&self, rate: Rate) -> Self {
        Self { rate, ..*self }
    }

    /// Copy with a different time to maturity.
    pub fn with_maturity(&self, maturity: Time) -> Self {
        Self { maturity, ..*self }
    }

    /// Copy with a different exercise style.
    pub fn with_exercise(&self, exercise: ExerciseType) -> Self {
        Self { exercise, ..*self }
    }

    /// The larger of strike and spot, the scale of the option's price.
    pub fn price_scale(&self) -> Real {
        self.spot.max(self.strike)
    }
}
