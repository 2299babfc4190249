//! Pricing results and the `PricingEngine` trait.

use ql_core::{ensure_post, Price, Real, Result};

/// Price and Greeks of an option.
///
/// Units: vega per 1.00 of volatility, rho per 1.00 of rate, theta per year
/// of calendar time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionPriceResult {
    /// Present value.
    pub price: Price,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂σ`.
    pub vega: Real,
    /// `−∂V/∂T`.
    pub theta: Real,
    /// `∂V/∂r`.
    pub rho: Real,
    /// Model that produced the numbers, e.g. `"Black-Scholes"`.
    pub method: String,
}

impl OptionPriceResult {
    /// Fail with `CalculationFailed` unless every number is finite and the
    /// price is non-negative.
    pub fn ensure_valid(&self) -> Result<()> {
        let fields = [
            ("price", self.price),
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("vega", self.vega),
            ("theta", self.theta),
            ("rho", self.rho),
        ];
        for (name, value) in fields {
            ensure_post!(value.is_finite(), "{} produced a non-finite {name}: {value}", self.method);
        }
        ensure_post!(
            self.price >= 0.0,
            "{} produced a negative price: {}",
            self.method,
            self.price
        );
        Ok(())
    }
}

/// Price and risk measures of a bond at a given yield.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BondAnalytics {
    /// Present value of all cash flows.
    pub price: Price,
    /// Present-value weighted time to payment, in years.
    pub macaulay_duration: Real,
    /// `−(dP/dy)/P`.
    pub modified_duration: Real,
    /// `(d²P/dy²)/P`.
    pub convexity: Real,
}

/// Something that values a contract.
///
/// Engines hold their own settings (and, for bonds, the yield) and are
/// stateless between calls, so one engine can be shared across threads.
pub trait PricingEngine<Contract>: std::fmt::Debug + Send + Sync {
    /// What the engine computes.
    type Output;

    /// Value `contract`.
    fn calculate(&self, contract: &Contract) -> Result<Self::Output>;
}
