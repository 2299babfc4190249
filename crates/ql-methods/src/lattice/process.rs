//! Constant-parameter geometric Brownian motion.

use ql_core::{ensure, Rate, Real, Result, Volatility};

/// `dS = (r − q)·S·dt + σ·S·dW` with flat `r`, `q` and `σ`.
///
/// The lattice builders read their per-step moments from here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholesProcess {
    /// Initial value `S₀`.
    pub x0: Real,
    /// Risk-free rate `r`.
    pub rate: Rate,
    /// Dividend yield `q`.
    pub dividend_yield: Rate,
    /// Volatility `σ`.
    pub volatility: Volatility,
}

impl BlackScholesProcess {
    /// Build a process, rejecting non-positive `S₀` or `σ` and non-finite
    /// rates.
    pub fn new(x0: Real, rate: Rate, dividend_yield: Rate, volatility: Volatility) -> Result<Self> {
        ensure!(x0.is_finite() && x0 > 0.0, "initial value must be positive, got {x0}");
        ensure!(
            volatility.is_finite() && volatility > 0.0,
            "volatility must be positive, got {volatility}"
        );
        ensure!(
            rate.is_finite() && dividend_yield.is_finite(),
            "rates must be finite, got r = {rate}, q = {dividend_yield}"
        );
        Ok(Self {
            x0,
            rate,
            dividend_yield,
            volatility,
        })
    }

    /// Cost of carry `r − q`.
    pub fn carry(&self) -> Rate {
        self.rate - self.dividend_yield
    }

    /// Drift of `ln S`: `r − q − σ²/2`.
    pub fn log_drift(&self) -> Real {
        self.carry() - 0.5 * self.volatility * self.volatility
    }

    /// Variance of `ln S` over `dt`: `σ²·dt`.
    pub fn log_variance(&self, dt: Real) -> Real {
        self.volatility * self.volatility * dt
    }
}
