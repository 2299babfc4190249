//! Discounting bond pricing engine.
//!
//! Prices a fixed-rate bond by discounting its cash flows at a flat yield
//! compounded at the coupon frequency:
//!
//! $$P = \sum_i CF_i \, (1 + y/n)^{-n t_i}$$

use ql_cashflows::{convexity, duration, npv, CashFlowSchedule, Duration};
use ql_core::{ensure, ensure_post, Price, Rate, Real, Result};
use ql_instruments::{BondAnalytics, BondContract, PricingEngine};
use tracing::debug;

/// Discounting bond pricing engine at a fixed yield.
#[derive(Debug, Clone, Copy)]
pub struct DiscountingBondEngine {
    yield_rate: Rate,
}

impl DiscountingBondEngine {
    /// Create an engine discounting at `yield_rate`.
    pub fn new(yield_rate: Rate) -> Result<Self> {
        ensure!(yield_rate.is_finite(), "yield must be finite, got {yield_rate}");
        Ok(Self { yield_rate })
    }

    /// The discount yield.
    pub fn yield_rate(&self) -> Rate {
        self.yield_rate
    }

    /// Present value of `bond`, without risk measures.
    pub fn npv(&self, bond: &BondContract) -> Result<Price> {
        let schedule = self.schedule(bond)?;
        let price = npv(&schedule, self.yield_rate);
        ensure_post!(
            price.is_finite() && price >= 0.0,
            "bond price is not a finite non-negative number: {price}"
        );
        Ok(price)
    }

    fn schedule(&self, bond: &BondContract) -> Result<CashFlowSchedule> {
        bond.validate()?;
        let n = bond.frequency.periods_per_year() as Real;
        ensure!(
            1.0 + self.yield_rate / n > 0.0,
            "yield {} is at or below -{n}, where the discount factor is undefined",
            self.yield_rate
        );
        debug!(
            face_value = bond.face_value,
            coupon_rate = bond.coupon_rate,
            maturity = bond.maturity,
            frequency = %bond.frequency,
            yield_rate = self.yield_rate,
            "pricing bond"
        );
        bond.cash_flows()
    }
}

impl PricingEngine<BondContract> for DiscountingBondEngine {
    type Output = BondAnalytics;

    fn calculate(&self, bond: &BondContract) -> Result<BondAnalytics> {
        let schedule = self.schedule(bond)?;
        let y = self.yield_rate;
        let analytics = BondAnalytics {
            price: npv(&schedule, y),
            macaulay_duration: duration(&schedule, y, Duration::Macaulay),
            modified_duration: duration(&schedule, y, Duration::Modified),
            convexity: convexity(&schedule, y),
        };
        ensure_post!(
            analytics.price.is_finite() && analytics.price >= 0.0,
            "bond price is not a finite non-negative number: {}",
            analytics.price
        );
        ensure_post!(
            analytics.macaulay_duration.is_finite()
                && analytics.modified_duration.is_finite()
                && analytics.convexity.is_finite(),
            "bond risk measures are not finite at yield {y}"
        );
        Ok(analytics)
    }
}
