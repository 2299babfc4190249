//! Fixed-rate bullet bonds.

use ql_cashflows::CashFlowSchedule;
use ql_core::{ensure, Rate, Real, Result, Time};
use ql_time::Frequency;

/// A bullet bond paying a fixed annual coupon rate in equal instalments.
///
/// The yield to price at, or the market price to solve for, is supplied to
/// the engine rather than stored here.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BondContract {
    /// Face value `F`, repaid at maturity.
    pub face_value: Real,
    /// Annual coupon rate `c`.
    pub coupon_rate: Rate,
    /// Time to maturity `T` in years.
    pub maturity: Time,
    /// Coupon payments per year.
    pub frequency: Frequency,
}

impl BondContract {
    /// A validated bond.
    pub fn new(
        face_value: Real,
        coupon_rate: Rate,
        maturity: Time,
        frequency: Frequency,
    ) -> Result<Self> {
        let bond = Self {
            face_value,
            coupon_rate,
            maturity,
            frequency,
        };
        bond.validate()?;
        Ok(bond)
    }

    /// Like [`BondContract::new`] with the frequency given as a raw count of
    /// payments per year.
    pub fn with_periods_per_year(
        face_value: Real,
        coupon_rate: Rate,
        maturity: Time,
        periods_per_year: i64,
    ) -> Result<Self> {
        let frequency = Frequency::from_periods_per_year(periods_per_year)?;
        Self::new(face_value, coupon_rate, maturity, frequency)
    }

    /// `F > 0`, `c ≥ 0`, `T > 0`, all finite.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.face_value.is_finite() && self.face_value > 0.0,
            "face value must be positive, got {}",
            self.face_value
        );
        ensure!(
            self.coupon_rate.is_finite() && self.coupon_rate >= 0.0,
            "coupon rate must be non-negative, got {}",
            self.coupon_rate
        );
        ensure!(
            self.maturity.is_finite() && self.maturity > 0.0,
            "time to maturity must be positive, got {}",
            self.maturity
        );
        Ok(())
    }

    /// Generate the coupon and redemption schedule.
    pub fn cash_flows(&self) -> Result<CashFlowSchedule> {
        CashFlowSchedule::fixed_rate(
            self.face_value,
            self.coupon_rate,
            self.maturity,
            self.frequency,
        )
    }
}
