//! Cash flows and the fixed-rate bond cash-flow schedule.
//!
//! A cash flow is an amount of money paid at a time measured in years from
//! today. The schedule of a fixed-rate bond is generated backwards from
//! maturity, one coupon per period, with the face value redeemed at maturity.

use ql_core::{ensure, Real, Result, Size, Time};
use ql_time::Frequency;
use std::fmt;

/// Upper bound on the number of coupon periods of a generated schedule
/// (a thousand years of monthly coupons).
pub const MAX_PERIODS: Size = 12_000;

/// Relative slack when rounding `T·n` up to a whole number of periods, so
/// that `5.0 * 2.0` computed as `10.000000000000002` stays ten periods.
const PERIOD_ROUNDING: Real = 1.0e-9;

/// What a cash flow pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashFlowKind {
    /// A periodic coupon.
    Coupon,
    /// Repayment of the face value at maturity.
    Redemption,
}

impl fmt::Display for CashFlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashFlowKind::Coupon => write!(f, "Coupon"),
            CashFlowKind::Redemption => write!(f, "Redemption"),
        }
    }
}

/// A fixed amount paid at a fixed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// Payment time in years.
    pub time: Time,
    /// Amount paid.
    pub amount: Real,
    /// Coupon or redemption.
    pub kind: CashFlowKind,
}

impl CashFlow {
    /// A coupon payment.
    pub fn coupon(time: Time, amount: Real) -> Self {
        Self {
            time,
            amount,
            kind: CashFlowKind::Coupon,
        }
    }

    /// A redemption payment.
    pub fn redemption(time: Time, amount: Real) -> Self {
        Self {
            time,
            amount,
            kind: CashFlowKind::Redemption,
        }
    }
}

/// The ordered cash flows of a fixed-rate bond.
///
/// Immutable once built; flows are sorted by time, and the redemption is the
/// last entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowSchedule {
    flows: Vec<CashFlow>,
    frequency: Frequency,
    periods: Size,
    maturity: Time,
}

impl CashFlowSchedule {
    /// Build the schedule of a bullet fixed-rate bond.
    ///
    /// There are `⌈T·n⌉` coupon periods; period `i` ends at
    /// `T − (N − i)/n`, so when `T·n` is not whole the first period is short.
    /// Each period pays `F·c/n` (zero coupons are omitted) and `F` is repaid
    /// at `T`.
    pub fn fixed_rate(
        face_value: Real,
        coupon_rate: Real,
        maturity: Time,
        frequency: Frequency,
    ) -> Result<Self> {
        ensure!(
            face_value.is_finite() && face_value > 0.0,
            "face value must be positive, got {face_value}"
        );
        ensure!(
            coupon_rate.is_finite() && coupon_rate >= 0.0,
            "coupon rate must be non-negative, got {coupon_rate}"
        );
        ensure!(
            maturity.is_finite() && maturity > 0.0,
            "time to maturity must be positive, got {maturity}"
        );

        let n = frequency.periods_per_year() as Real;
        let raw = maturity * n;
        let periods = (raw - PERIOD_ROUNDING * raw.max(1.0)).ceil().max(1.0);
        ensure!(
            periods <= MAX_PERIODS as Real,
            "{periods} coupon periods exceed the supported maximum of {MAX_PERIODS}"
        );
        let periods = periods as Size;

        let coupon = face_value * coupon_rate / n;
        let mut flows = Vec::with_capacity(periods + 1);
        if coupon > 0.0 {
            flows.extend((1..=periods).map(|i| {
                let time = maturity - (periods - i) as Real / n;
                CashFlow::coupon(time, coupon)
            }));
        }
        flows.push(CashFlow::redemption(maturity, face_value));

        Ok(Self {
            flows,
            frequency,
            periods,
            maturity,
        })
    }

    /// All cash flows in payment order.
    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    /// Iterate over the cash flows in payment order.
    pub fn iter(&self) -> std::slice::Iter<'_, CashFlow> {
        self.flows.iter()
    }

    /// Number of cash flows (coupons plus redemption).
    pub fn len(&self) -> Size {
        self.flows.len()
    }

    /// Always `false`: a schedule holds at least the redemption.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Number of coupon periods `⌈T·n⌉`.
    pub fn periods(&self) -> Size {
        self.periods
    }

    /// Payment frequency the schedule was generated with.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Time of the final payment.
    pub fn maturity(&self) -> Time {
        self.maturity
    }
}

impl<'a> IntoIterator for &'a CashFlowSchedule {
    type Item = &'a CashFlow;
    type IntoIter = std::slice::Iter<'a, CashFlow>;

    fn into_iter(self) -> Self::IntoIter {
        self.flows.iter()
    }
}
