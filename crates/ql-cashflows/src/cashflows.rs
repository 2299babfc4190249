//! Yield-based analytics over a cash-flow schedule.
//!
//! Every function discounts with the schedule's own compounding frequency:
//! a flow at time `t` is worth `CF · (1 + y/n)^(−n·t)` today.
//!
//! - `npv` / `npv_derivative`: present value and `dP/dy`
//! - `duration`: Macaulay or modified
//! - `convexity`
//! - `yield_rate`: the yield that reproduces a given price

use crate::cashflow::CashFlowSchedule;
use ql_core::{ensure, Price, Rate, Real, Result};
use ql_math::solvers1d::{newton_bisection, SolverConfig};
use tracing::debug;

/// Duration convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    /// Present-value weighted average time to payment.
    Macaulay,
    /// Macaulay duration divided by `1 + y/n`, i.e. `−(dP/dy)/P`.
    Modified,
}

#[inline]
fn periods_per_year(schedule: &CashFlowSchedule) -> Real {
    schedule.frequency().periods_per_year() as Real
}

/// Present value of the schedule at yield `y`.
///
/// Yields at or below `−n` make the discount base non-positive; the result is
/// then NaN and the caller is expected to treat it as a failed calculation.
pub fn npv(schedule: &CashFlowSchedule, y: Rate) -> Price {
    let n = periods_per_year(schedule);
    let base = 1.0 + y / n;
    schedule
        .iter()
        .map(|cf| cf.amount * base.powf(-n * cf.time))
        .sum()
}

/// Analytic `dP/dy = Σ −t · CF · (1 + y/n)^(−n·t − 1)`.
pub fn npv_derivative(schedule: &CashFlowSchedule, y: Rate) -> Real {
    let n = periods_per_year(schedule);
    let base = 1.0 + y / n;
    schedule
        .iter()
        .map(|cf| -cf.time * cf.amount * base.powf(-n * cf.time - 1.0))
        .sum()
}

/// Present value and its yield derivative in one pass.
pub fn npv_and_derivative(schedule: &CashFlowSchedule, y: Rate) -> (Price, Real) {
    let n = periods_per_year(schedule);
    let base = 1.0 + y / n;
    schedule.iter().fold((0.0, 0.0), |(p, dp), cf| {
        let df = base.powf(-n * cf.time);
        (p + cf.amount * df, dp - cf.time * cf.amount * df / base)
    })
}

/// Duration of the schedule at yield `y`.
pub fn duration(schedule: &CashFlowSchedule, y: Rate, kind: Duration) -> Real {
    let n = periods_per_year(schedule);
    let base = 1.0 + y / n;
    let (p, weighted) = schedule.iter().fold((0.0, 0.0), |(p, w), cf| {
        let pv = cf.amount * base.powf(-n * cf.time);
        (p + pv, w + cf.time * pv)
    });
    let macaulay = weighted / p;
    match kind {
        Duration::Macaulay => macaulay,
        Duration::Modified => macaulay / base,
    }
}

/// Convexity `(1/P) · Σ CF · t · (t + 1/n) · (1 + y/n)^(−n·t − 2)`.
pub fn convexity(schedule: &CashFlowSchedule, y: Rate) -> Real {
    let n = periods_per_year(schedule);
    let base = 1.0 + y / n;
    let (p, d2) = schedule.iter().fold((0.0, 0.0), |(p, d2), cf| {
        let df = base.powf(-n * cf.time);
        let t = cf.time;
        (
            p + cf.amount * df,
            d2 + cf.amount * t * (t + 1.0 / n) * df / (base * base),
        )
    });
    d2 / p
}

/// Yield at which the schedule is worth `price`.
///
/// Newton-Raphson on `npv(y) − price` with the analytic derivative, started
/// from `guess` and falling back to bisection over the configured bracket.
/// Since every flow is positive, the price is strictly decreasing in `y` and
/// the root is unique whenever it exists.
pub fn yield_rate(
    schedule: &CashFlowSchedule,
    price: Price,
    guess: Rate,
    config: &SolverConfig,
) -> Result<Rate> {
    ensure!(
        price.is_finite() && price > 0.0,
        "bond price must be positive and finite, got {price}"
    );
    let n = periods_per_year(schedule);
    ensure!(
        config.lower > -n,
        "yield bracket lower end {} leaves the discount base non-positive",
        config.lower
    );

    let result = newton_bisection(
        |y| {
            let (p, dp) = npv_and_derivative(schedule, y);
            (p - price, dp)
        },
        guess,
        config,
    )?;
    debug!(
        price,
        root = result.root,
        iterations = result.iterations,
        used_bisection = result.used_bisection,
        "bond yield search finished"
    );
    let y = result.root_or_fail("bond yield")?;
    ql_core::ensure_post!(y.is_finite(), "bond yield is not finite: {y}");
    Ok(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_time::Frequency;

    fn bond(coupon: Real, maturity: Real, frequency: Frequency) -> CashFlowSchedule {
        CashFlowSchedule::fixed_rate(1000.0, coupon, maturity, frequency).unwrap()
    }

    fn yield_config() -> SolverConfig {
        SolverConfig::new(-0.99, 10.0)
    }

    #[test]
    fn par_bond_prices_at_face() {
        for f in Frequency::ALL {
            let s = bond(0.05, 5.0, f);
            assert_abs_diff_eq!(npv(&s, 0.05), 1000.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn zero_coupon_npv_is_single_discount() {
        let s = bond(0.0, 3.0, Frequency::Semiannual);
        let expected = 1000.0 * (1.0_f64 + 0.04 / 2.0).powf(-6.0);
        assert_abs_diff_eq!(npv(&s, 0.04), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(duration(&s, 0.04, Duration::Macaulay), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let s = bond(0.07, 7.3, Frequency::Quarterly);
        let y = 0.055;
        let h = 1e-6;
        let fd = (npv(&s, y + h) - npv(&s, y - h)) / (2.0 * h);
        assert_abs_diff_eq!(npv_derivative(&s, y), fd, epsilon = 1e-4);
        let (p, dp) = npv_and_derivative(&s, y);
        assert_abs_diff_eq!(p, npv(&s, y), epsilon = 1e-10);
        assert_abs_diff_eq!(dp, npv_derivative(&s, y), epsilon = 1e-8);
    }

    #[test]
    fn modified_duration_is_relative_price_sensitivity() {
        let s = bond(0.05, 10.0, Frequency::Semiannual);
        let y = 0.06;
        let p = npv(&s, y);
        assert_abs_diff_eq!(
            duration(&s, y, Duration::Modified),
            -npv_derivative(&s, y) / p,
            epsilon = 1e-12
        );
        assert!(duration(&s, y, Duration::Macaulay) < 10.0);
    }

    #[test]
    fn convexity_matches_second_difference() {
        let s = bond(0.05, 10.0, Frequency::Annual);
        let y = 0.05;
        let h = 1e-4;
        let p = npv(&s, y);
        let fd = (npv(&s, y + h) - 2.0 * p + npv(&s, y - h)) / (h * h * p);
        assert_abs_diff_eq!(convexity(&s, y), fd, epsilon = 1e-3);
    }

    #[test]
    fn yield_rate_recovers_par() {
        let s = bond(0.05, 5.0, Frequency::Semiannual);
        let y = yield_rate(&s, 1000.0, 0.05, &yield_config()).unwrap();
        assert_abs_diff_eq!(y, 0.05, epsilon = 1e-8);
    }

    #[test]
    fn yield_rate_of_discount_and_premium_bonds() {
        let s = bond(0.05, 5.0, Frequency::Annual);
        let y = yield_rate(&s, 950.0, 0.05, &yield_config()).unwrap();
        assert!(y > 0.05);
        assert_abs_diff_eq!(npv(&s, y), 950.0, epsilon = 1e-6);

        let y = yield_rate(&s, 1100.0, 0.05, &yield_config()).unwrap();
        assert!(y < 0.05);
        assert_abs_diff_eq!(npv(&s, y), 1100.0, epsilon = 1e-6);
    }

    #[test]
    fn yield_rate_from_poor_guess() {
        let s = bond(0.03, 20.0, Frequency::Monthly);
        let y = yield_rate(&s, 400.0, 9.5, &yield_config()).unwrap();
        assert_abs_diff_eq!(npv(&s, y), 400.0, epsilon = 1e-6);
    }

    #[test]
    fn yield_rate_rejects_bad_prices() {
        let s = bond(0.05, 5.0, Frequency::Annual);
        for p in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            assert!(yield_rate(&s, p, 0.05, &yield_config()).unwrap_err().is_invalid_input());
        }
    }

    #[test]
    fn unreachable_price_fails_calculation() {
        // Even a 1000 % yield leaves this bond worth more than 1e-9.
        let s = bond(0.05, 1.0, Frequency::Annual);
        let err = yield_rate(&s, 1e-9, 0.05, &yield_config()).unwrap_err();
        assert!(err.is_calculation_failed());
    }
}
