//! Yield to maturity from an observed bond price.

use ql_cashflows::yield_rate;
use ql_core::{Price, Rate, Result};
use ql_instruments::BondContract;
use ql_math::SolverConfig;
use tracing::debug;

/// Default yield bracket `[-0.99, 10.0]`.
pub const DEFAULT_YIELD_BRACKET: (Rate, Rate) = (-0.99, 10.0);

/// Inverts the discounting bond price with respect to the yield.
///
/// Newton-Raphson seeded at the coupon rate, using the analytic price/yield
/// derivative, with bisection over the bracket as the fallback. Price is
/// strictly decreasing in the yield, so any root found is the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondYieldSolver {
    config: SolverConfig,
}

impl Default for BondYieldSolver {
    fn default() -> Self {
        let (lower, upper) = DEFAULT_YIELD_BRACKET;
        Self {
            config: SolverConfig::new(lower, upper),
        }
    }
}

impl BondYieldSolver {
    /// Solver with custom tolerances and bracket.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The root-finder configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The yield at which `bond` is worth `price`.
    ///
    /// `InvalidInput` for an invalid bond or a non-positive price;
    /// `CalculationFailed` when no yield in the bracket reproduces the price.
    pub fn solve(&self, bond: &BondContract, price: Price) -> Result<Rate> {
        bond.validate()?;
        debug!(
            price,
            face_value = bond.face_value,
            coupon_rate = bond.coupon_rate,
            maturity = bond.maturity,
            frequency = %bond.frequency,
            "solving bond yield"
        );
        let schedule = bond.cash_flows()?;
        yield_rate(&schedule, price, bond.coupon_rate, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiscountingBondEngine;
    use approx::assert_abs_diff_eq;
    use ql_time::Frequency;

    #[test]
    fn recovers_par_yield() {
        let bond = BondContract::new(1000.0, 0.05, 5.0, Frequency::Semiannual).unwrap();
        let y = BondYieldSolver::default().solve(&bond, 1000.0).unwrap();
        assert_abs_diff_eq!(y, 0.05, epsilon = 1e-8);
    }

    #[test]
    fn round_trips_through_engine() {
        let solver = BondYieldSolver::default();
        for (coupon, y, maturity, frequency) in [
            (0.03, 0.07, 10.0, Frequency::Annual),
            (0.08, 0.02, 2.5, Frequency::Quarterly),
            (0.0, 0.04, 7.0, Frequency::Semiannual),
            (0.06, -0.005, 3.25, Frequency::Monthly),
            (0.12, 0.35, 30.0, Frequency::EveryFourthMonth),
        ] {
            let bond = BondContract::new(100.0, coupon, maturity, frequency).unwrap();
            let price = DiscountingBondEngine::new(y).unwrap().npv(&bond).unwrap();
            let solved = solver.solve(&bond, price).unwrap();
            assert_abs_diff_eq!(solved, y, epsilon = 1e-8);
        }
    }

    #[test]
    fn rejects_non_positive_price() {
        let bond = BondContract::new(1000.0, 0.05, 5.0, Frequency::Annual).unwrap();
        let solver = BondYieldSolver::default();
        assert!(solver.solve(&bond, 0.0).unwrap_err().is_invalid_input());
        assert!(solver.solve(&bond, -5.0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn price_outside_bracket_fails() {
        let bond = BondContract::new(1000.0, 0.05, 5.0, Frequency::Annual).unwrap();
        let tight = BondYieldSolver::new(SolverConfig::new(0.0, 0.10)).unwrap();
        let err = tight.solve(&bond, 500.0).unwrap_err();
        assert!(err.is_calculation_failed());
    }
}
