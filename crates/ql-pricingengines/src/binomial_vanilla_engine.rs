//! Binomial lattice engine for vanilla options.
//!
//! Prices American (and, for comparison, European) vanilla options by
//! backward induction on a recombining binomial tree. There is no closed
//! form for early-exercise Greeks, so every sensitivity comes from
//! re-pricing the lattice with one input bumped:
//!
//! | Greek | Bump |
//! |---|---|
//! | delta, gamma | spot moved up/down by whole node spacings `(u/d)^k` |
//! | theta | maturity shortened by an even number of time steps, keeping `Δt` |
//! | vega | central, relative to `σ` |
//! | rho | central, absolute in `r` |
//!
//! Snapping the spot and time bumps to the grid keeps the bumped trees on
//! the base tree's nodes, so the differences are free of the strike-position
//! noise that otherwise swamps a lattice Greek.

use crate::results;
use ql_core::{ensure, ensure_post, Real, Result, Size, Time};
use ql_instruments::{ExerciseType, OptionContract, OptionPriceResult, PricingEngine};
use ql_methods::lattice::{
    price_american, price_european, BinomialTree, BlackScholesProcess, TreeKind, MAX_STEPS,
};
use tracing::debug;

// ── Settings ──────────────────────────────────────────────────────────────────

/// Lattice size, tree variant and bump sizes of a [`BinomialVanillaEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BinomialSettings {
    /// Number of time steps.
    pub steps: Size,
    /// Tree variant.
    pub tree: TreeKind,
    /// Relative spot bump for delta and gamma, before snapping to the grid.
    pub spot_bump: Real,
    /// Relative volatility bump for vega.
    pub vol_bump: Real,
    /// Absolute rate bump for rho.
    pub rate_bump: Real,
    /// Maturity bump for theta in years, before snapping to whole steps.
    pub time_bump: Time,
}

impl Default for BinomialSettings {
    /// 1000 CRR steps; 1 % spot and vol bumps, 1 bp rate bump, one day of
    /// time decay.
    fn default() -> Self {
        Self {
            steps: 1000,
            tree: TreeKind::CoxRossRubinstein,
            spot_bump: 0.01,
            vol_bump: 0.01,
            rate_bump: 1.0e-4,
            time_bump: 1.0 / 365.0,
        }
    }
}

impl BinomialSettings {
    /// Default settings with a different step count.
    pub fn with_steps(steps: Size) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Check step count and bump sizes.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_STEPS).contains(&self.steps),
            "lattice steps must be between 1 and {MAX_STEPS}, got {}",
            self.steps
        );
        for (name, bump) in [("spot", self.spot_bump), ("volatility", self.vol_bump)] {
            ensure!(
                bump.is_finite() && bump > 0.0 && bump < 1.0,
                "relative {name} bump must lie in (0, 1), got {bump}"
            );
        }
        for (name, bump) in [("rate", self.rate_bump), ("time", self.time_bump)] {
            ensure!(
                bump.is_finite() && bump > 0.0,
                "{name} bump must be positive, got {bump}"
            );
        }
        Ok(())
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Binomial pricing engine for vanilla options.
///
/// Costs eight lattice evaluations per call: the base price plus two for
/// delta/gamma, one for theta, two for vega and two for rho.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinomialVanillaEngine {
    settings: BinomialSettings,
}

impl BinomialVanillaEngine {
    /// Create an engine, validating `settings`.
    pub fn new(settings: BinomialSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// The engine's settings.
    pub fn settings(&self) -> &BinomialSettings {
        &self.settings
    }

    /// Lattice price of `contract` alone, without Greeks.
    pub fn npv(&self, contract: &OptionContract) -> Result<Real> {
        contract.validate()?;
        let price = self.rollback(contract, self.steps_for(contract))?;
        results::clean_price(price, contract.price_scale(), self.settings.tree.method_tag())
    }

    /// Configured step count, raised where the tree variant needs more steps
    /// to keep its probabilities valid on the base and every bumped lattice.
    fn steps_for(&self, contract: &OptionContract) -> Size {
        let settings = &self.settings;
        // Rho moves the carry by the rate bump; vega lowers σ by vol_bump·σ.
        let carry = (contract.rate - contract.dividend_yield).abs() + settings.rate_bump;
        let volatility = contract.volatility * (1.0 - settings.vol_bump);
        let required = settings.tree.min_steps(carry, volatility, contract.maturity);
        if required <= settings.steps {
            return settings.steps;
        }
        let steps = required.min(MAX_STEPS);
        debug!(
            configured = settings.steps,
            required,
            steps,
            "raising lattice steps to keep branch probabilities valid"
        );
        steps
    }

    fn tree(&self, contract: &OptionContract, steps: Size) -> Result<BinomialTree> {
        let process = BlackScholesProcess::new(
            contract.spot,
            contract.rate,
            contract.dividend_yield,
            contract.volatility,
        )?;
        BinomialTree::new(self.settings.tree, &process, contract.maturity, steps)
    }

    fn rollback(&self, contract: &OptionContract, steps: Size) -> Result<Real> {
        let tree = self.tree(contract, steps)?;
        Ok(self.rollback_on(&tree, contract))
    }

    fn rollback_on(&self, tree: &BinomialTree, contract: &OptionContract) -> Real {
        let payoff = contract.payoff();
        let payoff = |s: Real| payoff.value(s);
        let discount = (-contract.rate * tree.dt()).exp();
        match contract.exercise {
            ExerciseType::American => price_american(tree, &payoff, discount),
            ExerciseType::European => price_european(tree, &payoff, discount),
        }
    }
}

impl PricingEngine<OptionContract> for BinomialVanillaEngine {
    type Output = OptionPriceResult;

    fn calculate(&self, contract: &OptionContract) -> Result<OptionPriceResult> {
        contract.validate()?;
        let settings = &self.settings;
        let steps = self.steps_for(contract);
        let method = settings.tree.method_tag();
        debug!(
            method,
            steps,
            exercise = %contract.exercise,
            option_type = %contract.option_type,
            spot = contract.spot,
            strike = contract.strike,
            rate = contract.rate,
            dividend_yield = contract.dividend_yield,
            volatility = contract.volatility,
            maturity = contract.maturity,
            "pricing option on binomial lattice"
        );

        let tree = self.tree(contract, steps)?;
        let value = self.rollback_on(&tree, contract);
        ensure_post!(value.is_finite(), "{method} produced a non-finite price: {value}");

        // Delta and gamma: spot moved by k whole node spacings either way.
        let spot = contract.spot;
        let ratio = tree.node_ratio();
        let k = ((1.0 + settings.spot_bump).ln() / ratio.ln()).round().max(1.0);
        let factor = ratio.powf(k);
        let (s_up, s_down) = (spot * factor, spot / factor);
        let v_up = self.rollback(&contract.with_spot(s_up), steps)?;
        let v_down = self.rollback(&contract.with_spot(s_down), steps)?;
        let delta = (v_up - v_down) / (s_up - s_down);
        let gamma = 2.0 * ((v_up - value) / (s_up - spot) - (value - v_down) / (spot - s_down))
            / (s_up - s_down);

        // Theta: the same tree with k fewer steps, or k more when it has no
        // steps to spare. k is even so the shorter tree is the subtree rooted
        // at the base tree's middle node.
        let dt = tree.dt();
        let k = 2 * (settings.time_bump / (2.0 * dt)).round().max(1.0) as Size;
        let theta = if k < steps {
            let shorter = contract.with_maturity(contract.maturity - k as Real * dt);
            (self.rollback(&shorter, steps - k)? - value) / (k as Real * dt)
        } else {
            let longer = contract.with_maturity(contract.maturity + k as Real * dt);
            (value - self.rollback(&longer, steps + k)?) / (k as Real * dt)
        };

        // Vega and rho: central differences.
        let h = settings.vol_bump * contract.volatility;
        let vega = (self.rollback(&contract.with_volatility(contract.volatility + h), steps)?
            - self.rollback(&contract.with_volatility(contract.volatility - h), steps)?)
            / (2.0 * h);
        let h = settings.rate_bump;
        let rho = (self.rollback(&contract.with_rate(contract.rate + h), steps)?
            - self.rollback(&contract.with_rate(contract.rate - h), steps)?)
            / (2.0 * h);

        results::finish(
            OptionPriceResult {
                price: value,
                delta,
                gamma,
                vega,
                theta,
                rho,
                method: method.to_string(),
            },
            contract.price_scale(),
        )
    }
}
