//! Lattice methods for option pricing.
//!
//! # Overview
//!
//! * [`BlackScholesProcess`]: the diffusion the trees discretise
//! * [`BinomialTree`]: recombining binomial tree (CRR, Jarrow-Rudd, Tian)
//! * [`price_european`] / [`price_american`]: backward-induction pricing

pub mod binomial_tree;
pub mod process;

pub use binomial_tree::{BinomialTree, TreeKind, MAX_STEPS};
pub use process::BlackScholesProcess;

use ql_core::Real;
use tracing::trace;

// ─── Backward-induction pricing ───────────────────────────────────────────────

/// Price a European option by backward induction on a binomial tree.
///
/// # Arguments
/// * `tree`: the binomial tree (already constructed)
/// * `payoff`: payoff function `S → value` (e.g. `|s| (s - K).max(0.0)`)
/// * `discount`: per-step discount factor, typically `exp(−r · Δt)`
pub fn price_european(tree: &BinomialTree, payoff: &dyn Fn(Real) -> Real, discount: Real) -> Real {
    rollback(tree, payoff, discount, false)
}

/// Price an American option by backward induction on a binomial tree.
///
/// Same as European pricing, but the holder may exercise at every node: each
/// node keeps the larger of its discounted continuation value and `payoff`.
pub fn price_american(tree: &BinomialTree, payoff: &dyn Fn(Real) -> Real, discount: Real) -> Real {
    rollback(tree, payoff, discount, true)
}

fn rollback(
    tree: &BinomialTree,
    payoff: &dyn Fn(Real) -> Real,
    discount: Real,
    early_exercise: bool,
) -> Real {
    let n = tree.steps();
    let ratio = tree.node_ratio();
    let pu = discount * tree.probability(0, 0, 1);
    let pd = discount * tree.probability(0, 0, 0);

    // Terminal values at maturity
    let mut spot = tree.underlying(n, 0);
    let mut values: Vec<Real> = Vec::with_capacity(tree.size(n));
    for _ in 0..tree.size(n) {
        values.push(payoff(spot));
        spot *= ratio;
    }

    // Roll back through the tree, reusing the terminal layer's storage
    for i in (0..n).rev() {
        let mut spot = tree.underlying(i, 0);
        for j in 0..tree.size(i) {
            let hold = pu * values[tree.descendant(i, j, 1)] + pd * values[tree.descendant(i, j, 0)];
            values[j] = if early_exercise {
                hold.max(payoff(spot))
            } else {
                hold
            };
            spot *= ratio;
        }
    }

    trace!(steps = n, early_exercise, value = values[0], "lattice rollback");
    values[0]
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tree(x0: Real, r: Real, q: Real, vol: Real, t: Real, steps: usize) -> BinomialTree {
        let process = BlackScholesProcess::new(x0, r, q, vol).unwrap();
        BinomialTree::cox_ross_rubinstein(&process, t, steps).unwrap()
    }

    #[test]
    fn one_step_matches_hand_calculation() {
        let t = tree(100.0, 0.05, 0.0, 0.2, 1.0, 1);
        let (u, d) = (t.up(), t.down());
        let p = t.probability(0, 0, 1);
        let disc = (-0.05_f64).exp();
        let payoff = |s: Real| (100.0 - s).max(0.0);
        let expected = disc * (p * payoff(100.0 * u) + (1.0 - p) * payoff(100.0 * d));
        assert_abs_diff_eq!(price_european(&t, &payoff, disc), expected, epsilon = 1e-12);
        // Exercising immediately is worth nothing at the money.
        assert_abs_diff_eq!(price_american(&t, &payoff, disc), expected, epsilon = 1e-12);
    }

    #[test]
    fn hull_american_put() {
        // S=50, K=50, r=10%, σ=40%, T=5 months; converged value ≈ 4.28.
        let t = tree(50.0, 0.10, 0.0, 0.40, 5.0 / 12.0, 1000);
        let disc = (-0.10 * t.dt()).exp();
        let put = |s: Real| (50.0 - s).max(0.0);
        let american = price_american(&t, &put, disc);
        let european = price_european(&t, &put, disc);
        assert_abs_diff_eq!(american, 4.2836, epsilon = 5e-3);
        assert!(american > european);
    }

    #[test]
    fn american_call_without_dividends_is_european() {
        let t = tree(100.0, 0.05, 0.0, 0.2, 1.0, 500);
        let disc = (-0.05 * t.dt()).exp();
        let call = |s: Real| (s - 100.0).max(0.0);
        assert_abs_diff_eq!(
            price_american(&t, &call, disc),
            price_european(&t, &call, disc),
            epsilon = 1e-10
        );
    }

    #[test]
    fn deep_in_the_money_american_put_is_intrinsic() {
        let t = tree(20.0, 0.05, 0.0, 0.2, 1.0, 200);
        let disc = (-0.05 * t.dt()).exp();
        let put = |s: Real| (100.0 - s).max(0.0);
        assert_abs_diff_eq!(price_american(&t, &put, disc), 80.0, epsilon = 1e-12);
    }
}
