//! Recombining binomial trees for option pricing.
//!
//! | Variant | Type | Reference |
//! |---|---|---|
//! | [`BinomialTree::cox_ross_rubinstein`] | Equal jumps, `d = 1/u` | Cox, Ross & Rubinstein (1979) |
//! | [`BinomialTree::jarrow_rudd`] | Equal probabilities | Jarrow & Rudd (1983) |
//! | [`BinomialTree::tian`] | Third-moment matching | Tian (1993) |
//!
//! All three are multiplicative: node `(i, j)` holds `x0 · d^(i−j) · u^j`.

use super::process::BlackScholesProcess;
use ql_core::{ensure, ensure_post, Rate, Real, Result, Size, Time, Volatility};
use std::fmt;

/// Largest step count a tree may be built with.
pub const MAX_STEPS: Size = 100_000;

/// Which binomial discretisation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TreeKind {
    /// Cox-Ross-Rubinstein.
    #[default]
    CoxRossRubinstein,
    /// Jarrow-Rudd.
    JarrowRudd,
    /// Tian.
    Tian,
}

impl TreeKind {
    /// Method tag reported with lattice prices, e.g. `"Binomial-CRR"`.
    pub fn method_tag(self) -> &'static str {
        match self {
            TreeKind::CoxRossRubinstein => "Binomial-CRR",
            TreeKind::JarrowRudd => "Binomial-JR",
            TreeKind::Tian => "Binomial-Tian",
        }
    }

    /// Fewest steps over `end` that keep the branch probabilities inside
    /// `[0, 1]` for the given carry `r − q` and volatility.
    ///
    /// CRR needs `σ√Δt > |r − q|·Δt`, i.e. `N > (r − q)²·T/σ²`. Jarrow-Rudd
    /// and Tian are valid at any step count.
    pub fn min_steps(self, carry: Rate, volatility: Volatility, end: Time) -> Size {
        match self {
            TreeKind::CoxRossRubinstein => {
                let bound = (carry / volatility).powi(2) * end;
                if bound.is_finite() {
                    (bound.ceil() as Size).saturating_add(1)
                } else {
                    Size::MAX
                }
            }
            TreeKind::JarrowRudd | TreeKind::Tian => 1,
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::CoxRossRubinstein => write!(f, "CRR"),
            TreeKind::JarrowRudd => write!(f, "JR"),
            TreeKind::Tian => write!(f, "Tian"),
        }
    }
}

/// A recombining binomial tree approximating a [`BlackScholesProcess`].
///
/// The tree has `steps + 1` time layers, with layer `i` having `i + 1` nodes.
/// Node `(i, j)` represents the state after `j` up-moves and `i − j`
/// down-moves. Jump sizes and probabilities are the same at every node.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    x0: Real,
    dt: Time,
    steps: Size,
    up: Real,
    down: Real,
    pu: Real,
    pd: Real,
}

impl BinomialTree {
    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Initial underlying value (spot price).
    pub fn x0(&self) -> Real {
        self.x0
    }

    /// Up-move factor `u`.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down-move factor `d`.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Ratio `u/d` between neighbouring nodes of the same layer.
    pub fn node_ratio(&self) -> Real {
        self.up / self.down
    }

    /// Number of nodes at time step `i` (always `i + 1` for a binomial tree).
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Index of the descendant node at step `i+1` for a given `branch`.
    ///
    /// `branch = 0` → down, `branch = 1` → up.
    pub fn descendant(&self, _i: Size, index: Size, branch: Size) -> Size {
        index + branch
    }

    /// Underlying value at node `(i, index)`.
    pub fn underlying(&self, i: Size, index: Size) -> Real {
        self.x0 * self.down.powi((i - index) as i32) * self.up.powi(index as i32)
    }

    /// Transition probability for `branch` (0 = down, 1 = up).
    pub fn probability(&self, _i: Size, _index: Size, branch: Size) -> Real {
        if branch == 1 {
            self.pu
        } else {
            self.pd
        }
    }

    // ── Named constructors ───────────────────────────────────────────────

    /// Build the tree of the given kind.
    pub fn new(
        kind: TreeKind,
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
    ) -> Result<Self> {
        match kind {
            TreeKind::CoxRossRubinstein => Self::cox_ross_rubinstein(process, end, steps),
            TreeKind::JarrowRudd => Self::jarrow_rudd(process, end, steps),
            TreeKind::Tian => Self::tian(process, end, steps),
        }
    }

    /// Cox-Ross-Rubinstein tree.
    ///
    /// `u = e^(σ√Δt)`, `d = 1/u`, `p = (e^((r−q)Δt) − d)/(u − d)`.
    pub fn cox_ross_rubinstein(
        process: &BlackScholesProcess,
        end: Time,
        steps: Size,
    ) -> Result<Self> {
        let dt = step_length(end, steps)?;
        let up = process.log_variance(dt).sqrt().exp();
        let down = 1.0 / up;
        let growth = (process.carry() * dt).exp();
        let pu = (growth - down) / (up - down);
        Self::checked("CRR", process.x0, dt, steps, up, down, pu)
    }

    /// Jarrow-Rudd tree (equal probabilities).
    ///
    /// `u, d = e^((r−q−σ²/2)Δt ± σ√Δt)`, `p = ½`.
    pub fn jarrow_rudd(process: &BlackScholesProcess, end: Time, steps: Size) -> Result<Self> {
        let dt = step_length(end, steps)?;
        let drift = process.log_drift() * dt;
        let std_dev = process.log_variance(dt).sqrt();
        let up = (drift + std_dev).exp();
        let down = (drift - std_dev).exp();
        Self::checked("JR", process.x0, dt, steps, up, down, 0.5)
    }

    /// Tian tree: matches the first three moments of the log-normal step.
    pub fn tian(process: &BlackScholesProcess, end: Time, steps: Size) -> Result<Self> {
        let dt = step_length(end, steps)?;
        let q = process.log_variance(dt).exp(); // exp(σ²Δt)
        let r_m = (process.carry() * dt).exp(); // exp((r-q)Δt)
        let root = (q * q + 2.0 * q - 3.0).sqrt();
        let up = 0.5 * r_m * q * (q + 1.0 + root);
        let down = 0.5 * r_m * q * (q + 1.0 - root);
        let pu = (r_m - down) / (up - down);
        Self::checked("Tian", process.x0, dt, steps, up, down, pu)
    }

    fn checked(
        name: &str,
        x0: Real,
        dt: Time,
        steps: Size,
        up: Real,
        down: Real,
        pu: Real,
    ) -> Result<Self> {
        ensure_post!(
            up.is_finite() && down.is_finite() && down > 0.0 && up > down,
            "{name}: degenerate jump sizes u = {up}, d = {down} (volatility too small for the step size?)"
        );
        ensure_post!(
            (0.0..=1.0).contains(&pu),
            "{name}: invalid probability {pu} (try more steps)"
        );
        Ok(Self {
            x0,
            dt,
            steps,
            up,
            down,
            pu,
            pd: 1.0 - pu,
        })
    }
}

fn step_length(end: Time, steps: Size) -> Result<Time> {
    ensure!(end.is_finite() && end > 0.0, "tree end time must be positive, got {end}");
    ensure!(
        (1..=MAX_STEPS).contains(&steps),
        "tree steps must be between 1 and {MAX_STEPS}, got {steps}"
    );
    Ok(end / steps as Real)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
