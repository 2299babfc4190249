//! 1D root finding over a monotone scalar objective.
//!
//! Both calibration problems of the engine, the yield of a bond and the
//! implied volatility of an option, reduce to finding the unique root of a
//! monotone function inside a known bracket. [`newton_bisection`] solves them
//! with Newton-Raphson from a caller-supplied guess and falls back to plain
//! bisection over the bracket when Newton leaves the bracket, stalls, or runs
//! out of iterations. [`fd_newton_bisection`] does the same for objectives
//! without an analytic derivative.

use crate::comparison::safe_div;
use ql_core::{ensure, Real, Result};
use tracing::{debug, trace, warn};

/// Consecutive Newton steps allowed without reducing `|f(x)|` before the
/// solver gives up on Newton and bisects.
const MAX_STALLED_STEPS: u32 = 3;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Tolerances, iteration cap and bracket of a root search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Convergence tolerance on `|f(x)|`.
    pub accuracy: Real,
    /// Convergence tolerance on the step / bracket width in `x`.
    pub root_accuracy: Real,
    /// Iteration cap, applied separately to the Newton and bisection phases.
    pub max_iterations: u32,
    /// Lower end of the bracket.
    pub lower: Real,
    /// Upper end of the bracket.
    pub upper: Real,
}

impl SolverConfig {
    /// Default tolerances over the bracket `[lower, upper]`.
    pub fn new(lower: Real, upper: Real) -> Self {
        Self {
            lower,
            upper,
            ..Self::default()
        }
    }

    /// Replace the objective tolerance.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Replace the tolerance on `x`.
    pub fn with_root_accuracy(mut self, root_accuracy: Real) -> Self {
        self.root_accuracy = root_accuracy;
        self
    }

    /// Replace the per-phase iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check that tolerances are positive and the bracket is a finite,
    /// non-empty interval.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.accuracy.is_finite() && self.accuracy > 0.0,
            "solver accuracy must be positive, got {}",
            self.accuracy
        );
        ensure!(
            self.root_accuracy.is_finite() && self.root_accuracy > 0.0,
            "solver root accuracy must be positive, got {}",
            self.root_accuracy
        );
        ensure!(self.max_iterations > 0, "solver needs at least one iteration");
        ensure!(
            self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper,
            "invalid solver bracket [{}, {}]",
            self.lower,
            self.upper
        );
        Ok(())
    }
}

impl Default for SolverConfig {
    /// Tolerance 1e-8 on `f`, 1e-12 on `x`, 100 iterations per phase, over
    /// the unit bracket `[0, 1]`.
    fn default() -> Self {
        Self {
            accuracy: 1.0e-8,
            root_accuracy: 1.0e-12,
            max_iterations: 100,
            lower: 0.0,
            upper: 1.0,
        }
    }
}

// ── Result ────────────────────────────────────────────────────────────────────

/// Outcome of a root search.
///
/// An unconverged search still reports its last estimate; callers turn that
/// into an error with [`SolverResult::root_or_fail`] rather than exposing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// Root estimate.
    pub root: Real,
    /// Iterations spent across both phases.
    pub iterations: u32,
    /// Whether either tolerance was met.
    pub converged: bool,
    /// Whether the bisection fallback was entered.
    pub used_bisection: bool,
}

impl SolverResult {
    /// The root if the search converged, `CalculationFailed` otherwise.
    pub fn root_or_fail(self, what: &str) -> Result<Real> {
        ql_core::ensure_post!(
            self.converged,
            "{what}: solver did not converge after {} iterations (last estimate {})",
            self.iterations,
            self.root
        );
        Ok(self.root)
    }
}

// ── Newton-Raphson with bisection fallback ────────────────────────────────────

/// Find the root of `f` inside `[config.lower, config.upper]`.
///
/// `f_df` returns `(f(x), f'(x))`. Newton-Raphson starts from `guess`
/// (clamped into the bracket). It is abandoned in favour of bisection when
///
/// * a step would leave the bracket, or the derivative is degenerate,
/// * `|f|` fails to decrease for several consecutive steps (oscillation),
/// * `f` evaluates to a non-finite value,
/// * `config.max_iterations` steps pass without convergence.
///
/// Bisection needs `f(lower)` and `f(upper)` to bracket a sign change; if they
/// do not, the returned result is unconverged.
///
/// Fails with `InvalidInput` only when the configuration or guess is unusable.
pub fn newton_bisection<F>(f_df: F, guess: Real, config: &SolverConfig) -> Result<SolverResult>
where
    F: Fn(Real) -> (Real, Real),
{
    config.validate()?;
    ensure!(guess.is_finite(), "solver guess must be finite, got {guess}");

    let (lower, upper) = (config.lower, config.upper);
    let mut x = guess.clamp(lower, upper);
    let mut best = Real::INFINITY;
    let mut stalled = 0;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;
        let (fx, dfx) = f_df(x);
        trace!(iterations, x, fx, dfx, "newton step");

        if !fx.is_finite() {
            break;
        }
        if fx.abs() <= config.accuracy {
            debug!(iterations, root = x, "newton converged");
            return Ok(converged(x, iterations, false));
        }
        if fx.abs() < best {
            best = fx.abs();
            stalled = 0;
        } else {
            stalled += 1;
            if stalled >= MAX_STALLED_STEPS {
                break;
            }
        }

        let Some(step) = safe_div(fx, dfx) else {
            break;
        };
        let x_new = x - step;
        if !(lower..=upper).contains(&x_new) {
            break;
        }
        if step.abs() <= config.root_accuracy {
            debug!(iterations, root = x_new, "newton converged on step size");
            return Ok(converged(x_new, iterations, false));
        }
        x = x_new;
    }

    warn!(
        iterations,
        last = x,
        lower,
        upper,
        "newton-raphson abandoned, falling back to bisection"
    );
    bisect(|x| f_df(x).0, config, iterations)
}

/// [`newton_bisection`] with the derivative estimated by central
/// differences.
///
/// The bump is `relative_bump · max(1, |x|)`.
pub fn fd_newton_bisection<F>(
    f: F,
    guess: Real,
    relative_bump: Real,
    config: &SolverConfig,
) -> Result<SolverResult>
where
    F: Fn(Real) -> Real,
{
    ensure!(
        relative_bump.is_finite() && relative_bump > 0.0,
        "finite-difference bump must be positive, got {relative_bump}"
    );
    newton_bisection(
        |x| {
            let h = relative_bump * x.abs().max(1.0);
            let dfx = (f(x + h) - f(x - h)) / (2.0 * h);
            (f(x), dfx)
        },
        guess,
        config,
    )
}

fn converged(root: Real, iterations: u32, used_bisection: bool) -> SolverResult {
    SolverResult {
        root,
        iterations,
        converged: true,
        used_bisection,
    }
}

fn bisect<F>(f: F, config: &SolverConfig, spent: u32) -> Result<SolverResult>
where
    F: Fn(Real) -> Real,
{
    let mut a = config.lower;
    let mut b = config.upper;
    let fa = f(a);
    let fb = f(b);
    let mut iterations = spent;

    let unconverged = |root: Real, iterations: u32| SolverResult {
        root,
        iterations,
        converged: false,
        used_bisection: true,
    };

    if !fa.is_finite() || !fb.is_finite() {
        warn!(fa, fb, "objective is not finite at the bracket ends");
        return Ok(unconverged(0.5 * (a + b), iterations));
    }
    if fa.abs() <= config.accuracy {
        return Ok(converged(a, iterations, true));
    }
    if fb.abs() <= config.accuracy {
        return Ok(converged(b, iterations, true));
    }
    if fa.signum() == fb.signum() {
        warn!(
            lower = a,
            upper = b,
            fa,
            fb,
            "root is not bracketed, bisection cannot proceed"
        );
        return Ok(unconverged(0.5 * (a + b), iterations));
    }

    let lower_sign = fa.signum();
    let mut mid = 0.5 * (a + b);
    for _ in 0..config.max_iterations {
        iterations += 1;
        mid = 0.5 * (a + b);
        let fm = f(mid);
        trace!(iterations, mid, fm, "bisection step");
        if !fm.is_finite() {
            break;
        }
        if fm.abs() <= config.accuracy || 0.5 * (b - a) < config.root_accuracy {
            debug!(iterations, root = mid, "bisection converged");
            return Ok(converged(mid, iterations, true));
        }
        if fm.signum() == lower_sign {
            a = mid;
        } else {
            b = mid;
        }
    }

    warn!(iterations, last = mid, "bisection exhausted its iterations");
    Ok(unconverged(mid, iterations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn newton_sqrt2() {
        let config = SolverConfig::new(0.0, 2.0).with_accuracy(1e-14);
        let res = newton_bisection(|x| (x * x - 2.0, 2.0 * x), 1.5, &config).unwrap();
        assert!(res.converged);
        assert!(!res.used_bisection);
        assert!(res.iterations < 10, "iterations = {}", res.iterations);
        assert_abs_diff_eq!(res.root, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn guess_outside_bracket_is_clamped() {
        let config = SolverConfig::new(0.0, 4.0);
        let res = newton_bisection(|x| (x * x - 2.0, 2.0 * x), 100.0, &config).unwrap();
        assert!(res.converged);
        assert_abs_diff_eq!(res.root, 2.0_f64.sqrt(), epsilon = 1e-8);
    }

    #[test]
    fn oscillating_newton_falls_back_to_bisection() {
        // Newton from 0 cycles 0 → 1 → 0 on x³ − 2x + 2.
        let config = SolverConfig::new(-3.0, 0.0);
        let res = newton_bisection(
            |x| (x * x * x - 2.0 * x + 2.0, 3.0 * x * x - 2.0),
            0.0,
            &config,
        )
        .unwrap();
        assert!(res.converged);
        assert!(res.used_bisection);
        let root = res.root;
        assert!((root * root * root - 2.0 * root + 2.0).abs() < 1e-8);
        assert_abs_diff_eq!(root, -1.769_292_354_238_631, epsilon = 1e-8);
    }

    #[test]
    fn divergent_newton_falls_back_to_bisection() {
        // Newton on atan diverges from |x0| > 1.39.
        let config = SolverConfig::new(-10.0, 10.0);
        let res = newton_bisection(|x: f64| (x.atan(), 1.0 / (1.0 + x * x)), 1.5, &config).unwrap();
        assert!(res.converged);
        assert!(res.used_bisection);
        assert_abs_diff_eq!(res.root, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn zero_derivative_falls_back_to_bisection() {
        let config = SolverConfig::new(-1.0, 2.0);
        let res = newton_bisection(|x| (x * x * x - 1.0, 3.0 * x * x), 0.0, &config).unwrap();
        assert!(res.converged);
        assert!(res.used_bisection);
        assert_abs_diff_eq!(res.root, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn unbracketed_root_does_not_converge() {
        let config = SolverConfig::new(-1.0, 1.0).with_max_iterations(20);
        let res = newton_bisection(|x| (x * x + 1.0, 2.0 * x), 0.5, &config).unwrap();
        assert!(!res.converged);
        let err = res.root_or_fail("x² + 1").unwrap_err();
        assert!(err.is_calculation_failed());
    }

    #[test]
    fn iteration_cap_is_respected() {
        let config = SolverConfig::new(0.0, 1.0e6)
            .with_accuracy(1e-300)
            .with_root_accuracy(1e-300)
            .with_max_iterations(5);
        let res = newton_bisection(|x| (x - 12_345.678, 1.0e-3), 1.0, &config).unwrap();
        assert!(!res.converged);
        assert!(res.iterations <= 10, "iterations = {}", res.iterations);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let f = |x: f64| (x, 1.0);
        let inverted = SolverConfig::new(1.0, -1.0);
        assert!(newton_bisection(f, 0.0, &inverted).unwrap_err().is_invalid_input());
        let no_iter = SolverConfig::new(-1.0, 1.0).with_max_iterations(0);
        assert!(newton_bisection(f, 0.0, &no_iter).unwrap_err().is_invalid_input());
        let bad_acc = SolverConfig::new(-1.0, 1.0).with_accuracy(0.0);
        assert!(newton_bisection(f, 0.0, &bad_acc).unwrap_err().is_invalid_input());
        let ok = SolverConfig::new(-1.0, 1.0);
        assert!(newton_bisection(f, f64::NAN, &ok).unwrap_err().is_invalid_input());
    }

    #[test]
    fn finite_difference_newton_sin() {
        let config = SolverConfig::new(2.0, 4.0);
        let res = fd_newton_bisection(|x: f64| x.sin(), 3.0, 1e-6, &config).unwrap();
        assert!(res.converged);
        assert_abs_diff_eq!(res.root, std::f64::consts::PI, epsilon = 1e-8);
    }

    #[test]
    fn finite_difference_bump_must_be_positive() {
        let config = SolverConfig::new(2.0, 4.0);
        let err = fd_newton_bisection(|x: f64| x.sin(), 3.0, 0.0, &config).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
