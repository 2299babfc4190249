//! # ql-math
//!
//! Mathematical utilities shared by every pricer: the standard normal
//! distribution (CDF via `statrs`), safe division, and
//! the Newton-Raphson root finder with bisection fallback used by the yield
//! and implied-volatility solvers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Guarded division.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::safe_div;
pub use distributions::{normal_cdf, normal_pdf};
pub use solvers1d::{fd_newton_bisection, newton_bisection, SolverConfig, SolverResult};
