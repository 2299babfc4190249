//! # ql-methods
//!
//! Numerical methods: recombining binomial trees over a Black-Scholes
//! process and backward-induction pricing on them, with or without early
//! exercise.
//!
//! # Modules
//!
//! * [`lattice`]: tree builders (CRR, Jarrow-Rudd, Tian) and rollback

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: binomial trees and backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{price_american, price_european, BinomialTree, BlackScholesProcess, TreeKind};
