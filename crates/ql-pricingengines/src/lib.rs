//! # ql-pricingengines
//!
//! Pricing engines and the two calibration solvers built on them.
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`]: Black-Scholes-Merton closed form with analytic Greeks
//! - [`BinomialVanillaEngine`]: binomial lattice with early exercise, Greeks by bumping
//! - [`DiscountingBondEngine`]: discounted cash flows at a flat periodic yield
//!
//! ## Solvers
//!
//! - [`BondYieldSolver`]: yield to maturity from a market price
//! - [`ImpliedVolatilitySolver`]: Black-Scholes volatility from a market price

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod binomial_vanilla_engine;
pub mod bond_yield_solver;
pub mod discounting_bond_engine;
pub mod implied_volatility;

mod results;

pub use analytic_european_engine::{black_scholes_merton, AnalyticEuropeanEngine};
pub use binomial_vanilla_engine::{BinomialSettings, BinomialVanillaEngine};
pub use bond_yield_solver::BondYieldSolver;
pub use discounting_bond_engine::DiscountingBondEngine;
pub use implied_volatility::{option_price_bounds, ImpliedVolatilitySolver};
