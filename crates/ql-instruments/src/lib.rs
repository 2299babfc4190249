//! # ql-instruments
//!
//! Contracts the engine prices: vanilla options with European or American
//! exercise and fixed-rate bullet bonds, plus the result types and the
//! [`PricingEngine`] trait the engines implement.
//!
//! Contracts are validated on construction: every out-of-domain parameter is
//! rejected with `Error::InvalidInput` before a pricer sees it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bond;
pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use bond::BondContract;
pub use exercise::ExerciseType;
pub use instrument::{BondAnalytics, OptionPriceResult, PricingEngine};
pub use option::OptionContract;
pub use payoff::{OptionType, PlainVanillaPayoff};
