//! # ql-time
//!
//! Payment-frequency conventions used to build bond cash-flow schedules.
//!
//! There is no calendar arithmetic: all times are simple
//! annualised year fractions.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Payment / event frequency.
pub mod frequency;

pub use frequency::Frequency;
