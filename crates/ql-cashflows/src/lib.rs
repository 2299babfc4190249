//! # ql-cashflows
//!
//! Cash-flow schedules of fixed-rate bonds and the yield-based analytics
//! built on them: present value, duration, convexity and yield solving.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cashflow;
pub mod cashflows;

pub use cashflow::{CashFlow, CashFlowKind, CashFlowSchedule, MAX_PERIODS};
pub use cashflows::{
    convexity, duration, npv, npv_and_derivative, npv_derivative, yield_rate, Duration,
};
