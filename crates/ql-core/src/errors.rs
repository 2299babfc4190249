//! Error types for the calculator engine.
//!
//! Every public operation fails with one of two kinds:
//!
//! * [`Error::InvalidInput`]: a parameter lies outside the domain the model
//!   needs. Raised before any floating-point work starts.
//! * [`Error::CalculationFailed`]: a computed value is not finite (or negative
//!   where it cannot be), or an iterative solver ran out of iterations.
//!
//! Pricers raise errors through the `ensure!` (input) and `ensure_post!` /
//! `fail!` (result) macros.

use thiserror::Error;

/// The error type returned by every pricer and solver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A parameter is outside the domain required by the model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A result is non-finite / out of range, or a solver did not converge.
    #[error("calculation failed: {0}")]
    CalculationFailed(String),
}

impl Error {
    /// `true` for [`Error::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// `true` for [`Error::CalculationFailed`].
    pub fn is_calculation_failed(&self) -> bool {
        matches!(self, Error::CalculationFailed(_))
    }

    /// The human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidInput(msg) | Error::CalculationFailed(msg) => msg,
        }
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Input precondition.
///
/// Returns `Err(Error::InvalidInput(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::InvalidInput(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidInput(
                format!($($msg)*)
            ));
        }
    };
}

/// Result postcondition.
///
/// Returns `Err(Error::CalculationFailed(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn halve(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x / 2.0;
///     ensure_post!(result.is_finite(), "result is not finite: {result}");
///     Ok(result)
/// }
/// assert!(halve(1.0).is_ok());
/// assert!(matches!(halve(f64::NAN), Err(Error::CalculationFailed(_))));
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::CalculationFailed(
                format!($($msg)*)
            ));
        }
    };
}

/// Unconditional calculation failure.
///
/// Returns `Err(Error::CalculationFailed(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::CalculationFailed(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_sqrt(x: f64) -> Result<f64> {
        crate::ensure!(x.is_finite(), "x must be finite, got {x}");
        crate::ensure!(x >= 0.0, "x must be non-negative, got {x}");
        let root = x.sqrt();
        crate::ensure_post!(root.is_finite(), "sqrt({x}) is not finite");
        Ok(root)
    }

    #[test]
    fn ensure_maps_to_invalid_input() {
        let err = checked_sqrt(-4.0).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(!err.is_calculation_failed());
        assert_eq!(err.message(), "x must be non-negative, got -4");
    }

    #[test]
    fn fail_maps_to_calculation_failed() {
        fn diverge() -> Result<f64> {
            crate::fail!("no convergence after {} iterations", 100);
        }
        let err = diverge().unwrap_err();
        assert!(err.is_calculation_failed());
        assert_eq!(
            err.to_string(),
            "calculation failed: no convergence after 100 iterations"
        );
    }

    #[test]
    fn display_prefixes_kind() {
        let err = Error::InvalidInput("strike must be positive".into());
        assert_eq!(err.to_string(), "invalid input: strike must be positive");
        assert_eq!(checked_sqrt(9.0), Ok(3.0));
    }
}
