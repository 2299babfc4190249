//! Calculator configuration.
//!
//! A [`CalculatorConfig`] gathers the tunables of every pricer: lattice size,
//! tree variant and bump sizes for American options, and the tolerances and
//! brackets of the two root finders. It can be loaded from TOML; every key is
//! optional and falls back to its default.
//!
//! ```toml
//! [lattice]
//! steps = 2000
//! tree = "tian"
//!
//! [bond_yield]
//! upper = 2.0
//!
//! [implied_volatility]
//! accuracy = 1e-10
//! ```

use ql_core::{Error, Real, Result};
use ql_math::SolverConfig;
use ql_pricingengines::{BinomialSettings, BondYieldSolver, ImpliedVolatilitySolver};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tunables of a [`Calculator`](crate::Calculator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCalculatorConfig")]
pub struct CalculatorConfig {
    /// Binomial lattice used for American options.
    pub lattice: BinomialSettings,
    /// Root finder of the bond yield solver. Default bracket `[-0.99, 10]`.
    pub bond_yield: SolverConfig,
    /// Root finder of the implied volatility solver. Default bracket
    /// `[1e-6, 5]`.
    pub implied_volatility: SolverConfig,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            lattice: BinomialSettings::default(),
            bond_yield: *BondYieldSolver::default().config(),
            implied_volatility: *ImpliedVolatilitySolver::default().config(),
        }
    }
}

impl CalculatorConfig {
    /// Parse and validate a TOML document.
    ///
    /// Unknown keys, malformed values and settings that fail validation are
    /// all `InvalidInput`.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)
            .map_err(|e| Error::InvalidInput(format!("invalid calculator configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!(
                "cannot read calculator configuration {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&document)?;
        debug!(path = %path.display(), ?config, "loaded calculator configuration");
        Ok(config)
    }

    /// Render as a TOML document that [`CalculatorConfig::from_toml_str`]
    /// reads back.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| Error::CalculationFailed(format!("cannot render configuration: {e}")))
    }

    /// Check every section the way the engine constructors do.
    pub fn validate(&self) -> Result<()> {
        self.lattice.validate()?;
        BondYieldSolver::new(self.bond_yield)?;
        ImpliedVolatilitySolver::new(self.implied_volatility)?;
        Ok(())
    }
}

// ── Deserialization ───────────────────────────────────────────────────────────

// Solver sections are merged key by key onto their own defaults: the two
// solvers default to different brackets, so a partial table must not fall
// back to `SolverConfig::default()`.

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawCalculatorConfig {
    lattice: BinomialSettings,
    bond_yield: SolverOverrides,
    implied_volatility: SolverOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SolverOverrides {
    accuracy: Option<Real>,
    root_accuracy: Option<Real>,
    max_iterations: Option<u32>,
    lower: Option<Real>,
    upper: Option<Real>,
}

impl SolverOverrides {
    fn apply(self, base: SolverConfig) -> SolverConfig {
        SolverConfig {
            accuracy: self.accuracy.unwrap_or(base.accuracy),
            root_accuracy: self.root_accuracy.unwrap_or(base.root_accuracy),
            max_iterations: self.max_iterations.unwrap_or(base.max_iterations),
            lower: self.lower.unwrap_or(base.lower),
            upper: self.upper.unwrap_or(base.upper),
        }
    }
}

impl From<RawCalculatorConfig> for CalculatorConfig {
    fn from(raw: RawCalculatorConfig) -> Self {
        let defaults = Self::default();
        Self {
            lattice: raw.lattice,
            bond_yield: raw.bond_yield.apply(defaults.bond_yield),
            implied_volatility: raw.implied_volatility.apply(defaults.implied_volatility),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_methods::TreeKind;

    #[test]
    fn default_brackets() {
        let config = CalculatorConfig::default();
        assert_eq!((config.bond_yield.lower, config.bond_yield.upper), (-0.99, 10.0));
        assert_eq!(
            (config.implied_volatility.lower, config.implied_volatility.upper),
            (1.0e-6, 5.0)
        );
        assert_eq!(config.lattice.steps, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let config = CalculatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, CalculatorConfig::default());
    }

    #[test]
    fn partial_sections_keep_their_own_defaults() {
        let config = CalculatorConfig::from_toml_str(
            r#"
            [lattice]
            steps = 250
            tree = "jarrow_rudd"

            [bond_yield]
            upper = 2.0

            [implied_volatility]
            accuracy = 1e-10
            "#,
        )
        .unwrap();
        assert_eq!(config.lattice.steps, 250);
        assert_eq!(config.lattice.tree, TreeKind::JarrowRudd);
        assert_eq!(config.lattice.spot_bump, 0.01);
        assert_eq!((config.bond_yield.lower, config.bond_yield.upper), (-0.99, 2.0));
        assert_eq!(config.implied_volatility.accuracy, 1.0e-10);
        assert_eq!(config.implied_volatility.lower, 1.0e-6);
        assert_eq!(config.implied_volatility.max_iterations, 100);
    }

    #[test]
    fn renders_and_reads_back() {
        let mut config = CalculatorConfig::default();
        config.lattice.tree = TreeKind::Tian;
        config.bond_yield.max_iterations = 50;
        let document = config.to_toml_string().unwrap();
        assert_eq!(CalculatorConfig::from_toml_str(&document).unwrap(), config);
    }

    #[test]
    fn rejects_bad_documents() {
        for document in [
            "[lattice]\nsteps = 0",
            "[lattice]\ntree = \"trinomial\"",
            "[lattice]\nstepz = 10",
            "[implied_volatility]\nlower = 0.0",
            "[bond_yield]\nlower = 1.0\nupper = 0.5",
            "[bond_yield]\ntolerance = 1e-6",
            "[surface]\npoints = 3",
            "not toml at all",
        ] {
            let err = CalculatorConfig::from_toml_str(document).unwrap_err();
            assert!(err.is_invalid_input(), "{document:?}: {err}");
        }
    }

    #[test]
    fn missing_file_is_invalid_input() {
        let err = CalculatorConfig::from_toml_file("/nonexistent/calculator.toml").unwrap_err();
        assert!(err.is_invalid_input());
    }
}
