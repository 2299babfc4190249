//! How often a bond pays its coupon.

use ql_core::{Error, Result};
use std::fmt;

/// Coupon payment frequency.
///
/// Only the conventions whose period is a whole number of months are
/// supported, i.e. the divisors of twelve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Frequency {
    /// Once per year.
    Annual = 1,
    /// Twice per year.
    Semiannual = 2,
    /// Every fourth month (three times per year).
    EveryFourthMonth = 3,
    /// Four times per year.
    Quarterly = 4,
    /// Every other month (six times per year).
    Bimonthly = 6,
    /// Twelve times per year.
    Monthly = 12,
}

impl Frequency {
    /// All supported frequencies, from least to most frequent.
    pub const ALL: [Frequency; 6] = [
        Frequency::Annual,
        Frequency::Semiannual,
        Frequency::EveryFourthMonth,
        Frequency::Quarterly,
        Frequency::Bimonthly,
        Frequency::Monthly,
    ];

    /// Convert a raw "payments per year" count.
    ///
    /// Fails with `InvalidInput` for anything that is not a supported
    /// convention (0, negative values, 5, 52, ...).
    pub fn from_periods_per_year(n: i64) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.periods_per_year() as i64 == n)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unsupported payment frequency {n} (expected one of 1, 2, 3, 4, 6, 12)"
                ))
            })
    }

    /// Number of payments per year.
    pub fn periods_per_year(self) -> u32 {
        self as u32
    }
}

impl TryFrom<i64> for Frequency {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self> {
        Self::from_periods_per_year(n)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::EveryFourthMonth => "Every-Fourth-Month",
            Frequency::Quarterly => "Quarterly",
            Frequency::Bimonthly => "Bimonthly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{s}")
    }
}
