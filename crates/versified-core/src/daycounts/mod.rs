//! Day count conventions for accrual calculations.
//!
//! The engine supports a closed set of three conventions:
//!
//! - [`ActAct`]: Actual/Actual - elapsed actual days over actual days in the period
//! - [`Act360`]: Actual/360 - actual days on a 360-day year
//! - [`Thirty360`]: 30/360 (US bond basis) - 30-day months on a 360-day year
//!
//! Each convention implements [`DayCount`], which includes one
//! accrual-fraction function per variant. Callers select a convention at
//! runtime through [`DayCountConvention`] rather than branching themselves.
//!
//! # Usage
//!
//! ```rust
//! use versified_core::daycounts::{DayCount, Thirty360};
//! use versified_core::types::Date;
//!
//! let dc = Thirty360;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 180);
//! ```

mod act360;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use actact::ActAct;
pub use thirty360::Thirty360;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Date, Frequency};

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`); they carry no state.
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Calculates the day count between two dates under this convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Calculates the year fraction between two dates.
    ///
    /// Can be negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Fraction of the coupon period `[period_start, period_end)` that has
    /// accrued by `accrual_end`.
    ///
    /// A coupon period is one `frequency`-th of a year. The fraction is
    /// zero at `period_start`.
    fn accrual_fraction(
        &self,
        period_start: Date,
        accrual_end: Date,
        period_end: Date,
        frequency: Frequency,
    ) -> Decimal;
}

/// Enumeration of the supported day count conventions.
///
/// Serialized by its market name; parsing accepts common aliases.
///
/// # Example
///
/// ```rust
/// use versified_core::daycounts::DayCountConvention;
///
/// let conv: DayCountConvention = "ACT/ACT".parse().unwrap();
/// assert_eq!(conv, DayCountConvention::ActAct);
/// assert_eq!(conv.name(), "ACT/ACT");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCountConvention {
    /// Actual/Actual - government bonds
    #[default]
    ActAct,
    /// Actual/360 - money market style
    Act360,
    /// 30/360 US bond basis - corporates
    Thirty360,
}

impl DayCountConvention {
    /// Returns the implementation for this convention.
    #[must_use]
    pub fn to_day_count(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::ActAct => &ActAct,
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::Thirty360 => &Thirty360,
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.to_day_count().name()
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::ActAct,
            DayCountConvention::Act360,
            DayCountConvention::Thirty360,
        ]
    }

    /// Accrual fraction under this convention. See [`DayCount::accrual_fraction`].
    #[must_use]
    pub fn accrual_fraction(
        &self,
        period_start: Date,
        accrual_end: Date,
        period_end: Date,
        frequency: Frequency,
    ) -> Decimal {
        self.to_day_count()
            .accrual_fraction(period_start, accrual_end, period_end, frequency)
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = DayCountParseError;

    /// Parses a day count convention from a string.
    ///
    /// Supports market names ("ACT/ACT", "30/360"), enum-style names
    /// ("ActAct", "Thirty360") and common aliases ("BOND", "ACTUAL/360").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/ACT" | "ACTUAL/ACTUAL" | "ACT/ACT ICMA" | "ACT/ACT ISDA" | "ACTACT" | "ISMA" => {
                Ok(DayCountConvention::ActAct)
            }
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360" | "30/360US" => {
                Ok(DayCountConvention::Thirty360)
            }
            _ => Err(DayCountParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = DayCountParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(convention: DayCountConvention) -> Self {
        convention.name().to_string()
    }
}

/// Error type for parsing day count conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountParseError(pub String);

impl std::fmt::Display for DayCountParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown day count convention: '{}'", self.0)
    }
}

impl std::error::Error for DayCountParseError {}
