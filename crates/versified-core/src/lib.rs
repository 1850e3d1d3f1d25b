//! # Versified Core
//!
//! Core types and conventions for the Versified bond return engine.
//!
//! This crate provides the building blocks the estimator works on:
//!
//! - **Types**: `Date`, `Currency`, `Frequency`, `CashFlow`, and the validated
//!   `BondSnapshot` consumed from the market-data layer
//! - **Costs**: `FeeSchedule` and `TaxProfile`, caller-supplied and zero by default
//! - **Day Count Conventions**: ACT/ACT, ACT/360 and 30/360 accrual fractions
//!
//! ## Example
//!
//! ```rust
//! use versified_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let fees = FeeSchedule::none().with_custody_fee(dec!(0.002));
//! assert!(fees.validate().is_ok());
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//! let frac = DayCountConvention::Thirty360.accrual_fraction(start, start, end, Frequency::SemiAnnual);
//! assert!(frac.is_zero());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        BondSnapshot, BondSnapshotRecord, CashFlow, CashFlowType, Currency, Date, FeeSchedule,
        Frequency, TaxProfile,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{BondSnapshot, Currency, Date, FeeSchedule, Frequency, TaxProfile};
