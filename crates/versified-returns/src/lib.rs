//! # Versified Returns
//!
//! Return estimation for bond positions under three accounting treatments.
//!
//! This crate provides:
//!
//! - **Schedules**: coupon dates rebuilt backward from maturity
//! - **Accrual**: accrued interest at settlement under ACT/ACT, ACT/360 or 30/360
//! - **Fees**: entry, custody, transaction and FX fees allocated over the flows
//! - **Taxes**: coupon withholding and capital gains tax at redemption
//! - **Estimation**: current yield, approximate YTM and holding-period return
//!   for the gross, after-fee and after-tax tiers
//! - **Market helpers**: quote selection, lenient number parsing, solved
//!   yields and government spreads
//!
//! Everything here is a pure function of its inputs. No I/O, no shared
//! mutable state; estimators can be shared freely across threads.
//!
//! ## Example
//!
//! ```rust
//! use versified_core::prelude::*;
//! use versified_returns::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let bond = BondSnapshot::builder()
//!     .identifier("CH0012345678")
//!     .currency(Currency::EUR)
//!     .face_value(dec!(1000))
//!     .coupon_rate(dec!(0.025))
//!     .frequency(Frequency::Annual)
//!     .day_count(DayCountConvention::ActAct)
//!     .issue_date(Date::from_ymd(2021, 9, 1).unwrap())
//!     .maturity_date(Date::from_ymd(2029, 9, 1).unwrap())
//!     .clean_price(dec!(96.4))
//!     .build()
//!     .unwrap();
//!
//! let estimate = ReturnEstimator::new(
//!     FeeSchedule::none().with_fx_fee(dec!(0.0075)),
//!     TaxProfile::none().with_withholding_rate(dec!(0.35)),
//! )
//! .with_base_currency(Currency::CHF)
//! .with_notional(dec!(50000))
//! .estimate(&bond, Date::from_ymd(2025, 2, 14).unwrap())
//! .unwrap();
//!
//! for tier in Tier::all() {
//!     let m = estimate.tier(*tier).metrics;
//!     println!("{tier}: {} p.a.", m.annualized_return);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod accrual;
pub mod curve;
pub mod error;
pub mod estimator;
pub mod fees;
pub mod key;
pub mod market;
pub mod schedule;
pub mod solver;
pub mod tax;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accrual::{AccrualCalculator, AccruedInterest};
    pub use crate::curve::{gov_spread_bps, solve_yield_to_maturity, CurvePoint, GovernmentCurve};
    pub use crate::error::{ReturnsError, ReturnsResult};
    pub use crate::estimator::{
        Deductions, ReturnEstimate, ReturnEstimator, Tier, TierCashFlow, TierMetrics, TierResult,
        YieldResult,
    };
    pub use crate::fees::{FeeBreakdown, FeeModel, FlowFees};
    pub use crate::key::EstimateKey;
    pub use crate::market::{parse_number, remaining_years, PriceQuote, PriceSource, SelectedPrice};
    pub use crate::schedule::{CouponDates, CouponSchedule};
    pub use crate::tax::{CostBasis, TaxBreakdown, TaxModel};
}

pub use error::{ReturnsError, ReturnsResult};
pub use estimator::{ReturnEstimate, ReturnEstimator, Tier, YieldResult};
