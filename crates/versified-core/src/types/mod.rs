//! Core domain types for return estimation.

mod cashflow;
mod costs;
mod currency;
mod date;
mod frequency;
mod snapshot;

pub use cashflow::{CashFlow, CashFlowType};
pub use costs::{FeeSchedule, TaxProfile};
pub use currency::Currency;
pub use date::{Date, DAYS_PER_YEAR};
pub use frequency::Frequency;
pub use snapshot::{BondSnapshot, BondSnapshotBuilder, BondSnapshotRecord};
