//! Fee drag on a bond position.
//!
//! Fees fall into three groups:
//!
//! - **Upfront**: entry fee, purchase transaction fee and FX fee, added to
//!   the purchase cost
//! - **Custody**: charged per year held and spread over the flows, each
//!   flow carrying custody for the time since the previous one
//! - **Exit**: the sale/redemption transaction fee, carried by the
//!   redemption flow

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use versified_core::types::{CashFlow, Currency, Date, FeeSchedule};

/// Fees charged against one cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowFees {
    /// Payment date of the flow.
    pub date: Date,
    /// Custody accrued since the previous flow (or settlement).
    pub custody: Decimal,
    /// Exit transaction fee, nonzero only on the redemption flow.
    pub transaction: Decimal,
}

impl FlowFees {
    /// Total fees charged against the flow.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.custody + self.transaction
    }
}

/// Total fee drag and its allocation over the cash flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// One-time entry fee.
    pub entry: Decimal,
    /// Transaction fee paid at purchase.
    pub entry_transaction: Decimal,
    /// FX conversion fee; zero when trade and base currency agree.
    pub fx: Decimal,
    /// Custody over the whole holding period.
    pub custody: Decimal,
    /// Transaction fee paid at sale or redemption.
    pub exit_transaction: Decimal,
    /// Per-flow allocation, aligned with the input flows.
    pub allocations: Vec<FlowFees>,
}

impl FeeBreakdown {
    /// Fees added to the purchase cost.
    #[must_use]
    pub fn upfront(&self) -> Decimal {
        self.entry + self.entry_transaction + self.fx
    }

    /// Every fee charged over the life of the position.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.upfront() + self.custody + self.exit_transaction
    }

    /// A breakdown with no fees for the given flows.
    #[must_use]
    pub fn none(flows: &[CashFlow]) -> Self {
        Self {
            entry: Decimal::ZERO,
            entry_transaction: Decimal::ZERO,
            fx: Decimal::ZERO,
            custody: Decimal::ZERO,
            exit_transaction: Decimal::ZERO,
            allocations: flows
                .iter()
                .map(|cf| FlowFees {
                    date: cf.date(),
                    custody: Decimal::ZERO,
                    transaction: Decimal::ZERO,
                })
                .collect(),
        }
    }
}

/// Converts a [`FeeSchedule`] into amounts for a concrete position.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeModel {
    schedule: FeeSchedule,
}

impl FeeModel {
    /// Creates a fee model for the given schedule.
    #[must_use]
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Returns the underlying schedule.
    #[must_use]
    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Transaction fee for one trade (flat plus proportional).
    #[must_use]
    pub fn transaction_fee(&self, notional: Decimal) -> Decimal {
        self.schedule.transaction_fee_flat + charge(notional, self.schedule.transaction_fee_rate)
    }

    /// Computes the fee drag for a position.
    ///
    /// # Arguments
    ///
    /// * `flows` - Remaining cash flows, ascending, ending with the redemption
    /// * `settlement` - Purchase settlement date
    /// * `notional` - Position size in face terms
    /// * `trade_currency` - Currency the bond trades in
    /// * `base_currency` - Investor's base currency
    #[must_use]
    pub fn apply(
        &self,
        flows: &[CashFlow],
        settlement: Date,
        notional: Decimal,
        trade_currency: Currency,
        base_currency: Currency,
    ) -> FeeBreakdown {
        let s = &self.schedule;

        let fx = if trade_currency == base_currency {
            Decimal::ZERO
        } else {
            charge(notional, s.fx_fee)
        };
        let trade_fee = self.transaction_fee(notional);

        let mut previous = settlement;
        let mut custody_total = Decimal::ZERO;
        let allocations: Vec<FlowFees> = flows
            .iter()
            .map(|cf| {
                let custody = if s.custody_fee.is_zero() {
                    Decimal::ZERO
                } else {
                    s.custody_fee * notional * previous.years_until(&cf.date())
                };
                previous = cf.date();
                custody_total += custody;
                FlowFees {
                    date: cf.date(),
                    custody,
                    transaction: if cf.is_redemption() {
                        trade_fee
                    } else {
                        Decimal::ZERO
                    },
                }
            })
            .collect();

        let breakdown = FeeBreakdown {
            entry: charge(notional, s.entry_fee),
            entry_transaction: trade_fee,
            fx,
            custody: custody_total,
            exit_transaction: trade_fee,
            allocations,
        };

        log::debug!(
            "fees on notional {}: upfront {}, custody {}, exit {}",
            notional,
            breakdown.upfront(),
            breakdown.custody,
            breakdown.exit_transaction
        );

        breakdown
    }
}

/// `base * rate`, with an exact zero when either side is zero.
pub(crate) fn charge(base: Decimal, rate: Decimal) -> Decimal {
    if base.is_zero() || rate.is_zero() {
        Decimal::ZERO
    } else {
        base * rate
    }
}
