//! Withholding and capital gains tax.
//!
//! Withholding is taken from each coupon when it is paid. Capital gains
//! tax is charged once, on the redemption flow, against the gain over the
//! dirty purchase price. Losses are not offset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use versified_core::types::{CashFlow, TaxProfile};

use crate::fees::charge;

/// Taxes for a position and their allocation over the cash flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Withholding per flow, aligned with the input flows.
    pub withholding: Vec<Decimal>,
    /// Gain at redemption before the no-loss-offset floor.
    pub taxable_gain: Decimal,
    /// Capital gains tax charged on the redemption flow.
    pub capital_gains: Decimal,
}

impl TaxBreakdown {
    /// Sum of withholding over all flows.
    #[must_use]
    pub fn total_withholding(&self) -> Decimal {
        self.withholding.iter().copied().sum()
    }

    /// Every tax charged over the life of the position.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.total_withholding() + self.capital_gains
    }
}

/// Inputs the capital gains computation needs besides the flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBasis {
    /// Dirty purchase price of the position.
    pub dirty_price: Decimal,
    /// Accrued interest paid at purchase.
    pub accrued: Decimal,
    /// Transaction fee deducted from the redemption proceeds.
    pub exit_fee: Decimal,
}

/// Applies a [`TaxProfile`] to a position's cash flows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxModel {
    profile: TaxProfile,
}

impl TaxModel {
    /// Creates a tax model for the given profile.
    #[must_use]
    pub fn new(profile: TaxProfile) -> Self {
        Self { profile }
    }

    /// Returns the underlying profile.
    #[must_use]
    pub fn profile(&self) -> &TaxProfile {
        &self.profile
    }

    /// Computes the taxes on a position.
    ///
    /// The taxable gain is the redemption principal net of the exit fee,
    /// less the dirty purchase price, less the accrued interest paid at
    /// purchase when the profile allows deducting it.
    #[must_use]
    pub fn apply(&self, flows: &[CashFlow], basis: CostBasis) -> TaxBreakdown {
        let p = &self.profile;

        let withholding: Vec<Decimal> = flows
            .iter()
            .map(|cf| charge(cf.coupon_amount(), p.withholding_rate))
            .collect();

        let principal: Decimal = flows
            .iter()
            .filter(|cf| cf.is_redemption())
            .map(CashFlow::principal_amount)
            .sum();

        let deductible_accrued = if p.accrued_interest_deductible {
            basis.accrued
        } else {
            Decimal::ZERO
        };
        let taxable_gain = principal - basis.exit_fee - basis.dirty_price - deductible_accrued;
        let capital_gains = charge(taxable_gain.max(Decimal::ZERO), p.capital_gains_rate);

        log::debug!(
            "taxes: withholding {}, gain {}, capital gains tax {}",
            withholding.iter().copied().sum::<Decimal>(),
            taxable_gain,
            capital_gains
        );

        TaxBreakdown {
            withholding,
            taxable_gain,
            capital_gains,
        }
    }
}
