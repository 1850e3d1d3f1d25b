//! Fee schedules and tax profiles.
//!
//! Both are plain caller-supplied configuration. Every field defaults to
//! zero, so an absent setting means "no fee" or "no tax"; the engine never
//! invents a nonzero default.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Costs of buying, holding and selling a bond position.
///
/// Rates are fractions of notional (0.01 for 1%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// One-time fee at purchase.
    pub entry_fee: Decimal,
    /// Custody fee per year held.
    pub custody_fee: Decimal,
    /// Flat transaction fee, charged at purchase and again at sale or redemption.
    pub transaction_fee_flat: Decimal,
    /// Proportional transaction fee, charged at purchase and again at sale or redemption.
    pub transaction_fee_rate: Decimal,
    /// Currency conversion fee, charged when the bond trades outside the base currency.
    pub fx_fee: Decimal,
}

impl FeeSchedule {
    /// A schedule with no fees at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if every fee is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entry_fee.is_zero()
            && self.custody_fee.is_zero()
            && self.transaction_fee_flat.is_zero()
            && self.transaction_fee_rate.is_zero()
            && self.fx_fee.is_zero()
    }

    /// Sets the entry fee.
    #[must_use]
    pub fn with_entry_fee(mut self, rate: Decimal) -> Self {
        self.entry_fee = rate;
        self
    }

    /// Sets the annual custody fee.
    #[must_use]
    pub fn with_custody_fee(mut self, rate: Decimal) -> Self {
        self.custody_fee = rate;
        self
    }

    /// Sets both transaction fee components.
    #[must_use]
    pub fn with_transaction_fee(mut self, flat: Decimal, rate: Decimal) -> Self {
        self.transaction_fee_flat = flat;
        self.transaction_fee_rate = rate;
        self
    }

    /// Sets the FX fee.
    #[must_use]
    pub fn with_fx_fee(mut self, rate: Decimal) -> Self {
        self.fx_fee = rate;
        self
    }

    /// Checks every rate is in [0, 1] and the flat fee is non-negative.
    pub fn validate(&self) -> CoreResult<()> {
        check_fraction("entry_fee", self.entry_fee)?;
        check_fraction("custody_fee", self.custody_fee)?;
        check_fraction("transaction_fee_rate", self.transaction_fee_rate)?;
        check_fraction("fx_fee", self.fx_fee)?;
        if self.transaction_fee_flat < Decimal::ZERO {
            return Err(CoreError::invalid_config(
                "transaction_fee_flat",
                format!("must not be negative, got {}", self.transaction_fee_flat),
            ));
        }
        Ok(())
    }
}

/// Jurisdictional tax treatment of a bond position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxProfile {
    /// Tax withheld from each coupon when paid.
    pub withholding_rate: Decimal,
    /// Tax on the positive gain realized at redemption.
    pub capital_gains_rate: Decimal,
    /// Whether accrued interest paid at purchase reduces the taxable gain.
    pub accrued_interest_deductible: bool,
}

impl TaxProfile {
    /// A profile with no taxes at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if both tax rates are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.withholding_rate.is_zero() && self.capital_gains_rate.is_zero()
    }

    /// Sets the coupon withholding rate.
    #[must_use]
    pub fn with_withholding_rate(mut self, rate: Decimal) -> Self {
        self.withholding_rate = rate;
        self
    }

    /// Sets the capital gains rate.
    #[must_use]
    pub fn with_capital_gains_rate(mut self, rate: Decimal) -> Self {
        self.capital_gains_rate = rate;
        self
    }

    /// Sets whether accrued interest at purchase is deductible.
    #[must_use]
    pub fn with_accrued_interest_deductible(mut self, deductible: bool) -> Self {
        self.accrued_interest_deductible = deductible;
        self
    }

    /// Checks both rates are in [0, 1].
    pub fn validate(&self) -> CoreResult<()> {
        check_fraction("withholding_rate", self.withholding_rate)?;
        check_fraction("capital_gains_rate", self.capital_gains_rate)
    }
}

fn check_fraction(field: &str, value: Decimal) -> CoreResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(CoreError::invalid_config(
            field,
            format!("must be within [0, 1], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_zero() {
        assert!(FeeSchedule::default().is_zero());
        assert!(TaxProfile::default().is_zero());
        assert!(!TaxProfile::default().accrued_interest_deductible);
    }

    #[test]
    fn test_fee_validation() {
        let fees = FeeSchedule::none()
            .with_entry_fee(dec!(0.01))
            .with_custody_fee(dec!(0.002))
            .with_transaction_fee(dec!(25), dec!(0.001))
            .with_fx_fee(dec!(0.0075));
        assert!(fees.validate().is_ok());

        let err = fees.with_entry_fee(dec!(1.5)).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { ref field, .. } if field == "entry_fee"));

        let err = fees.with_transaction_fee(dec!(-1), dec!(0)).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { ref field, .. } if field == "transaction_fee_flat"));
    }

    #[test]
    fn test_tax_validation() {
        assert!(TaxProfile::none().with_withholding_rate(dec!(0.35)).validate().is_ok());
        assert!(TaxProfile::none().with_capital_gains_rate(dec!(-0.1)).validate().is_err());
        assert!(TaxProfile::none().with_capital_gains_rate(dec!(1.01)).validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_defaults_to_zero() {
        let fees: FeeSchedule = serde_json::from_str(r#"{"custody_fee": 0.002}"#).unwrap();
        assert_eq!(fees.custody_fee, dec!(0.002));
        assert!(fees.entry_fee.is_zero());
        assert!(fees.fx_fee.is_zero());
    }
}
