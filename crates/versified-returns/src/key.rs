//! Deterministic fingerprint of an estimation request.
//!
//! The estimator keeps no cache. Callers that memoize estimates can key
//! them on an [`EstimateKey`], either directly (it is `Hash + Eq`) or by
//! its canonical string form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use versified_core::types::{Currency, Date, FeeSchedule, TaxProfile};

/// Everything an estimate depends on besides the bond's market data.
///
/// Decimal fields compare by value, so `0.0020` and `0.002` produce the
/// same key and the same string.
///
/// # Example
///
/// ```rust
/// use versified_core::prelude::*;
/// use versified_returns::key::EstimateKey;
/// use rust_decimal_macros::dec;
///
/// let key = EstimateKey::new(
///     "CH0012345678",
///     Date::from_ymd(2025, 1, 15).unwrap(),
///     dec!(10000),
///     Currency::CHF,
///     FeeSchedule::none().with_custody_fee(dec!(0.0020)),
///     TaxProfile::none(),
/// );
/// assert_eq!(
///     key.to_string(),
///     "CH0012345678|2025-01-15|10000|CHF|fees=0,0.002,0,0,0|taxes=0,0,false"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimateKey {
    /// Bond identifier.
    pub identifier: String,
    /// Settlement date.
    pub settlement: Date,
    /// Position size in face terms.
    pub notional: Decimal,
    /// Investor base currency.
    pub base_currency: Currency,
    /// Fee configuration.
    pub fees: FeeSchedule,
    /// Tax configuration.
    pub taxes: TaxProfile,
}

impl EstimateKey {
    /// Creates a key.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        settlement: Date,
        notional: Decimal,
        base_currency: Currency,
        fees: FeeSchedule,
        taxes: TaxProfile,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            settlement,
            notional,
            base_currency,
            fees,
            taxes,
        }
    }
}

impl fmt::Display for EstimateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fees = &self.fees;
        let taxes = &self.taxes;
        write!(
            f,
            "{}|{}|{}|{}|fees={},{},{},{},{}|taxes={},{},{}",
            self.identifier,
            self.settlement,
            self.notional.normalize(),
            self.base_currency,
            fees.entry_fee.normalize(),
            fees.custody_fee.normalize(),
            fees.transaction_fee_flat.normalize(),
            fees.transaction_fee_rate.normalize(),
            fees.fx_fee.normalize(),
            taxes.withholding_rate.normalize(),
            taxes.capital_gains_rate.normalize(),
            taxes.accrued_interest_deductible
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn key(custody: Decimal) -> EstimateKey {
        EstimateKey::new(
            "XS0000000001",
            Date::from_ymd(2025, 1, 15).unwrap(),
            dec!(1000),
            Currency::EUR,
            FeeSchedule::none().with_custody_fee(custody),
            TaxProfile::none().with_withholding_rate(dec!(0.35)),
        )
    }

    #[test]
    fn test_equal_values_share_a_key() {
        assert_eq!(key(dec!(0.002)), key(dec!(0.00200)));
        assert_eq!(key(dec!(0.002)).to_string(), key(dec!(0.00200)).to_string());

        let mut cache = HashMap::new();
        cache.insert(key(dec!(0.002)), 1);
        assert_eq!(cache.get(&key(dec!(0.0020))), Some(&1));
    }

    #[test]
    fn test_config_changes_the_key() {
        assert_ne!(key(dec!(0.002)), key(dec!(0.003)));
        assert_ne!(key(dec!(0.002)).to_string(), key(dec!(0.003)).to_string());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            key(dec!(0.002)).to_string(),
            "XS0000000001|2025-01-15|1000|EUR|fees=0,0.002,0,0,0|taxes=0.35,0,false"
        );
    }
}
