//! Cash flow type for return estimation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Date;

/// Type of cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowType {
    /// Regular coupon payment
    Coupon,
    /// Principal repayment at maturity, possibly together with the final coupon
    Redemption,
}

impl fmt::Display for CashFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CashFlowType::Coupon => "Coupon",
            CashFlowType::Redemption => "Redemption",
        };
        write!(f, "{name}")
    }
}

/// A dated gross cash flow.
///
/// The coupon and principal components are kept apart because withholding
/// tax only applies to the coupon part of a combined final payment.
///
/// # Example
///
/// ```rust
/// use versified_core::types::{CashFlow, CashFlowType, Date};
/// use rust_decimal_macros::dec;
///
/// let cf = CashFlow::redemption(Date::from_ymd(2030, 6, 15).unwrap(), dec!(20), dec!(1000));
/// assert_eq!(cf.amount(), dec!(1020));
/// assert_eq!(cf.cf_type(), CashFlowType::Redemption);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    date: Date,
    coupon: Decimal,
    principal: Decimal,
    cf_type: CashFlowType,
}

impl CashFlow {
    /// Creates a coupon-only cash flow.
    #[must_use]
    pub fn coupon(date: Date, amount: Decimal) -> Self {
        Self {
            date,
            coupon: amount,
            principal: Decimal::ZERO,
            cf_type: CashFlowType::Coupon,
        }
    }

    /// Creates the terminal redemption, optionally combined with the last coupon.
    #[must_use]
    pub fn redemption(date: Date, coupon: Decimal, principal: Decimal) -> Self {
        Self {
            date,
            coupon,
            principal,
            cf_type: CashFlowType::Redemption,
        }
    }

    /// Returns the payment date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the gross amount (coupon plus principal).
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.coupon + self.principal
    }

    /// Returns the coupon component.
    #[must_use]
    pub fn coupon_amount(&self) -> Decimal {
        self.coupon
    }

    /// Returns the principal component.
    #[must_use]
    pub fn principal_amount(&self) -> Decimal {
        self.principal
    }

    /// Returns the cash flow type.
    #[must_use]
    pub fn cf_type(&self) -> CashFlowType {
        self.cf_type
    }

    /// Returns true if this is the terminal redemption.
    #[must_use]
    pub fn is_redemption(&self) -> bool {
        self.cf_type == CashFlowType::Redemption
    }

    /// Returns a copy with both components multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: Decimal) -> Self {
        Self {
            coupon: self.coupon * factor,
            principal: self.principal * factor,
            ..*self
        }
    }
}

impl fmt::Display for CashFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.date, self.amount(), self.cf_type)
    }
}
