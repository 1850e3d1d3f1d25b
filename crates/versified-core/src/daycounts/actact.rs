//! Actual/Actual day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/Actual day count convention.
///
/// Accrual uses the period-based (ICMA) rule: actual days elapsed over
/// actual days in the coupon period. Plain year fractions split the
/// interval into leap and non-leap portions (ISDA rule).
///
/// # Formula
///
/// $$\text{Accrual Fraction} = \frac{\text{Days Elapsed}}{\text{Days in Period}}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActAct;

impl DayCount for ActAct {
    fn name(&self) -> &'static str {
        "ACT/ACT"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = Decimal::ZERO;
        let mut current = start;

        while current.year() < end.year() {
            let next_year = current.year() + 1;
            let year_start = Date::from_ymd(next_year, 1, 1).unwrap_or(end);
            let days = current.days_between(&year_start);
            total += Decimal::from(days) / Decimal::from(current.days_in_year());
            current = year_start;
        }

        let days = current.days_between(&end);
        total + Decimal::from(days) / Decimal::from(current.days_in_year())
    }

    fn accrual_fraction(
        &self,
        period_start: Date,
        accrual_end: Date,
        period_end: Date,
        _frequency: Frequency,
    ) -> Decimal {
        let period_days = period_start.days_between(&period_end);
        if period_days <= 0 {
            return Decimal::ZERO;
        }
        Decimal::from(period_start.days_between(&accrual_end)) / Decimal::from(period_days)
    }
}
