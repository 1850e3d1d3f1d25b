//! Actual/360 day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{Date, Frequency};

/// Actual/360 day count convention.
///
/// The day count is the actual number of days between dates; the year
/// basis is always 360 days, so a coupon period is `360 / frequency` days.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{360}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn accrual_fraction(
        &self,
        period_start: Date,
        accrual_end: Date,
        _period_end: Date,
        frequency: Frequency,
    ) -> Decimal {
        let days = self.day_count(period_start, accrual_end) * i64::from(frequency.periods_per_year());
        Decimal::from(days) / Decimal::from(360)
    }
}
