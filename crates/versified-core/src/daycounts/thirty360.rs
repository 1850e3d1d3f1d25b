//! 30/360 US (bond basis) day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::{Date, Frequency};

/// Checks if a date is the last day of February.
#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

/// 30/360 US day count convention (Bond Basis).
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February AND D1 was last day of February, change D2 to 30
/// 4. If D2 is 31 AND D1 is now >= 30, change D2 to 30
///
/// # Formula
///
/// $$\text{Days} = 360 \times (Y_2 - Y_1) + 30 \times (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let y1 = i64::from(start.year());
        let y2 = i64::from(end.year());
        let m1 = i64::from(start.month());
        let m2 = i64::from(end.month());
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let d1_was_feb_eom = is_last_day_of_february(start);

        if d1_was_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if is_last_day_of_february(end) && d1_was_feb_eom {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_full_and_half_year() {
        let dc = Thirty360;
        assert_eq!(dc.day_count(d(2025, 1, 1), d(2026, 1, 1)), 360);
        assert_eq!(dc.year_fraction(d(2025, 1, 1), d(2025, 7, 1)), dec!(0.5));
    }

    #[test]
    fn test_feb_eom_start() {
        // D1 = 30 from the February rule, so D2 = 31 becomes 30
        assert_eq!(Thirty360.day_count(d(2025, 2, 28), d(2025, 3, 31)), 30);
        assert_eq!(Thirty360.day_count(d(2024, 2, 29), d(2024, 3, 31)), 30);
    }

    #[test]
    fn test_feb_to_feb() {
        assert_eq!(Thirty360.day_count(d(2024, 2, 29), d(2025, 2, 28)), 360);
    }

    #[test]
    fn test_d1_31() {
        assert_eq!(Thirty360.day_count(d(2025, 1, 31), d(2025, 3, 31)), 60);
    }

    #[test]
    fn test_d2_31_stays_when_d1_below_30() {
        // 30 * 2 + (31 - 15)
        assert_eq!(Thirty360.day_count(d(2025, 1, 15), d(2025, 3, 31)), 76);
    }

    #[test]
    fn test_corporate_accrued_days() {
        // 7.5% 06/15/2025, settled 04/29/2020: 134 accrued days
        assert_eq!(Thirty360.day_count(d(2019, 12, 15), d(2020, 4, 29)), 134);
    }

    #[test]
    fn test_semiannual_accrual_fraction() {
        let frac = Thirty360.accrual_fraction(
            d(2019, 12, 15),
            d(2020, 4, 29),
            d(2020, 6, 15),
            Frequency::SemiAnnual,
        );
        assert_eq!(frac, dec!(134) / dec!(180));
    }
}
