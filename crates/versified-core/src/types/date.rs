//! Date type for financial calculations.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Days per year used when converting calendar days to a year count.
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// A calendar date for financial calculations.
///
/// Newtype over `chrono::NaiveDate` with the month arithmetic used by
/// coupon schedules.
///
/// # Example
///
/// ```rust
/// use versified_core::types::Date;
///
/// let date = Date::from_ymd(2025, 8, 31).unwrap();
/// let earlier = date.add_months(-6).unwrap();
/// assert_eq!(earlier, Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Parses the date formats found in exchange reference data.
    ///
    /// Accepts compact `YYYYMMDD` and `YYYY-MM-DD`, the latter optionally
    /// followed by a time component which is ignored.
    pub fn parse_market(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let parts = if bytes.len() == 8 && bytes.iter().all(u8::is_ascii_digit) {
            (s.get(0..4), s.get(4..6), s.get(6..8))
        } else if bytes.len() >= 10 && bytes[4] == b'-' && bytes[7] == b'-' {
            (s.get(0..4), s.get(5..7), s.get(8..10))
        } else {
            (None, None, None)
        };
        let (Some(year), Some(month), Some(day)) = parts else {
            return Err(CoreError::invalid_date(format!("Unrecognized format: {s}")));
        };

        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
        };
        let year = i32::try_from(parse(year)?)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))?;
        Self::from_ymd(year, parse(month)?, parse(day)?)
    }

    /// Returns today's date.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the number of days in the date's year.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Checks if the date is the end of month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Aug 31 - 6 months),
    /// it rolls back to the last valid day of the month.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        let new_day = self.day().min(max_day);

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years to the date, clamping Feb 29 to Feb 28.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Years from `self` to `other` on an actual/365.25 basis.
    ///
    /// This is the horizon measure used for annualizing returns and for
    /// spreading custody fees; it is deliberately convention-free.
    #[must_use]
    pub fn years_until(&self, other: &Date) -> Decimal {
        Decimal::from(self.days_between(other)) / DAYS_PER_YEAR
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl std::str::FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_market(s)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        let date = Date::from_ymd(2025, 8, 31).unwrap();
        assert_eq!(date.add_months(-6).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(date.add_months(-18).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2025, 9, 30).unwrap());
    }

    #[test]
    fn test_add_months_across_years() {
        let date = Date::from_ymd(2025, 1, 15).unwrap();
        assert_eq!(date.add_months(-1).unwrap(), Date::from_ymd(2024, 12, 15).unwrap());
        assert_eq!(date.add_months(-25).unwrap(), Date::from_ymd(2022, 12, 15).unwrap());
        assert_eq!(date.add_months(12).unwrap(), Date::from_ymd(2026, 1, 15).unwrap());
    }

    #[test]
    fn test_add_years_leap_day() {
        let date = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(date.add_years(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_days_between() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 12, 31).unwrap();
        assert_eq!(start.days_between(&end), 364);
        assert_eq!(end.days_between(&start), -364);
    }

    #[test]
    fn test_years_until() {
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = start.add_days(1461);
        assert_eq!(start.years_until(&end), Decimal::from(4));
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2025-06-15").unwrap();
        assert_eq!(date, Date::from_ymd(2025, 6, 15).unwrap());
        assert!(Date::parse("15/06/2025").is_err());
    }

    #[test]
    fn test_parse_market_formats() {
        let expected = Date::from_ymd(2031, 3, 4).unwrap();
        assert_eq!(Date::parse_market("20310304").unwrap(), expected);
        assert_eq!(Date::parse_market("2031-03-04").unwrap(), expected);
        assert_eq!(Date::parse_market("2031-03-04T00:00:00").unwrap(), expected);
        assert!(Date::parse_market("2031034").is_err());
        assert!(Date::parse_market("20310230").is_err());
        assert!(Date::parse_market("").is_err());
    }

    #[test]
    fn test_parse_market_multibyte() {
        assert!(Date::parse_market("2020-01-0é").is_err());
        assert!(Date::parse_market("2020-01-é1").is_err());
        assert!(Date::parse_market("2020-é-01").is_err());
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2025, 3, 5).unwrap();
        assert_eq!(date.to_string(), "2025-03-05");
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-06-15\"");
        let back: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
