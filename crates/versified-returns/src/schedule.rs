//! Coupon schedule reconstruction.
//!
//! Coupon dates are rebuilt from the maturity date alone: the k-th date
//! before maturity is `maturity - k * (12 / frequency)` months, computed
//! directly rather than by repeated stepping, so month-end clamping never
//! drifts (a 31 August maturity keeps paying on the 31st where the month
//! allows it).
//!
//! # Example
//!
//! ```rust
//! use versified_core::prelude::*;
//! use versified_returns::schedule::CouponSchedule;
//! use rust_decimal_macros::dec;
//!
//! let bond = BondSnapshot::builder()
//!     .identifier("CH0012345678")
//!     .currency(Currency::CHF)
//!     .face_value(dec!(1000))
//!     .coupon_rate(dec!(0.04))
//!     .frequency(Frequency::SemiAnnual)
//!     .day_count(DayCountConvention::ActAct)
//!     .issue_date(Date::from_ymd(2023, 6, 15).unwrap())
//!     .maturity_date(Date::from_ymd(2026, 6, 15).unwrap())
//!     .clean_price(dec!(99.5))
//!     .build()
//!     .unwrap();
//!
//! let settlement = Date::from_ymd(2025, 3, 1).unwrap();
//! let schedule = CouponSchedule::build(&bond, settlement).unwrap();
//!
//! assert_eq!(schedule.len(), 3);
//! assert_eq!(schedule.redemption().amount(), dec!(1020));
//! ```

use versified_core::types::{BondSnapshot, CashFlow, Date, Frequency};

use crate::error::{ReturnsError, ReturnsResult};

/// Lazy iterator over a bond's coupon dates, newest first.
///
/// Starts at maturity and walks backward one coupon period at a time,
/// stopping before it would reach the issue date. The iterator is `Clone`,
/// so a schedule can be restarted from any point without recomputation.
#[derive(Debug, Clone)]
pub struct CouponDates {
    maturity: Date,
    issue: Date,
    months_per_period: i32,
    step: i32,
    finished: bool,
}

impl CouponDates {
    /// Creates the iterator for the given date bounds.
    #[must_use]
    pub fn new(issue: Date, maturity: Date, frequency: Frequency) -> Self {
        Self {
            maturity,
            issue,
            months_per_period: frequency.months_per_period() as i32,
            step: 0,
            finished: false,
        }
    }

    /// Creates the iterator for a bond snapshot.
    #[must_use]
    pub fn for_bond(bond: &BondSnapshot) -> Self {
        Self::new(bond.issue_date(), bond.maturity_date(), bond.frequency())
    }
}

impl Iterator for CouponDates {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        if self.finished {
            return None;
        }

        let offset = self.step.checked_mul(self.months_per_period)?;
        match self.maturity.add_months(-offset) {
            Ok(date) if date > self.issue => {
                self.step += 1;
                Some(date)
            }
            _ => {
                self.finished = true;
                None
            }
        }
    }
}

/// The future cash flows of a bond as seen from a settlement date.
///
/// Flows are strictly increasing in date, all strictly after settlement,
/// and the last flow is always the redemption at maturity. The schedule is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponSchedule {
    settlement: Date,
    previous_coupon: Date,
    next_coupon: Date,
    flows: Vec<CashFlow>,
}

impl CouponSchedule {
    /// Builds the schedule of flows still to be received after `settlement`.
    ///
    /// Amounts are per one face value. A zero-coupon bond yields only the
    /// redemption flow. When the last coupon falls on maturity it is merged
    /// into the redemption flow.
    ///
    /// # Errors
    ///
    /// Returns [`ReturnsError::BondMatured`] when settlement is on or after
    /// maturity.
    pub fn build(bond: &BondSnapshot, settlement: Date) -> ReturnsResult<Self> {
        let maturity = bond.maturity_date();
        if settlement >= maturity {
            return Err(ReturnsError::bond_matured(settlement, maturity));
        }

        let mut dates: Vec<Date> = CouponDates::for_bond(bond).collect();
        dates.reverse();

        let previous_coupon = dates
            .iter()
            .copied()
            .filter(|d| *d <= settlement)
            .last()
            .unwrap_or_else(|| bond.issue_date());
        let next_coupon = dates
            .iter()
            .copied()
            .find(|d| *d > settlement)
            .unwrap_or(maturity);

        let coupon = bond.coupon_per_period();
        let zero_coupon = bond.is_zero_coupon();

        let flows: Vec<CashFlow> = dates
            .into_iter()
            .filter(|d| *d > settlement)
            .filter_map(|date| {
                if date == maturity {
                    Some(CashFlow::redemption(date, coupon, bond.face_value()))
                } else if zero_coupon {
                    None
                } else {
                    Some(CashFlow::coupon(date, coupon))
                }
            })
            .collect();

        log::debug!(
            "schedule for {}: {} flows after {}, accrual period {} to {}",
            bond.identifier(),
            flows.len(),
            settlement,
            previous_coupon,
            next_coupon
        );

        Ok(Self {
            settlement,
            previous_coupon,
            next_coupon,
            flows,
        })
    }

    /// Returns the settlement date the schedule was built for.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Last coupon date on or before settlement, or the issue date if no
    /// coupon has been paid yet.
    #[must_use]
    pub fn previous_coupon_date(&self) -> Date {
        self.previous_coupon
    }

    /// First coupon date after settlement.
    #[must_use]
    pub fn next_coupon_date(&self) -> Date {
        self.next_coupon
    }

    /// Returns the maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.redemption().date()
    }

    /// Returns the flows in ascending date order.
    #[must_use]
    pub fn flows(&self) -> &[CashFlow] {
        &self.flows
    }

    /// Returns the terminal redemption flow.
    #[must_use]
    pub fn redemption(&self) -> &CashFlow {
        &self.flows[self.flows.len() - 1]
    }

    /// Number of remaining flows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Returns true if there are no flows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Returns a copy with every amount multiplied by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: rust_decimal::Decimal) -> Self {
        Self {
            flows: self.flows.iter().map(|cf| cf.scaled(factor)).collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use versified_core::daycounts::DayCountConvention;
    use versified_core::types::{CashFlowType, Currency};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn bond(rate: rust_decimal::Decimal, issue: Date, maturity: Date, freq: Frequency) -> BondSnapshot {
        BondSnapshot::builder()
            .identifier("TEST")
            .currency(Currency::CHF)
            .face_value(dec!(1000))
            .coupon_rate(rate)
            .frequency(freq)
            .day_count(DayCountConvention::ActAct)
            .issue_date(issue)
            .maturity_date(maturity)
            .clean_price(dec!(100))
            .build()
            .unwrap()
    }

    #[test]
    fn test_dates_step_back_from_maturity() {
        let dates: Vec<Date> =
            CouponDates::new(d(2024, 1, 10), d(2026, 3, 15), Frequency::SemiAnnual).collect();
        assert_eq!(
            dates,
            vec![
                d(2026, 3, 15),
                d(2025, 9, 15),
                d(2025, 3, 15),
                d(2024, 9, 15),
                d(2024, 3, 15),
            ]
        );
    }

    #[test]
    fn test_dates_exclude_issue_date() {
        let dates: Vec<Date> =
            CouponDates::new(d(2024, 6, 15), d(2026, 6, 15), Frequency::Annual).collect();
        assert_eq!(dates, vec![d(2026, 6, 15), d(2025, 6, 15)]);
    }

    #[test]
    fn test_month_end_does_not_drift() {
        let dates: Vec<Date> =
            CouponDates::new(d(2024, 1, 1), d(2025, 8, 31), Frequency::Quarterly).collect();
        assert_eq!(
            dates,
            vec![
                d(2025, 8, 31),
                d(2025, 5, 31),
                d(2025, 2, 28),
                d(2024, 11, 30),
                d(2024, 8, 31),
                d(2024, 5, 31),
                d(2024, 2, 29),
            ]
        );
    }

    #[test]
    fn test_iterator_is_restartable() {
        let mut dates = CouponDates::new(d(2020, 1, 1), d(2030, 1, 1), Frequency::Annual);
        dates.next();
        let snapshot = dates.clone();
        assert_eq!(dates.count(), snapshot.count());
    }

    #[test]
    fn test_schedule_after_settlement() {
        let b = bond(dec!(0.04), d(2023, 6, 15), d(2026, 6, 15), Frequency::SemiAnnual);
        let schedule = CouponSchedule::build(&b, d(2025, 3, 1)).unwrap();

        let dates: Vec<Date> = schedule.flows().iter().map(CashFlow::date).collect();
        assert_eq!(dates, vec![d(2025, 6, 15), d(2025, 12, 15), d(2026, 6, 15)]);
        assert_eq!(schedule.previous_coupon_date(), d(2024, 12, 15));
        assert_eq!(schedule.next_coupon_date(), d(2025, 6, 15));

        let last = schedule.redemption();
        assert_eq!(last.cf_type(), CashFlowType::Redemption);
        assert_eq!(last.coupon_amount(), dec!(20));
        assert_eq!(last.principal_amount(), dec!(1000));
        assert!(schedule.flows()[..2].iter().all(|cf| cf.amount() == dec!(20)));
    }

    #[test]
    fn test_settlement_on_coupon_date_drops_it() {
        let b = bond(dec!(0.04), d(2023, 6, 15), d(2026, 6, 15), Frequency::SemiAnnual);
        let schedule = CouponSchedule::build(&b, d(2025, 6, 15)).unwrap();
        assert_eq!(schedule.flows()[0].date(), d(2025, 12, 15));
        assert_eq!(schedule.previous_coupon_date(), d(2025, 6, 15));
    }

    #[test]
    fn test_no_coupon_paid_yet_uses_issue_date() {
        let b = bond(dec!(0.04), d(2025, 1, 10), d(2027, 6, 15), Frequency::SemiAnnual);
        let schedule = CouponSchedule::build(&b, d(2025, 2, 1)).unwrap();
        assert_eq!(schedule.previous_coupon_date(), d(2025, 1, 10));
        assert_eq!(schedule.next_coupon_date(), d(2025, 6, 15));
    }

    #[test]
    fn test_zero_coupon_has_only_redemption() {
        let b = bond(dec!(0), d(2020, 1, 1), d(2030, 1, 1), Frequency::Annual);
        let schedule = CouponSchedule::build(&b, d(2025, 1, 1)).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.redemption().coupon_amount(), dec!(0));
        assert_eq!(schedule.redemption().amount(), dec!(1000));
    }

    #[test]
    fn test_matured_bond() {
        let b = bond(dec!(0.04), d(2020, 1, 1), d(2025, 1, 1), Frequency::Annual);
        let err = CouponSchedule::build(&b, d(2025, 1, 1)).unwrap_err();
        assert!(err.is_matured());
        assert!(CouponSchedule::build(&b, d(2026, 1, 1)).unwrap_err().is_matured());
    }

    #[test]
    fn test_dates_strictly_increasing() {
        let b = bond(dec!(0.03), d(2015, 2, 28), d(2035, 8, 31), Frequency::Monthly);
        let schedule = CouponSchedule::build(&b, d(2024, 11, 30)).unwrap();
        assert!(schedule.flows().windows(2).all(|w| w[0].date() < w[1].date()));
        assert!(schedule.flows().iter().all(|cf| cf.date() > d(2024, 11, 30)));
        assert_eq!(schedule.maturity(), d(2035, 8, 31));
    }

    #[test]
    fn test_scaled() {
        let b = bond(dec!(0.04), d(2023, 6, 15), d(2026, 6, 15), Frequency::SemiAnnual);
        let schedule = CouponSchedule::build(&b, d(2025, 3, 1)).unwrap().scaled(dec!(10));
        assert_eq!(schedule.redemption().amount(), dec!(10200));
    }
}
