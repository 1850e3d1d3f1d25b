//! Accrued interest at settlement.
//!
//! Accrued interest is the share of the current coupon that the buyer pays
//! the seller on top of the clean price. It is zero on a coupon date and
//! stays strictly below one coupon payment until the next one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use versified_core::daycounts::DayCountConvention;
use versified_core::types::{BondSnapshot, Date};

use crate::schedule::CouponSchedule;

/// Accrued interest for one settlement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccruedInterest {
    /// Start of the current accrual period.
    pub period_start: Date,
    /// Next coupon date.
    pub period_end: Date,
    /// Fraction of the period's coupon accrued, in [0, 1).
    pub fraction: Decimal,
    /// Accrued amount per one face value.
    pub amount: Decimal,
}

impl AccruedInterest {
    /// No accrued interest.
    #[must_use]
    pub fn zero(period_start: Date, period_end: Date) -> Self {
        Self {
            period_start,
            period_end,
            fraction: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

/// Calculator for accrued interest.
pub struct AccrualCalculator;

impl AccrualCalculator {
    /// Accrued interest at the settlement of a built schedule.
    #[must_use]
    pub fn for_schedule(bond: &BondSnapshot, schedule: &CouponSchedule) -> AccruedInterest {
        Self::calculate(
            bond,
            schedule.settlement(),
            schedule.previous_coupon_date(),
            schedule.next_coupon_date(),
        )
    }

    /// Calculates accrued interest between the last coupon and settlement.
    ///
    /// # Arguments
    ///
    /// * `bond` - The bond snapshot (coupon, frequency, day count)
    /// * `settlement` - Settlement date
    /// * `last_coupon` - Last coupon date, or the issue date if none was paid
    /// * `next_coupon` - Next coupon date
    ///
    /// Settlement on or before `last_coupon` accrues nothing. A 360-day
    /// convention that reaches a full coupon before `next_coupon` falls
    /// back to the actual/actual ratio for the period.
    #[must_use]
    pub fn calculate(
        bond: &BondSnapshot,
        settlement: Date,
        last_coupon: Date,
        next_coupon: Date,
    ) -> AccruedInterest {
        if bond.is_zero_coupon() || settlement <= last_coupon || next_coupon <= last_coupon {
            return AccruedInterest::zero(last_coupon, next_coupon);
        }

        let convention = bond.day_count();
        let frequency = bond.frequency();
        let mut fraction =
            convention.accrual_fraction(last_coupon, settlement, next_coupon, frequency);

        if fraction >= Decimal::ONE && settlement < next_coupon {
            log::warn!(
                "{} accrual for {} reached a full coupon at {}, using ACT/ACT for the period",
                convention,
                bond.identifier(),
                settlement
            );
            fraction = DayCountConvention::ActAct.accrual_fraction(
                last_coupon,
                settlement,
                next_coupon,
                frequency,
            );
        }

        let fraction = fraction.max(Decimal::ZERO);
        let amount = bond.coupon_per_period() * fraction;

        log::debug!(
            "accrued for {} at {}: fraction {} amount {}",
            bond.identifier(),
            settlement,
            fraction,
            amount
        );

        AccruedInterest {
            period_start: last_coupon,
            period_end: next_coupon,
            fraction,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use versified_core::types::{Currency, Frequency};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn bond(day_count: DayCountConvention, rate: Decimal) -> BondSnapshot {
        BondSnapshot::builder()
            .identifier("ACCR")
            .currency(Currency::USD)
            .face_value(dec!(1_000_000))
            .coupon_rate(rate)
            .frequency(Frequency::SemiAnnual)
            .day_count(day_count)
            .issue_date(d(2015, 6, 15))
            .maturity_date(d(2025, 6, 15))
            .clean_price(dec!(101))
            .build()
            .unwrap()
    }

    #[test]
    fn test_accrued_30_360() {
        // Dec 15 to Apr 29 is 134 days on a 30/360 basis, of a 180-day period
        let b = bond(DayCountConvention::Thirty360, dec!(0.075));
        let accrued =
            AccrualCalculator::calculate(&b, d(2020, 4, 29), d(2019, 12, 15), d(2020, 6, 15));

        assert_eq!(accrued.fraction, dec!(268) / dec!(360));
        assert!(accrued.amount > dec!(27916) && accrued.amount < dec!(27917));
    }

    #[test]
    fn test_accrued_act_act() {
        let b = bond(DayCountConvention::ActAct, dec!(0.04));
        let accrued =
            AccrualCalculator::calculate(&b, d(2025, 4, 15), d(2025, 1, 15), d(2025, 7, 15));
        assert_eq!(accrued.fraction, dec!(90) / dec!(181));
        assert_eq!(accrued.amount, dec!(20000) * (dec!(90) / dec!(181)));
    }

    #[test]
    fn test_zero_on_coupon_date() {
        for convention in DayCountConvention::all() {
            let b = bond(*convention, dec!(0.05));
            let accrued =
                AccrualCalculator::calculate(&b, d(2025, 1, 15), d(2025, 1, 15), d(2025, 7, 15));
            assert_eq!(accrued.amount, Decimal::ZERO);
        }
    }

    #[test]
    fn test_below_full_coupon_day_before_payment() {
        for convention in DayCountConvention::all() {
            let b = bond(*convention, dec!(0.05));
            // 31 Jan to 30 Jul 2024 is 181 actual days, past the 180-day ACT/360 period
            let accrued =
                AccrualCalculator::calculate(&b, d(2024, 7, 30), d(2024, 1, 31), d(2024, 7, 31));
            assert!(accrued.amount >= Decimal::ZERO);
            assert!(
                accrued.amount < b.coupon_per_period(),
                "{convention}: {}",
                accrued.amount
            );
        }
    }

    #[test]
    fn test_act360_fallback_matches_act_act() {
        let b = bond(DayCountConvention::Act360, dec!(0.05));
        let accrued =
            AccrualCalculator::calculate(&b, d(2024, 7, 30), d(2024, 1, 31), d(2024, 7, 31));
        assert_eq!(accrued.fraction, dec!(181) / dec!(182));
    }

    #[test]
    fn test_zero_coupon_accrues_nothing() {
        let b = bond(DayCountConvention::ActAct, dec!(0));
        let accrued =
            AccrualCalculator::calculate(&b, d(2025, 4, 15), d(2025, 1, 15), d(2025, 7, 15));
        assert_eq!(accrued.amount, Decimal::ZERO);
    }

    #[test]
    fn test_settlement_before_period_start() {
        let b = bond(DayCountConvention::ActAct, dec!(0.04));
        let accrued =
            AccrualCalculator::calculate(&b, d(2025, 1, 1), d(2025, 1, 15), d(2025, 7, 15));
        assert_eq!(accrued.amount, Decimal::ZERO);
    }

    #[test]
    fn test_for_schedule() {
        let b = bond(DayCountConvention::ActAct, dec!(0.04));
        let schedule = CouponSchedule::build(&b, d(2025, 3, 15)).unwrap();
        let accrued = AccrualCalculator::for_schedule(&b, &schedule);
        assert_eq!(accrued.period_start, d(2024, 12, 15));
        assert_eq!(accrued.period_end, d(2025, 6, 15));
        assert!(accrued.amount > Decimal::ZERO);
    }
}
