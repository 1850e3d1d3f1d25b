//! Three-tier return estimation.
//!
//! One pipeline computes every tier. A tier is just a [`Deductions`] set:
//! the gross tier deducts nothing, the after-fee tier deducts fees, and the
//! after-tax tier deducts fees and taxes. All tiers share the same dates,
//! accrued interest and dirty price.
//!
//! # Metrics
//!
//! For each tier, with `price` the dirty purchase cost plus any upfront
//! fees active in the tier and `years` the actual/365.25 years to maturity:
//!
//! - **Current yield**: coupon income paid within twelve months of
//!   settlement divided by `price`
//! - **Approximate YTM**: `(coupon / years + (redemption - price) / years)
//!   / ((redemption + price) / 2)`, the standard closed-form approximation.
//!   It is not an IRR; see [`crate::curve::solve_yield_to_maturity`] for a
//!   solved figure.
//! - **Holding-period return**: `(sum of flows - price) / price`, reported
//!   both cumulative and divided by `years`
//!
//! # Example
//!
//! ```rust
//! use versified_core::prelude::*;
//! use versified_returns::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let bond = BondSnapshot::builder()
//!     .identifier("CH0012345678")
//!     .currency(Currency::CHF)
//!     .face_value(dec!(1000))
//!     .coupon_rate(dec!(0.04))
//!     .frequency(Frequency::SemiAnnual)
//!     .day_count(DayCountConvention::ActAct)
//!     .issue_date(Date::from_ymd(2022, 3, 1).unwrap())
//!     .maturity_date(Date::from_ymd(2032, 3, 1).unwrap())
//!     .clean_price(dec!(98))
//!     .build()
//!     .unwrap();
//!
//! let estimator = ReturnEstimator::new(
//!     FeeSchedule::none().with_custody_fee(dec!(0.002)),
//!     TaxProfile::none().with_capital_gains_rate(dec!(0.15)),
//! );
//! let estimate = estimator
//!     .estimate(&bond, Date::from_ymd(2024, 3, 1).unwrap())
//!     .unwrap();
//!
//! let yields = estimate.yields();
//! assert!(yields.gross.annualized_return > yields.after_tax.annualized_return);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use versified_core::types::{BondSnapshot, CashFlowType, Currency, Date, FeeSchedule, TaxProfile};

use crate::accrual::{AccrualCalculator, AccruedInterest};
use crate::error::{ReturnsError, ReturnsResult};
use crate::fees::{FeeBreakdown, FeeModel};
use crate::key::EstimateKey;
use crate::schedule::CouponSchedule;
use crate::tax::{CostBasis, TaxBreakdown, TaxModel};

/// Months after settlement whose coupons count toward current yield.
pub const CURRENT_YIELD_HORIZON_MONTHS: i32 = 12;

/// Which costs a tier deducts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Deductions {
    /// Deduct upfront, custody and exit fees.
    pub fees: bool,
    /// Deduct withholding and capital gains tax.
    pub taxes: bool,
}

impl Deductions {
    /// Deduct nothing.
    pub const NONE: Deductions = Deductions {
        fees: false,
        taxes: false,
    };
    /// Deduct fees only.
    pub const FEES: Deductions = Deductions {
        fees: true,
        taxes: false,
    };
    /// Deduct fees and taxes.
    pub const FEES_AND_TAXES: Deductions = Deductions {
        fees: true,
        taxes: true,
    };
}

/// Accounting treatment of a return figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Before any costs.
    Gross,
    /// After fees.
    AfterFees,
    /// After fees and taxes.
    AfterTax,
}

impl Tier {
    /// The deductions this tier applies.
    #[must_use]
    pub fn deductions(&self) -> Deductions {
        match self {
            Tier::Gross => Deductions::NONE,
            Tier::AfterFees => Deductions::FEES,
            Tier::AfterTax => Deductions::FEES_AND_TAXES,
        }
    }

    /// All tiers, from gross to after-tax.
    #[must_use]
    pub fn all() -> &'static [Tier] {
        &[Tier::Gross, Tier::AfterFees, Tier::AfterTax]
    }

    /// Short label for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Gross => "gross",
            Tier::AfterFees => "after fees",
            Tier::AfterTax => "after tax",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One cash flow with the costs a tier deducts from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCashFlow {
    /// Payment date.
    pub date: Date,
    /// Coupon or redemption.
    pub cf_type: CashFlowType,
    /// Coupon before costs.
    pub gross_coupon: Decimal,
    /// Principal before costs.
    pub gross_principal: Decimal,
    /// Custody charged against this flow.
    pub custody_fee: Decimal,
    /// Exit transaction fee charged against this flow.
    pub transaction_fee: Decimal,
    /// Withholding tax on the coupon.
    pub withholding_tax: Decimal,
    /// Capital gains tax charged against this flow.
    pub capital_gains_tax: Decimal,
}

impl TierCashFlow {
    /// Coupon left after withholding and custody; never negative.
    ///
    /// Custody in excess of the net coupon is taken from the principal
    /// proceeds instead.
    #[must_use]
    pub fn coupon_income(&self) -> Decimal {
        (self.net_coupon() - self.custody_fee).max(Decimal::ZERO)
    }

    /// Principal left after exit costs, capital gains tax and any custody
    /// the coupon could not absorb.
    #[must_use]
    pub fn principal_proceeds(&self) -> Decimal {
        let custody_overflow = (self.custody_fee - self.net_coupon()).max(Decimal::ZERO);
        self.gross_principal - self.transaction_fee - self.capital_gains_tax - custody_overflow
    }

    /// Total received on the date after every deduction.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.coupon_income() + self.principal_proceeds()
    }

    /// Total received on the date before any deduction.
    #[must_use]
    pub fn gross_amount(&self) -> Decimal {
        self.gross_coupon + self.gross_principal
    }

    fn net_coupon(&self) -> Decimal {
        self.gross_coupon - self.withholding_tax
    }
}

/// Return figures for one tier. All rates are fractions (0.04 for 4%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMetrics {
    /// Coupon income over the next twelve months per unit of cost.
    pub current_yield: Decimal,
    /// Closed-form yield-to-maturity approximation.
    pub approximate_ytm: Decimal,
    /// Total return over the holding period.
    pub holding_period_return: Decimal,
    /// Holding-period return divided by years to maturity.
    pub annualized_return: Decimal,
}

/// One tier's full result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierResult {
    /// The tier.
    pub tier: Tier,
    /// Purchase cost: dirty price plus upfront fees active in the tier.
    pub purchase_cost: Decimal,
    /// The tier's cash flows.
    pub flows: Vec<TierCashFlow>,
    /// The tier's return figures.
    pub metrics: TierMetrics,
}

impl TierResult {
    /// Sum of the net amounts of every flow.
    #[must_use]
    pub fn total_received(&self) -> Decimal {
        self.flows.iter().map(TierCashFlow::net_amount).sum()
    }

    /// Net proceeds of the final redemption flow.
    #[must_use]
    pub fn redemption_proceeds(&self) -> Decimal {
        self.flows
            .last()
            .map_or(Decimal::ZERO, TierCashFlow::principal_proceeds)
    }
}

/// The three tiers' metrics side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldResult {
    /// No deductions.
    pub gross: TierMetrics,
    /// After fees.
    pub after_fees: TierMetrics,
    /// After fees and taxes.
    pub after_tax: TierMetrics,
}

impl YieldResult {
    /// Metrics for a tier.
    #[must_use]
    pub fn tier(&self, tier: Tier) -> &TierMetrics {
        match tier {
            Tier::Gross => &self.gross,
            Tier::AfterFees => &self.after_fees,
            Tier::AfterTax => &self.after_tax,
        }
    }
}

/// Everything the estimator computed for one bond and settlement date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnEstimate {
    /// Bond identifier.
    pub identifier: String,
    /// Settlement date.
    pub settlement: Date,
    /// Maturity date.
    pub maturity: Date,
    /// Actual/365.25 years from settlement to maturity.
    pub years_to_maturity: Decimal,
    /// Position size in face terms.
    pub notional: Decimal,
    /// Accrued interest for the position.
    pub accrued: AccruedInterest,
    /// Clean purchase price of the position.
    pub clean_amount: Decimal,
    /// Dirty purchase price of the position.
    pub dirty_amount: Decimal,
    /// Fee drag, whether or not a tier applies it.
    pub fees: FeeBreakdown,
    /// Taxes, whether or not a tier applies them.
    pub taxes: TaxBreakdown,
    /// Gross tier.
    pub gross: TierResult,
    /// After-fee tier.
    pub after_fees: TierResult,
    /// After-tax tier.
    pub after_tax: TierResult,
    /// Cache fingerprint of the inputs.
    pub key: EstimateKey,
}

impl ReturnEstimate {
    /// Result for a tier.
    #[must_use]
    pub fn tier(&self, tier: Tier) -> &TierResult {
        match tier {
            Tier::Gross => &self.gross,
            Tier::AfterFees => &self.after_fees,
            Tier::AfterTax => &self.after_tax,
        }
    }

    /// The metrics of all three tiers.
    #[must_use]
    pub fn yields(&self) -> YieldResult {
        YieldResult {
            gross: self.gross.metrics,
            after_fees: self.after_fees.metrics,
            after_tax: self.after_tax.metrics,
        }
    }
}

/// Estimates gross, after-fee and after-tax returns of bond positions.
///
/// The estimator holds only configuration. It is cheap to clone and safe
/// to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnEstimator {
    fees: FeeSchedule,
    taxes: TaxProfile,
    base_currency: Currency,
    notional: Option<Decimal>,
}

impl Default for ReturnEstimator {
    fn default() -> Self {
        Self::new(FeeSchedule::default(), TaxProfile::default())
    }
}

impl ReturnEstimator {
    /// Creates an estimator with the given fee and tax configuration.
    ///
    /// The base currency defaults to CHF and the notional to one bond's
    /// face value.
    #[must_use]
    pub fn new(fees: FeeSchedule, taxes: TaxProfile) -> Self {
        Self {
            fees,
            taxes,
            base_currency: Currency::default(),
            notional: None,
        }
    }

    /// Sets the investor's base currency (drives the FX fee).
    #[must_use]
    pub fn with_base_currency(mut self, currency: Currency) -> Self {
        self.base_currency = currency;
        self
    }

    /// Sets the position size in face terms.
    #[must_use]
    pub fn with_notional(mut self, notional: Decimal) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Returns the fee schedule.
    #[must_use]
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Returns the tax profile.
    #[must_use]
    pub fn taxes(&self) -> &TaxProfile {
        &self.taxes
    }

    /// Returns the base currency.
    #[must_use]
    pub fn base_currency(&self) -> Currency {
        self.base_currency
    }

    /// Checks the fee, tax and notional settings.
    pub fn validate(&self) -> ReturnsResult<()> {
        self.fees.validate()?;
        self.taxes.validate()?;
        if let Some(notional) = self.notional {
            if notional <= Decimal::ZERO {
                return Err(ReturnsError::invalid_config(
                    "notional",
                    format!("must be positive, got {notional}"),
                ));
            }
        }
        Ok(())
    }

    /// Position size for a bond: the configured notional or one face value.
    #[must_use]
    pub fn notional_for(&self, bond: &BondSnapshot) -> Decimal {
        self.notional.unwrap_or_else(|| bond.face_value())
    }

    /// Cache fingerprint for estimating `bond` at `settlement`.
    #[must_use]
    pub fn key(&self, bond: &BondSnapshot, settlement: Date) -> EstimateKey {
        EstimateKey::new(
            bond.identifier(),
            settlement,
            self.notional_for(bond),
            self.base_currency,
            self.fees,
            self.taxes,
        )
    }

    /// Estimates all three tiers for one bond.
    ///
    /// # Errors
    ///
    /// - [`ReturnsError::InvalidConfig`] for out-of-range fees, taxes or notional
    /// - [`ReturnsError::BondMatured`] when settlement is on or after maturity
    /// - [`ReturnsError::InvalidBondData`] when the dirty price or the
    ///   horizon is not positive
    pub fn estimate(&self, bond: &BondSnapshot, settlement: Date) -> ReturnsResult<ReturnEstimate> {
        self.validate()?;

        let base_schedule = CouponSchedule::build(bond, settlement)?;
        let maturity = base_schedule.maturity();
        let years = settlement.years_until(&maturity);
        if years <= Decimal::ZERO {
            return Err(ReturnsError::invalid_bond_data(
                "maturity_date",
                format!("no time left between {settlement} and {maturity}"),
            ));
        }

        let notional = self.notional_for(bond);
        let factor = notional / bond.face_value();
        let schedule = base_schedule.scaled(factor);

        let per_bond = AccrualCalculator::for_schedule(bond, &base_schedule);
        let accrued = AccruedInterest {
            amount: per_bond.amount * factor,
            ..per_bond
        };
        let clean_amount = bond.clean_price_amount() * factor;
        let dirty_amount = clean_amount + accrued.amount;
        if dirty_amount <= Decimal::ZERO {
            return Err(ReturnsError::invalid_bond_data(
                "clean_price",
                format!("dirty price must be positive, got {dirty_amount}"),
            ));
        }

        let fees = FeeModel::new(self.fees).apply(
            schedule.flows(),
            settlement,
            notional,
            bond.currency(),
            self.base_currency,
        );
        let taxes = TaxModel::new(self.taxes).apply(
            schedule.flows(),
            CostBasis {
                dirty_price: dirty_amount,
                accrued: accrued.amount,
                exit_fee: fees.exit_transaction,
            },
        );

        let pipeline = TierPipeline {
            schedule: &schedule,
            dirty_amount,
            years,
            fees: &fees,
            taxes: &taxes,
        };
        let gross = pipeline.run(Tier::Gross);
        let after_fees = pipeline.run(Tier::AfterFees);
        let after_tax = pipeline.run(Tier::AfterTax);

        log::debug!(
            "{} at {}: gross {} / after fees {} / after tax {} annualized over {} years",
            bond.identifier(),
            settlement,
            gross.metrics.annualized_return,
            after_fees.metrics.annualized_return,
            after_tax.metrics.annualized_return,
            years
        );

        Ok(ReturnEstimate {
            identifier: bond.identifier().to_string(),
            settlement,
            maturity,
            years_to_maturity: years,
            notional,
            accrued,
            clean_amount,
            dirty_amount,
            fees,
            taxes,
            gross,
            after_fees,
            after_tax,
            key: self.key(bond, settlement),
        })
    }

    /// Estimates many bonds at the same settlement date.
    ///
    /// Each bond fails or succeeds on its own. With the `parallel` feature
    /// the bonds are estimated on the rayon thread pool.
    #[must_use]
    pub fn estimate_all(
        &self,
        bonds: &[BondSnapshot],
        settlement: Date,
    ) -> Vec<ReturnsResult<ReturnEstimate>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            bonds
                .par_iter()
                .map(|bond| self.estimate(bond, settlement))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            bonds
                .iter()
                .map(|bond| self.estimate(bond, settlement))
                .collect()
        }
    }
}

/// Shared inputs of the per-tier computation.
struct TierPipeline<'a> {
    schedule: &'a CouponSchedule,
    dirty_amount: Decimal,
    years: Decimal,
    fees: &'a FeeBreakdown,
    taxes: &'a TaxBreakdown,
}

impl TierPipeline<'_> {
    fn run(&self, tier: Tier) -> TierResult {
        let deductions = tier.deductions();

        let flows: Vec<TierCashFlow> = self
            .schedule
            .flows()
            .iter()
            .enumerate()
            .map(|(i, cf)| {
                let mut flow = TierCashFlow {
                    date: cf.date(),
                    cf_type: cf.cf_type(),
                    gross_coupon: cf.coupon_amount(),
                    gross_principal: cf.principal_amount(),
                    custody_fee: Decimal::ZERO,
                    transaction_fee: Decimal::ZERO,
                    withholding_tax: Decimal::ZERO,
                    capital_gains_tax: Decimal::ZERO,
                };
                if deductions.fees {
                    if let Some(alloc) = self.fees.allocations.get(i) {
                        flow.custody_fee = alloc.custody;
                        flow.transaction_fee = alloc.transaction;
                    }
                }
                if deductions.taxes {
                    flow.withholding_tax = self
                        .taxes
                        .withholding
                        .get(i)
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    if cf.is_redemption() {
                        flow.capital_gains_tax = self.taxes.capital_gains;
                    }
                }
                flow
            })
            .collect();

        let purchase_cost = if deductions.fees {
            self.dirty_amount + self.fees.upfront()
        } else {
            self.dirty_amount
        };

        let metrics = self.metrics(&flows, purchase_cost);
        TierResult {
            tier,
            purchase_cost,
            flows,
            metrics,
        }
    }

    fn metrics(&self, flows: &[TierCashFlow], price: Decimal) -> TierMetrics {
        let settlement = self.schedule.settlement();
        let horizon = settlement
            .add_months(CURRENT_YIELD_HORIZON_MONTHS)
            .unwrap_or(settlement);

        let next_year_income: Decimal = flows
            .iter()
            .filter(|f| f.date <= horizon)
            .map(TierCashFlow::coupon_income)
            .sum();
        let coupon_income: Decimal = flows.iter().map(TierCashFlow::coupon_income).sum();
        let received: Decimal = flows.iter().map(TierCashFlow::net_amount).sum();
        let redemption = flows
            .last()
            .map_or(Decimal::ZERO, TierCashFlow::principal_proceeds);

        // One year of income; bonds inside the horizon annualize what is left.
        let annual_coupon = if self.schedule.maturity() > horizon {
            next_year_income
        } else {
            coupon_income / self.years
        };
        let pull_to_par = (redemption - price) / self.years;
        let average_price = (redemption + price) / Decimal::TWO;
        let approximate_ytm = if average_price > Decimal::ZERO {
            (annual_coupon + pull_to_par) / average_price
        } else {
            log::warn!("non-positive average price {average_price}, approximate YTM set to zero");
            Decimal::ZERO
        };

        let holding_period_return = (received - price) / price;

        TierMetrics {
            current_yield: next_year_income / price,
            approximate_ytm,
            holding_period_return,
            annualized_return: holding_period_return / self.years,
        }
    }
}
