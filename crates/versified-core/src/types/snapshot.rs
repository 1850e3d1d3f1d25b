//! Bond snapshots as delivered by the market-data layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, Date, Frequency};
use crate::daycounts::DayCountConvention;
use crate::error::{CoreError, CoreResult};

/// An immutable, validated view of a bond at a point in time.
///
/// Every field is required. Construct through [`BondSnapshot::builder`] or
/// by converting a [`BondSnapshotRecord`]; both reject malformed data with
/// `CoreError::InvalidBondData` before any computation can see it.
///
/// # Example
///
/// ```rust
/// use versified_core::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let bond = BondSnapshot::builder()
///     .identifier("CH0012345678")
///     .currency(Currency::CHF)
///     .face_value(dec!(1000))
///     .coupon_rate(dec!(0.0125))
///     .frequency(Frequency::Annual)
///     .day_count(DayCountConvention::Thirty360)
///     .issue_date(Date::from_ymd(2020, 5, 20).unwrap())
///     .maturity_date(Date::from_ymd(2032, 5, 20).unwrap())
///     .clean_price(dec!(97.35))
///     .build()
///     .unwrap();
///
/// assert_eq!(bond.coupon_per_period(), dec!(12.5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondSnapshot {
    identifier: String,
    currency: Currency,
    face_value: Decimal,
    coupon_rate: Decimal,
    #[serde(rename = "coupon_frequency")]
    frequency: Frequency,
    day_count: DayCountConvention,
    issue_date: Date,
    maturity_date: Date,
    clean_price: Decimal,
}

impl BondSnapshot {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> BondSnapshotBuilder {
        BondSnapshotBuilder::default()
    }

    /// Returns the security identifier (ISIN, valor, ...).
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the trading currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the face (redemption) value of one bond.
    #[must_use]
    pub fn face_value(&self) -> Decimal {
        self.face_value
    }

    /// Returns the annual coupon rate as a fraction.
    #[must_use]
    pub fn coupon_rate(&self) -> Decimal {
        self.coupon_rate
    }

    /// Returns the coupon frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the day count convention.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the issue date.
    #[must_use]
    pub fn issue_date(&self) -> Date {
        self.issue_date
    }

    /// Returns the maturity date.
    #[must_use]
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }

    /// Returns the clean price as a percentage of face.
    #[must_use]
    pub fn clean_price(&self) -> Decimal {
        self.clean_price
    }

    /// Returns true for a zero-coupon bond.
    #[must_use]
    pub fn is_zero_coupon(&self) -> bool {
        self.coupon_rate.is_zero()
    }

    /// Coupon amount paid each period per bond.
    #[must_use]
    pub fn coupon_per_period(&self) -> Decimal {
        self.face_value * self.coupon_rate / Decimal::from(self.frequency.periods_per_year())
    }

    /// Annual coupon income per bond.
    #[must_use]
    pub fn annual_coupon(&self) -> Decimal {
        self.face_value * self.coupon_rate
    }

    /// Clean price as an amount per bond.
    #[must_use]
    pub fn clean_price_amount(&self) -> Decimal {
        self.face_value * self.clean_price / Decimal::ONE_HUNDRED
    }
}

/// Builder for [`BondSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct BondSnapshotBuilder {
    identifier: Option<String>,
    currency: Option<Currency>,
    face_value: Option<Decimal>,
    coupon_rate: Option<Decimal>,
    frequency: Option<Frequency>,
    day_count: Option<DayCountConvention>,
    issue_date: Option<Date>,
    maturity_date: Option<Date>,
    clean_price: Option<Decimal>,
}

impl BondSnapshotBuilder {
    /// Sets the identifier.
    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Sets the face value.
    #[must_use]
    pub fn face_value(mut self, face_value: Decimal) -> Self {
        self.face_value = Some(face_value);
        self
    }

    /// Sets the annual coupon rate (fraction, 0.04 for 4%).
    #[must_use]
    pub fn coupon_rate(mut self, rate: Decimal) -> Self {
        self.coupon_rate = Some(rate);
        self
    }

    /// Sets the coupon frequency.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Sets the issue date.
    #[must_use]
    pub fn issue_date(mut self, date: Date) -> Self {
        self.issue_date = Some(date);
        self
    }

    /// Sets the maturity date.
    #[must_use]
    pub fn maturity_date(mut self, date: Date) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Sets the clean price (% of face).
    #[must_use]
    pub fn clean_price(mut self, price: Decimal) -> Self {
        self.clean_price = Some(price);
        self
    }

    /// Validates and builds the snapshot.
    pub fn build(self) -> CoreResult<BondSnapshot> {
        let identifier = self
            .identifier
            .ok_or_else(|| CoreError::missing_field("identifier"))?;
        if identifier.trim().is_empty() {
            return Err(CoreError::invalid_bond_data("identifier", "must not be empty"));
        }

        let face_value = self
            .face_value
            .ok_or_else(|| CoreError::missing_field("face_value"))?;
        if face_value <= Decimal::ZERO {
            return Err(CoreError::invalid_bond_data(
                "face_value",
                format!("must be positive, got {face_value}"),
            ));
        }

        let coupon_rate = self
            .coupon_rate
            .ok_or_else(|| CoreError::missing_field("coupon_rate"))?;
        if coupon_rate < Decimal::ZERO || coupon_rate > Decimal::ONE {
            return Err(CoreError::invalid_bond_data(
                "coupon_rate",
                format!("must be a fraction in [0, 1], got {coupon_rate}"),
            ));
        }

        let clean_price = self
            .clean_price
            .ok_or_else(|| CoreError::missing_field("clean_price"))?;
        if clean_price <= Decimal::ZERO {
            return Err(CoreError::invalid_bond_data(
                "clean_price",
                format!("must be positive, got {clean_price}"),
            ));
        }

        let issue_date = self
            .issue_date
            .ok_or_else(|| CoreError::missing_field("issue_date"))?;
        let maturity_date = self
            .maturity_date
            .ok_or_else(|| CoreError::missing_field("maturity_date"))?;
        if maturity_date <= issue_date {
            return Err(CoreError::invalid_bond_data(
                "maturity_date",
                format!("{maturity_date} is not after issue date {issue_date}"),
            ));
        }

        Ok(BondSnapshot {
            identifier,
            currency: self.currency.ok_or_else(|| CoreError::missing_field("currency"))?,
            face_value,
            coupon_rate,
            frequency: self
                .frequency
                .ok_or_else(|| CoreError::missing_field("coupon_frequency"))?,
            day_count: self
                .day_count
                .ok_or_else(|| CoreError::missing_field("day_count"))?,
            issue_date,
            maturity_date,
            clean_price,
        })
    }
}

/// Unvalidated snapshot as it arrives over the wire.
///
/// All fields are optional so that a missing field surfaces as a named
/// `InvalidBondData` error rather than an opaque deserialization failure.
/// Dates accept both `YYYY-MM-DD` and `YYYYMMDD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondSnapshotRecord {
    /// Security identifier.
    pub identifier: Option<String>,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Face value per bond.
    pub face_value: Option<Decimal>,
    /// Annual coupon rate as a fraction.
    pub coupon_rate: Option<Decimal>,
    /// Payments per year.
    pub coupon_frequency: Option<u32>,
    /// Day count name, e.g. "ACT/ACT".
    pub day_count: Option<String>,
    /// Issue date.
    pub issue_date: Option<String>,
    /// Maturity date.
    pub maturity_date: Option<String>,
    /// Clean price in percent of face.
    pub clean_price: Option<Decimal>,
}

impl TryFrom<BondSnapshotRecord> for BondSnapshot {
    type Error = CoreError;

    fn try_from(record: BondSnapshotRecord) -> Result<Self, Self::Error> {
        fn date(field: &str, value: Option<String>) -> CoreResult<Option<Date>> {
            value
                .map(|s| {
                    Date::parse_market(&s)
                        .map_err(|_| CoreError::invalid_bond_data(field, format!("bad date '{s}'")))
                })
                .transpose()
        }

        let mut builder = BondSnapshot::builder();
        if let Some(identifier) = record.identifier {
            builder = builder.identifier(identifier);
        }
        if let Some(ccy) = record.currency {
            builder = builder.currency(ccy.parse()?);
        }
        if let Some(face) = record.face_value {
            builder = builder.face_value(face);
        }
        if let Some(rate) = record.coupon_rate {
            builder = builder.coupon_rate(rate);
        }
        if let Some(freq) = record.coupon_frequency {
            builder = builder.frequency(Frequency::try_from(freq)?);
        }
        if let Some(dc) = record.day_count {
            let convention = dc
                .parse::<DayCountConvention>()
                .map_err(|e| CoreError::invalid_bond_data("day_count", e.to_string()))?;
            builder = builder.day_count(convention);
        }
        if let Some(issue) = date("issue_date", record.issue_date)? {
            builder = builder.issue_date(issue);
        }
        if let Some(maturity) = date("maturity_date", record.maturity_date)? {
            builder = builder.maturity_date(maturity);
        }
        if let Some(price) = record.clean_price {
            builder = builder.clean_price(price);
        }
        builder.build()
    }
}

impl<'de> Deserialize<'de> for BondSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let record = BondSnapshotRecord::deserialize(deserializer)?;
        BondSnapshot::try_from(record).map_err(serde::de::Error::custom)
    }
}

impl From<&BondSnapshot> for BondSnapshotRecord {
    fn from(bond: &BondSnapshot) -> Self {
        Self {
            identifier: Some(bond.identifier.clone()),
            currency: Some(bond.currency.to_string()),
            face_value: Some(bond.face_value),
            coupon_rate: Some(bond.coupon_rate),
            coupon_frequency: Some(bond.frequency.periods_per_year()),
            day_count: Some(bond.day_count.name().to_string()),
            issue_date: Some(bond.issue_date.to_string()),
            maturity_date: Some(bond.maturity_date.to_string()),
            clean_price: Some(bond.clean_price),
        }
    }
}
