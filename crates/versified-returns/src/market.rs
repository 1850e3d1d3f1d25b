//! Helpers for raw market-data fields.
//!
//! Exchange feeds deliver prices as loosely formatted strings and may omit
//! any of ask, bid or close. These helpers turn such fields into a single
//! usable price before a [`BondSnapshot`](versified_core::BondSnapshot) is
//! built.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use versified_core::types::{Date, DAYS_PER_YEAR};

/// Parses a number that may carry thousands separators ("1,234.5").
///
/// Returns `None` for empty or unparseable input.
#[must_use]
pub fn parse_number(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Years from `today` to `maturity` on an actual/365.25 basis.
///
/// `None` once the bond has reached maturity.
#[must_use]
pub fn remaining_years(maturity: Date, today: Date) -> Option<Decimal> {
    let days = today.days_between(&maturity);
    if days <= 0 {
        return None;
    }
    Some(Decimal::from(days) / DAYS_PER_YEAR)
}

/// Where a selected price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// Midpoint of ask and bid, or the bid alone.
    Mid,
    /// Previous close.
    Close,
    /// Ask only.
    Ask,
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceSource::Mid => "mid",
            PriceSource::Close => "close",
            PriceSource::Ask => "ask",
        };
        write!(f, "{s}")
    }
}

/// A price chosen from a quote, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPrice {
    /// The price, in percent of face.
    pub price: Decimal,
    /// Which quote field it came from.
    pub source: PriceSource,
}

/// Ask, bid and close as quoted; any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceQuote {
    /// Ask price.
    pub ask: Option<Decimal>,
    /// Bid price.
    pub bid: Option<Decimal>,
    /// Previous close.
    pub close: Option<Decimal>,
}

impl PriceQuote {
    /// Creates a quote from already parsed values.
    #[must_use]
    pub fn new(ask: Option<Decimal>, bid: Option<Decimal>, close: Option<Decimal>) -> Self {
        Self { ask, bid, close }
    }

    /// Creates a quote from raw feed strings.
    #[must_use]
    pub fn from_raw(ask: Option<&str>, bid: Option<&str>, close: Option<&str>) -> Self {
        Self {
            ask: ask.and_then(parse_number),
            bid: bid.and_then(parse_number),
            close: close.and_then(parse_number),
        }
    }

    /// Picks the price to evaluate the bond at.
    ///
    /// - no ask and no close: nothing usable
    /// - no positive bid: the close if quoted, else the ask
    /// - otherwise the ask/bid midpoint, or the bid if there is no ask
    #[must_use]
    pub fn select(&self) -> Option<SelectedPrice> {
        if self.ask.is_none() && self.close.is_none() {
            return None;
        }

        match self.bid.filter(|b| *b > Decimal::ZERO) {
            None => self
                .close
                .map(|price| SelectedPrice {
                    price,
                    source: PriceSource::Close,
                })
                .or_else(|| {
                    self.ask.map(|price| SelectedPrice {
                        price,
                        source: PriceSource::Ask,
                    })
                }),
            Some(bid) => {
                let price = match self.ask {
                    Some(ask) => (ask + bid) / Decimal::TWO,
                    None => bid,
                };
                Some(SelectedPrice {
                    price,
                    source: PriceSource::Mid,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234.5"), Some(dec!(1234.5)));
        assert_eq!(parse_number(" 98.75 "), Some(dec!(98.75)));
        assert_eq!(parse_number("-0.25"), Some(dec!(-0.25)));
        assert_eq!(parse_number("1e2"), Some(dec!(100)));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
    }

    #[test]
    fn test_remaining_years() {
        let today = Date::from_ymd(2024, 1, 1).unwrap();
        let maturity = Date::from_ymd(2025, 1, 1).unwrap();
        assert_eq!(remaining_years(maturity, today), Some(dec!(366) / dec!(365.25)));
        assert_eq!(remaining_years(today, today), None);
        assert_eq!(remaining_years(today, maturity), None);
    }

    #[test]
    fn test_select_mid() {
        let quote = PriceQuote::new(Some(dec!(99)), Some(dec!(98)), Some(dec!(97)));
        let selected = quote.select().unwrap();
        assert_eq!(selected.price, dec!(98.5));
        assert_eq!(selected.source, PriceSource::Mid);
    }

    #[test]
    fn test_select_without_bid() {
        let quote = PriceQuote::new(Some(dec!(99)), None, Some(dec!(97)));
        assert_eq!(quote.select().unwrap().source, PriceSource::Close);

        let quote = PriceQuote::new(Some(dec!(99)), Some(dec!(0)), None);
        let selected = quote.select().unwrap();
        assert_eq!(selected.price, dec!(99));
        assert_eq!(selected.source, PriceSource::Ask);
    }

    #[test]
    fn test_select_bid_without_ask() {
        let quote = PriceQuote::new(None, Some(dec!(96)), Some(dec!(97)));
        let selected = quote.select().unwrap();
        assert_eq!(selected.price, dec!(96));
        assert_eq!(selected.source, PriceSource::Mid);
    }

    #[test]
    fn test_select_nothing_usable() {
        assert_eq!(PriceQuote::new(None, Some(dec!(96)), None).select(), None);
        assert_eq!(PriceQuote::default().select(), None);
    }

    #[test]
    fn test_from_raw() {
        let quote = PriceQuote::from_raw(Some("1,001.0"), Some("999"), Some("bad"));
        assert_eq!(quote.ask, Some(dec!(1001)));
        assert_eq!(quote.close, None);
        assert_eq!(quote.select().unwrap().price, dec!(1000));
    }
}
