//! Currency codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// An ISO 4217 currency code.
///
/// Reference data arrives with arbitrary trading currencies, so this is a
/// validated three-letter code rather than a closed enumeration.
///
/// # Example
///
/// ```rust
/// use versified_core::types::Currency;
///
/// let ccy: Currency = "chf".parse().unwrap();
/// assert_eq!(ccy, Currency::CHF);
/// assert_eq!(ccy.code(), "CHF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    /// Swiss Franc
    pub const CHF: Currency = Currency(*b"CHF");
    /// Euro
    pub const EUR: Currency = Currency(*b"EUR");
    /// United States Dollar
    pub const USD: Currency = Currency(*b"USD");
    /// British Pound Sterling
    pub const GBP: Currency = Currency(*b"GBP");

    /// Returns the ISO 4217 3-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Construction only admits ASCII uppercase letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::CHF
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CoreError::invalid_bond_data(
                "currency",
                format!("'{s}' is not a three-letter ISO code"),
            ));
        }
        Ok(Currency([bytes[0], bytes[1], bytes[2]]))
    }
}

impl TryFrom<String> for Currency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert_eq!(" USD ".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("NOK".parse::<Currency>().unwrap().code(), "NOK");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("".parse::<Currency>().is_err());
        assert!("CH".parse::<Currency>().is_err());
        assert!("CHF1".parse::<Currency>().is_err());
        assert!("C1F".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Currency::GBP).unwrap();
        assert_eq!(json, "\"GBP\"");
        let back: Currency = serde_json::from_str("\"gbp\"").unwrap();
        assert_eq!(back, Currency::GBP);
    }
}
