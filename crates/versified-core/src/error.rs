//! Error types for the Versified core crate.
//!
//! Every failure here is a local, deterministic validation failure. None of
//! them are worth retrying; callers are expected to render the message.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A date could not be constructed or parsed.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A bond snapshot field is missing or malformed.
    #[error("Invalid bond data: {field}: {reason}")]
    InvalidBondData {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Settlement falls on or after maturity.
    #[error("Bond has already matured: settlement {settlement} is on or after maturity {maturity}")]
    BondMatured {
        /// Settlement date.
        settlement: String,
        /// Maturity date.
        maturity: String,
    },

    /// A fee or tax setting is outside its allowed range.
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid bond data error.
    #[must_use]
    pub fn invalid_bond_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBondData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::invalid_bond_data(field, "missing")
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a bond matured error.
    #[must_use]
    pub fn bond_matured(settlement: impl ToString, maturity: impl ToString) -> Self {
        Self::BondMatured {
            settlement: settlement.to_string(),
            maturity: maturity.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_bond_matured_message() {
        let err = CoreError::bond_matured("2031-01-01", "2030-06-15");
        let msg = err.to_string();
        assert!(msg.contains("already matured"));
        assert!(msg.contains("2030-06-15"));
    }

    #[test]
    fn test_missing_field() {
        let err = CoreError::missing_field("clean_price");
        assert_eq!(
            err,
            CoreError::InvalidBondData {
                field: "clean_price".into(),
                reason: "missing".into()
            }
        );
    }
}
