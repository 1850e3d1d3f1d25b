//! Error types for return estimation.

use thiserror::Error;
use versified_core::CoreError;

/// A specialized Result type for return estimation.
pub type ReturnsResult<T> = Result<T, ReturnsError>;

/// Errors that can occur while estimating returns.
///
/// All of these are deterministic: the same inputs fail the same way, so
/// there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReturnsError {
    /// Snapshot data is missing, malformed, or cannot be priced.
    #[error("Invalid bond data: {field}: {reason}")]
    InvalidBondData {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Settlement is on or after maturity.
    #[error("Bond has already matured: settlement {settlement} is on or after maturity {maturity}")]
    BondMatured {
        /// Settlement date.
        settlement: String,
        /// Maturity date.
        maturity: String,
    },

    /// A fee, tax or notional setting is out of range.
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An iterative solver did not bracket or converge.
    #[error("Solver failed to converge after {iterations} iterations: {reason}")]
    Convergence {
        /// Number of iterations attempted.
        iterations: u32,
        /// Description of the failure.
        reason: String,
    },
}

impl ReturnsError {
    /// Creates an invalid bond data error.
    #[must_use]
    pub fn invalid_bond_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBondData {
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

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a convergence error.
    #[must_use]
    pub fn convergence(iterations: u32, reason: impl Into<String>) -> Self {
        Self::Convergence {
            iterations,
            reason: reason.into(),
        }
    }

    /// Returns true for the matured-bond terminal condition.
    #[must_use]
    pub fn is_matured(&self) -> bool {
        matches!(self, Self::BondMatured { .. })
    }
}

impl From<CoreError> for ReturnsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidDate { message } => Self::InvalidBondData {
                field: "date".to_string(),
                reason: message,
            },
            CoreError::InvalidBondData { field, reason } => Self::InvalidBondData { field, reason },
            CoreError::BondMatured {
                settlement,
                maturity,
            } => Self::BondMatured {
                settlement,
                maturity,
            },
            CoreError::InvalidConfig { field, reason } => Self::InvalidConfig { field, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReturnsError::invalid_bond_data("clean_price", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid bond data: clean_price: must be positive"
        );

        let err = ReturnsError::bond_matured("2030-06-15", "2030-06-15");
        assert!(err.is_matured());
        assert!(err.to_string().contains("already matured"));
    }

    #[test]
    fn test_from_core_error_keeps_kind() {
        let err: ReturnsError = CoreError::invalid_config("entry_fee", "too big").into();
        assert!(matches!(err, ReturnsError::InvalidConfig { .. }));

        let err: ReturnsError = CoreError::invalid_date("bad").into();
        assert!(matches!(err, ReturnsError::InvalidBondData { ref field, .. } if field == "date"));

        let err: ReturnsError = CoreError::bond_matured("a", "b").into();
        assert!(err.is_matured());
    }
}
