//! `VERSIFIED_*` environment variables and `.env` files.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use versified_core::types::Currency;

use crate::error::{ConfigError, ConfigResult};
use crate::overrides::{FeeOverrides, SettingsOverrides, TaxOverrides};

/// Prefix shared by every recognised variable.
pub const ENV_PREFIX: &str = "VERSIFIED_";

/// Path of a settings file.
pub const CONFIG: &str = "VERSIFIED_CONFIG";
/// Investor base currency.
pub const BASE_CURRENCY: &str = "VERSIFIED_BASE_CURRENCY";
/// Position size.
pub const NOTIONAL: &str = "VERSIFIED_NOTIONAL";
/// Entry fee fraction.
pub const ENTRY_FEE: &str = "VERSIFIED_ENTRY_FEE";
/// Annual custody fee fraction.
pub const CUSTODY_FEE: &str = "VERSIFIED_CUSTODY_FEE";
/// Flat transaction fee.
pub const TRANSACTION_FEE_FLAT: &str = "VERSIFIED_TRANSACTION_FEE_FLAT";
/// Proportional transaction fee.
pub const TRANSACTION_FEE_RATE: &str = "VERSIFIED_TRANSACTION_FEE_RATE";
/// FX conversion fee fraction.
pub const FX_FEE: &str = "VERSIFIED_FX_FEE";
/// Coupon withholding rate.
pub const WITHHOLDING_RATE: &str = "VERSIFIED_WITHHOLDING_RATE";
/// Capital gains rate.
pub const CAPITAL_GAINS_RATE: &str = "VERSIFIED_CAPITAL_GAINS_RATE";
/// Accrued-interest deductibility flag.
pub const ACCRUED_DEDUCTIBLE: &str = "VERSIFIED_ACCRUED_DEDUCTIBLE";

/// Parses the lines of a `.env` file into key/value pairs.
///
/// Blank lines, `#` comments and lines without `=` are skipped. The key is
/// everything before the first `=`; one pair of surrounding single or double
/// quotes is stripped from the value.
#[must_use]
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), unquote(value.trim()).to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// A snapshot of the `VERSIFIED_*` variables.
///
/// Reading through a snapshot keeps resolution independent of the live
/// process environment, which tests and embedders can substitute freely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    /// Captures the `VERSIFIED_*` variables of the running process.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars().filter(|(k, _)| k.starts_with(ENV_PREFIX)))
    }

    /// Builds a snapshot from explicit pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Adds entries from `.env` content for keys not already present.
    ///
    /// Variables that are already set always win over the file.
    #[must_use]
    pub fn with_dotenv_str(mut self, content: &str) -> Self {
        for (key, value) in parse_dotenv(content) {
            self.vars.entry(key).or_insert(value);
        }
        self
    }

    /// Adds entries from a `.env` file if it exists.
    ///
    /// A missing file is not an error.
    pub fn with_dotenv(self, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            log::debug!("no .env file at {}", path.display());
            return Ok(self);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(self.with_dotenv_str(&content))
    }

    /// Returns a variable's value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Settings file named by `VERSIFIED_CONFIG`.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> {
        self.get(CONFIG).map(PathBuf::from)
    }

    fn decimal(&self, key: &str) -> ConfigResult<Option<Decimal>> {
        self.get(key)
            .map(|raw| {
                let raw = raw.trim();
                Decimal::from_str(raw)
                    .or_else(|_| Decimal::from_scientific(raw))
                    .map_err(|_| invalid(key, raw))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> ConfigResult<Option<bool>> {
        self.get(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(invalid(key, raw)),
            })
            .transpose()
    }

    /// Interprets the snapshot as a settings layer.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for a variable that does not parse.
    pub fn overrides(&self) -> ConfigResult<SettingsOverrides> {
        let base_currency = self
            .get(BASE_CURRENCY)
            .map(|raw| Currency::from_str(raw).map_err(|_| invalid(BASE_CURRENCY, raw)))
            .transpose()?;

        Ok(SettingsOverrides {
            base_currency,
            notional: self.decimal(NOTIONAL)?,
            fees: FeeOverrides {
                entry_fee: self.decimal(ENTRY_FEE)?,
                custody_fee: self.decimal(CUSTODY_FEE)?,
                transaction_fee_flat: self.decimal(TRANSACTION_FEE_FLAT)?,
                transaction_fee_rate: self.decimal(TRANSACTION_FEE_RATE)?,
                fx_fee: self.decimal(FX_FEE)?,
            },
            taxes: TaxOverrides {
                withholding_rate: self.decimal(WITHHOLDING_RATE)?,
                capital_gains_rate: self.decimal(CAPITAL_GAINS_RATE)?,
                accrued_interest_deductible: self.flag(ACCRUED_DEDUCTIBLE)?,
            },
        })
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
