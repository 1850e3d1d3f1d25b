//! Engine settings: base currency, position size, fees and taxes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use versified_core::types::{Currency, FeeSchedule, TaxProfile};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

/// File formats a settings document can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`.toml`).
    Toml,
    /// JSON (`.json`).
    Json,
    /// YAML (`.yaml`, `.yml`).
    Yaml,
}

impl ConfigFormat {
    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Everything the return estimator is configured with.
///
/// All fields are optional in a settings file; missing ones fall back to
/// zero fees, zero taxes, CHF and a notional equal to each bond's face.
///
/// ```toml
/// base_currency = "CHF"
/// notional = 10000
///
/// [fees]
/// custody_fee = 0.002
/// transaction_fee_flat = 25
///
/// [taxes]
/// withholding_rate = 0.35
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Investor base currency.
    pub base_currency: Currency,
    /// Position size in face terms; `None` means one bond's face value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notional: Option<Decimal>,
    /// Fee configuration.
    pub fees: FeeSchedule,
    /// Tax configuration.
    pub taxes: TaxProfile,
}

impl EngineSettings {
    /// Reads settings from a file, picking the parser by extension.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        log::debug!("loading {:?} settings from {}", format, path.display());
        Self::parse(&content, format)
    }

    /// Parses settings from a string.
    pub fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let settings = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(settings)
    }

    /// Renders the settings in the given format.
    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Serialization(e.to_string())),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ConfigError::Serialization(e.to_string()))
            }
        }
    }

    /// Writes the settings to a file, picking the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let rendered = self.render(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}

fn check_fraction(errors: &mut Vec<ValidationError>, field: &str, value: Decimal) {
    if value < Decimal::ZERO || value > Decimal::ONE {
        errors.push(ValidationError::new(
            field,
            format!("must be a fraction between 0 and 1, got {value}"),
        ));
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(notional) = self.notional {
            if notional <= Decimal::ZERO {
                errors.push(ValidationError::new(
                    "notional",
                    format!("must be positive, got {notional}"),
                ));
            }
        }

        let fees = &self.fees;
        check_fraction(&mut errors, "fees.entry_fee", fees.entry_fee);
        check_fraction(&mut errors, "fees.custody_fee", fees.custody_fee);
        check_fraction(&mut errors, "fees.transaction_fee_rate", fees.transaction_fee_rate);
        check_fraction(&mut errors, "fees.fx_fee", fees.fx_fee);
        if fees.transaction_fee_flat < Decimal::ZERO {
            errors.push(ValidationError::new(
                "fees.transaction_fee_flat",
                format!("must not be negative, got {}", fees.transaction_fee_flat),
            ));
        }

        check_fraction(&mut errors, "taxes.withholding_rate", self.taxes.withholding_rate);
        check_fraction(
            &mut errors,
            "taxes.capital_gains_rate",
            self.taxes.capital_gains_rate,
        );

        errors
    }
}
