//! Partial settings and layered resolution.
//!
//! Settings resolve in increasing priority:
//!
//! 1. built-in defaults
//! 2. a settings file
//! 3. `VERSIFIED_*` environment variables (including a `.env` file)
//! 4. explicit overrides, typically command-line flags
//!
//! Each layer above the defaults is a [`SettingsOverrides`] in which only
//! the fields that were actually given are `Some`.

use rust_decimal::Decimal;
use std::path::PathBuf;

use versified_core::types::{Currency, FeeSchedule, TaxProfile};

use crate::env::EnvVars;
use crate::error::{ConfigResult, Validate};
use crate::settings::EngineSettings;

// =============================================================================
// Override layers
// =============================================================================

/// Fee fields a layer may set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeOverrides {
    /// Entry fee fraction.
    pub entry_fee: Option<Decimal>,
    /// Annual custody fee fraction.
    pub custody_fee: Option<Decimal>,
    /// Flat transaction fee.
    pub transaction_fee_flat: Option<Decimal>,
    /// Proportional transaction fee.
    pub transaction_fee_rate: Option<Decimal>,
    /// FX conversion fee fraction.
    pub fx_fee: Option<Decimal>,
}

impl FeeOverrides {
    /// Returns true when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the set fields into `fees`.
    pub fn apply_to(&self, fees: &mut FeeSchedule) {
        if let Some(v) = self.entry_fee {
            fees.entry_fee = v;
        }
        if let Some(v) = self.custody_fee {
            fees.custody_fee = v;
        }
        if let Some(v) = self.transaction_fee_flat {
            fees.transaction_fee_flat = v;
        }
        if let Some(v) = self.transaction_fee_rate {
            fees.transaction_fee_rate = v;
        }
        if let Some(v) = self.fx_fee {
            fees.fx_fee = v;
        }
    }

    /// Combines two layers, `higher` winning field by field.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            entry_fee: higher.entry_fee.or(self.entry_fee),
            custody_fee: higher.custody_fee.or(self.custody_fee),
            transaction_fee_flat: higher.transaction_fee_flat.or(self.transaction_fee_flat),
            transaction_fee_rate: higher.transaction_fee_rate.or(self.transaction_fee_rate),
            fx_fee: higher.fx_fee.or(self.fx_fee),
        }
    }
}

/// Tax fields a layer may set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxOverrides {
    /// Withholding rate on coupons.
    pub withholding_rate: Option<Decimal>,
    /// Capital gains rate.
    pub capital_gains_rate: Option<Decimal>,
    /// Whether purchased accrued interest reduces the taxable gain.
    pub accrued_interest_deductible: Option<bool>,
}

impl TaxOverrides {
    /// Returns true when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the set fields into `taxes`.
    pub fn apply_to(&self, taxes: &mut TaxProfile) {
        if let Some(v) = self.withholding_rate {
            taxes.withholding_rate = v;
        }
        if let Some(v) = self.capital_gains_rate {
            taxes.capital_gains_rate = v;
        }
        if let Some(v) = self.accrued_interest_deductible {
            taxes.accrued_interest_deductible = v;
        }
    }

    /// Combines two layers, `higher` winning field by field.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            withholding_rate: higher.withholding_rate.or(self.withholding_rate),
            capital_gains_rate: higher.capital_gains_rate.or(self.capital_gains_rate),
            accrued_interest_deductible: higher
                .accrued_interest_deductible
                .or(self.accrued_interest_deductible),
        }
    }
}

/// One layer of partial engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Base currency.
    pub base_currency: Option<Currency>,
    /// Position size.
    pub notional: Option<Decimal>,
    /// Fee fields.
    pub fees: FeeOverrides,
    /// Tax fields.
    pub taxes: TaxOverrides,
}

impl SettingsOverrides {
    /// Returns true when nothing is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the set fields into `settings`.
    pub fn apply_to(&self, settings: &mut EngineSettings) {
        if let Some(ccy) = self.base_currency {
            settings.base_currency = ccy;
        }
        if let Some(notional) = self.notional {
            settings.notional = Some(notional);
        }
        self.fees.apply_to(&mut settings.fees);
        self.taxes.apply_to(&mut settings.taxes);
    }

    /// Combines two layers, `higher` winning field by field.
    #[must_use]
    pub fn merge(self, higher: Self) -> Self {
        Self {
            base_currency: higher.base_currency.or(self.base_currency),
            notional: higher.notional.or(self.notional),
            fees: self.fees.merge(higher.fees),
            taxes: self.taxes.merge(higher.taxes),
        }
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Resolves [`EngineSettings`] from its layers.
///
/// # Example
///
/// ```rust
/// use versified_config::{EnvVars, SettingsLoader, SettingsOverrides};
/// use rust_decimal_macros::dec;
///
/// let env = EnvVars::from_pairs([("VERSIFIED_CUSTODY_FEE", "0.002")]);
/// let mut cli = SettingsOverrides::default();
/// cli.fees.custody_fee = Some(dec!(0.001));
///
/// let settings = SettingsLoader::new().with_env(env).with_overrides(cli).load().unwrap();
/// assert_eq!(settings.fees.custody_fee, dec!(0.001));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    env: Option<EnvVars>,
    overrides: SettingsOverrides,
}

impl SettingsLoader {
    /// Creates a loader with no layers beyond the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a settings file layer.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Adds an environment layer.
    #[must_use]
    pub fn with_env(mut self, env: EnvVars) -> Self {
        self.env = Some(env);
        self
    }

    /// Adds the highest-priority layer.
    #[must_use]
    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        self.overrides = self.overrides.merge(overrides);
        self
    }

    /// Resolves and validates the settings.
    ///
    /// When no file was given explicitly, `VERSIFIED_CONFIG` in the
    /// environment layer names one.
    pub fn load(&self) -> ConfigResult<EngineSettings> {
        let file = self
            .file
            .clone()
            .or_else(|| self.env.as_ref().and_then(EnvVars::config_path));

        let mut settings = match file {
            Some(path) => EngineSettings::from_file(path)?,
            None => EngineSettings::default(),
        };

        if let Some(env) = &self.env {
            env.overrides()?.apply_to(&mut settings);
        }
        self.overrides.apply_to(&mut settings);

        settings.validate_or_error()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_merge_prefers_higher() {
        let low = SettingsOverrides {
            notional: Some(dec!(1000)),
            fees: FeeOverrides {
                entry_fee: Some(dec!(0.01)),
                custody_fee: Some(dec!(0.002)),
                ..FeeOverrides::default()
            },
            ..SettingsOverrides::default()
        };
        let high = SettingsOverrides {
            fees: FeeOverrides {
                custody_fee: Some(dec!(0.001)),
                ..FeeOverrides::default()
            },
            ..SettingsOverrides::default()
        };

        let merged = low.merge(high);
        assert_eq!(merged.notional, Some(dec!(1000)));
        assert_eq!(merged.fees.entry_fee, Some(dec!(0.01)));
        assert_eq!(merged.fees.custody_fee, Some(dec!(0.001)));
    }

    #[test]
    fn test_apply_leaves_unset_fields() {
        let mut settings = EngineSettings {
            fees: FeeSchedule::none().with_fx_fee(dec!(0.005)),
            ..EngineSettings::default()
        };
        let layer = SettingsOverrides {
            base_currency: Some(Currency::USD),
            taxes: TaxOverrides {
                accrued_interest_deductible: Some(true),
                ..TaxOverrides::default()
            },
            ..SettingsOverrides::default()
        };
        layer.apply_to(&mut settings);

        assert_eq!(settings.base_currency, Currency::USD);
        assert_eq!(settings.fees.fx_fee, dec!(0.005));
        assert!(settings.taxes.accrued_interest_deductible);
        assert_eq!(settings.notional, None);
    }

    #[test]
    fn test_empty() {
        assert!(SettingsOverrides::default().is_empty());
        let layer = SettingsOverrides {
            notional: Some(dec!(1)),
            ..SettingsOverrides::default()
        };
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_result() {
        let mut cli = SettingsOverrides::default();
        cli.taxes.capital_gains_rate = Some(dec!(2));
        assert!(SettingsLoader::new().with_overrides(cli).load().is_err());
    }
}
