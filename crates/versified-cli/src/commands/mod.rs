//! CLI command implementations.

pub mod config;
pub mod estimate;
pub mod schedule;
pub mod spread;

pub use config::ConfigArgs;
pub use estimate::EstimateArgs;
pub use schedule::ScheduleArgs;
pub use spread::SpreadArgs;

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use versified_config::{
    EngineSettings, EnvVars, FeeOverrides, SettingsLoader, SettingsOverrides, TaxOverrides,
};
use versified_core::types::{BondSnapshot, Currency, Date};
use versified_returns::{ReturnEstimator, Tier};

use crate::error::{CliError, CliResult};

/// `.env` file read from the working directory.
const DOTENV_FILE: &str = ".env";

/// Parses a date in `YYYY-MM-DD` or `YYYYMMDD` form.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse_market(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Parses an optional settlement date, defaulting to today.
pub fn settlement_or_today(s: Option<&str>) -> CliResult<Date> {
    s.map_or_else(|| Ok(Date::today()), parse_date)
}

/// Location of the user-level settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("versified").join("settings.toml"))
}

/// Reads bonds from a JSON (object or array) or CSV file.
pub fn load_bonds(path: &Path) -> CliResult<Vec<BondSnapshot>> {
    let bond_file = |message: String| CliError::BondFile {
        path: path.to_path_buf(),
        message,
    };

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let bonds = if is_csv {
        let mut reader = csv::Reader::from_path(path).map_err(|e| bond_file(e.to_string()))?;
        reader
            .deserialize::<BondSnapshot>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| bond_file(e.to_string()))?
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| bond_file(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| bond_file(e.to_string()))?;
        if value.is_array() {
            serde_json::from_value(value).map_err(|e| bond_file(e.to_string()))?
        } else {
            vec![serde_json::from_value(value).map_err(|e| bond_file(e.to_string()))?]
        }
    };

    if bonds.is_empty() {
        return Err(bond_file("no bonds in file".to_string()));
    }
    tracing::info!(count = bonds.len(), path = %path.display(), "loaded bonds");
    Ok(bonds)
}

/// Picks one bond by identifier, or the first one.
pub fn select_bond(bonds: Vec<BondSnapshot>, id: Option<&str>) -> CliResult<BondSnapshot> {
    match id {
        Some(id) => bonds
            .into_iter()
            .find(|b| b.identifier() == id)
            .ok_or_else(|| CliError::BondNotFound(id.to_string())),
        None => bonds
            .into_iter()
            .next()
            .ok_or_else(|| CliError::BondNotFound("file is empty".to_string())),
    }
}

/// Builds the estimator described by `settings`.
pub fn estimator(settings: &EngineSettings) -> ReturnEstimator {
    let estimator = ReturnEstimator::new(settings.fees, settings.taxes)
        .with_base_currency(settings.base_currency);
    match settings.notional {
        Some(notional) => estimator.with_notional(notional),
        None => estimator,
    }
}

/// Tier selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    /// No deductions
    Gross,
    /// Fees deducted
    AfterFees,
    /// Fees and taxes deducted
    AfterTax,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Gross => Tier::Gross,
            TierArg::AfterFees => Tier::AfterFees,
            TierArg::AfterTax => Tier::AfterTax,
        }
    }
}

/// Settings flags shared by every command.
///
/// Flags override `VERSIFIED_*` environment variables, which override the
/// settings file.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Settings file (TOML, JSON or YAML)
    #[arg(long, env = "VERSIFIED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Investor base currency (ISO code)
    #[arg(long)]
    pub base_currency: Option<Currency>,

    /// Position size in face terms (default: one bond's face value)
    #[arg(long)]
    pub notional: Option<Decimal>,

    /// Entry fee as a fraction of the dirty amount
    #[arg(long)]
    pub entry_fee: Option<Decimal>,

    /// Annual custody fee as a fraction of the notional
    #[arg(long)]
    pub custody_fee: Option<Decimal>,

    /// Flat transaction fee per trade
    #[arg(long)]
    pub transaction_fee_flat: Option<Decimal>,

    /// Proportional transaction fee per trade
    #[arg(long)]
    pub transaction_fee_rate: Option<Decimal>,

    /// FX conversion fee, charged when the bond is not in the base currency
    #[arg(long)]
    pub fx_fee: Option<Decimal>,

    /// Withholding tax rate on coupons
    #[arg(long)]
    pub withholding_rate: Option<Decimal>,

    /// Capital gains tax rate
    #[arg(long)]
    pub capital_gains_rate: Option<Decimal>,

    /// Whether purchased accrued interest reduces the taxable gain
    #[arg(long)]
    pub accrued_deductible: Option<bool>,
}

impl SettingsArgs {
    /// The flags as the highest-priority settings layer.
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_currency: self.base_currency,
            notional: self.notional,
            fees: FeeOverrides {
                entry_fee: self.entry_fee,
                custody_fee: self.custody_fee,
                transaction_fee_flat: self.transaction_fee_flat,
                transaction_fee_rate: self.transaction_fee_rate,
                fx_fee: self.fx_fee,
            },
            taxes: TaxOverrides {
                withholding_rate: self.withholding_rate,
                capital_gains_rate: self.capital_gains_rate,
                accrued_interest_deductible: self.accrued_deductible,
            },
        }
    }

    /// The settings file in effect, if any.
    ///
    /// An explicit `--config` wins; otherwise the user-level file is used
    /// when it exists.
    pub fn settings_file(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| default_settings_path().filter(|p| p.is_file()))
    }

    /// The layered loader for these flags.
    pub fn loader(&self) -> CliResult<SettingsLoader> {
        let env = EnvVars::from_process().with_dotenv(DOTENV_FILE)?;
        let mut loader = SettingsLoader::new()
            .with_env(env)
            .with_overrides(self.overrides());
        if let Some(path) = self.settings_file() {
            tracing::debug!(path = %path.display(), "using settings file");
            loader = loader.with_file(path);
        }
        Ok(loader)
    }

    /// Resolves and validates the effective settings.
    pub fn load(&self) -> CliResult<EngineSettings> {
        Ok(self.loader()?.load()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            Date::from_ymd(2024, 3, 1).unwrap()
        );
        assert_eq!(
            parse_date("20240301").unwrap(),
            Date::from_ymd(2024, 3, 1).unwrap()
        );
        assert!(parse_date("March 1st").is_err());
    }

    #[test]
    fn test_overrides_from_flags() {
        let args = SettingsArgs {
            custody_fee: Some(Decimal::new(2, 3)),
            accrued_deductible: Some(true),
            ..SettingsArgs::default()
        };
        let layer = args.overrides();
        assert_eq!(layer.fees.custody_fee, Some(Decimal::new(2, 3)));
        assert_eq!(layer.fees.entry_fee, None);
        assert_eq!(layer.taxes.accrued_interest_deductible, Some(true));
    }
}
