//! Config command implementation.
//!
//! Shows, checks and initialises the layered engine settings.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use versified_config::{ConfigFormat, EngineSettings};

use crate::cli::OutputFormat;
use crate::commands::{default_settings_path, SettingsArgs};
use crate::output::{
    print_error, print_header, print_info, print_output, print_success, print_warning, KeyValue,
};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective settings after all layers
    Show(LayerArgs),

    /// Check the effective settings without using them
    Validate(LayerArgs),

    /// Show the default settings file location
    Path,

    /// Write a settings file with default values
    Init(InitArgs),
}

/// Settings layers for show and validate.
#[derive(Args, Debug)]
pub struct LayerArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Arguments for init.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write. Defaults to the user settings file.
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show(layer) => execute_show(&layer.settings, format),
        ConfigCommand::Validate(layer) => execute_validate(&layer.settings),
        ConfigCommand::Path => execute_path(),
        ConfigCommand::Init(init) => execute_init(init),
    }
}

fn rows(settings: &EngineSettings) -> Vec<KeyValue> {
    let fees = &settings.fees;
    let taxes = &settings.taxes;
    vec![
        KeyValue::new("base_currency", settings.base_currency.to_string()),
        KeyValue::new(
            "notional",
            settings
                .notional
                .map_or_else(|| "face value".to_string(), |n| n.to_string()),
        ),
        KeyValue::from_percent("fees.entry_fee", fees.entry_fee),
        KeyValue::from_percent("fees.custody_fee", fees.custody_fee),
        KeyValue::new("fees.transaction_fee_flat", fees.transaction_fee_flat.to_string()),
        KeyValue::from_percent("fees.transaction_fee_rate", fees.transaction_fee_rate),
        KeyValue::from_percent("fees.fx_fee", fees.fx_fee),
        KeyValue::from_percent("taxes.withholding_rate", taxes.withholding_rate),
        KeyValue::from_percent("taxes.capital_gains_rate", taxes.capital_gains_rate),
        KeyValue::new(
            "taxes.accrued_interest_deductible",
            taxes.accrued_interest_deductible.to_string(),
        ),
    ]
}

/// Show the effective settings.
fn execute_show(args: &SettingsArgs, format: OutputFormat) -> Result<()> {
    let settings = args.load()?;

    match format {
        OutputFormat::Table => {
            print_header("Effective Settings");
            print_output(&rows(&settings), format)?;
            if let Some(path) = args.settings_file() {
                print_info(&format!("Settings file: {}", path.display()));
            }
        }
        OutputFormat::Json => {
            println!("{}", settings.render(ConfigFormat::Json)?);
        }
        OutputFormat::Csv => {
            print_output(&rows(&settings), format)?;
        }
        OutputFormat::Minimal => {
            print!("{}", settings.render(ConfigFormat::Toml)?);
        }
    }

    Ok(())
}

/// Validate the effective settings.
fn execute_validate(args: &SettingsArgs) -> Result<()> {
    match args.load() {
        Ok(_) => {
            print_success("Settings are valid");
            Ok(())
        }
        Err(err) => {
            print_error(&err.to_string());
            Err(anyhow::anyhow!("Settings are invalid"))
        }
    }
}

/// Show the default settings file location.
fn execute_path() -> Result<()> {
    let path = default_settings_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    print_info(&format!("Settings file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

/// Write a default settings file.
fn execute_init(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => default_settings_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if path.exists() && !args.force {
        print_warning(&format!(
            "{} already exists; use --force to overwrite",
            path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    EngineSettings::default().save(&path)?;
    print_success(&format!("Wrote default settings to {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::format_percent;

    #[test]
    fn test_rows_cover_every_setting() {
        let rows = rows(&EngineSettings::default());
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].value, "CHF");
        assert_eq!(rows[1].value, "face value");
        assert_eq!(rows[2].value, format_percent(rust_decimal::Decimal::ZERO));
    }
}
