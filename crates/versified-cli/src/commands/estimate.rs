//! Estimate command implementation.
//!
//! Runs the return estimator over every bond in a file and reports the
//! three tiers side by side.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use versified_returns::{ReturnEstimate, Tier};

use crate::cli::OutputFormat;
use crate::commands::{estimator, load_bonds, settlement_or_today, SettingsArgs};
use crate::error::CliError;
use crate::output::{
    format_amount, format_percent, print_error, print_header, print_json_value, print_output,
    KeyValue,
};

/// Arguments for the estimate command.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Bond file: a JSON object, a JSON array, or CSV with one bond per row
    #[arg(short, long)]
    pub bond: PathBuf,

    /// Settlement date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub settlement: Option<String>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// One tier of one bond.
#[derive(Debug, Clone, Serialize, Tabled)]
struct YieldRow {
    #[tabled(rename = "Bond")]
    bond: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Current Yield")]
    current_yield: String,
    #[tabled(rename = "Approx. YTM")]
    approximate_ytm: String,
    #[tabled(rename = "Holding Period")]
    holding_period_return: String,
    #[tabled(rename = "Annualized")]
    annualized_return: String,
}

fn rows(estimate: &ReturnEstimate) -> Vec<YieldRow> {
    Tier::all()
        .iter()
        .map(|tier| {
            let m = estimate.tier(*tier).metrics;
            YieldRow {
                bond: estimate.identifier.clone(),
                tier: tier.label().to_string(),
                current_yield: format_percent(m.current_yield),
                approximate_ytm: format_percent(m.approximate_ytm),
                holding_period_return: format_percent(m.holding_period_return),
                annualized_return: format_percent(m.annualized_return),
            }
        })
        .collect()
}

fn cost_summary(estimate: &ReturnEstimate) -> Vec<KeyValue> {
    vec![
        KeyValue::new("Notional", format_amount(estimate.notional)),
        KeyValue::new("Clean Amount", format_amount(estimate.clean_amount)),
        KeyValue::new("Accrued Interest", format_amount(estimate.accrued.amount)),
        KeyValue::new("Dirty Amount", format_amount(estimate.dirty_amount)),
        KeyValue::from_decimal("Years to Maturity", estimate.years_to_maturity, 4),
        KeyValue::new("Upfront Fees", format_amount(estimate.fees.upfront())),
        KeyValue::new("Custody Fees", format_amount(estimate.fees.custody)),
        KeyValue::new("Exit Fee", format_amount(estimate.fees.exit_transaction)),
        KeyValue::new(
            "Withholding Tax",
            format_amount(estimate.taxes.total_withholding()),
        ),
        KeyValue::new("Capital Gains Tax", format_amount(estimate.taxes.capital_gains)),
    ]
}

/// Execute the estimate command.
pub fn execute(args: EstimateArgs, format: OutputFormat) -> Result<()> {
    let settlement = settlement_or_today(args.settlement.as_deref())?;
    let settings = args.settings.load()?;
    let bonds = load_bonds(&args.bond)?;
    let estimator = estimator(&settings);

    tracing::info!(bonds = bonds.len(), %settlement, "estimating returns");

    let mut estimates = Vec::with_capacity(bonds.len());
    let mut failures = Vec::new();
    for (bond, result) in bonds.iter().zip(estimator.estimate_all(&bonds, settlement)) {
        match result {
            Ok(estimate) => estimates.push(estimate),
            Err(err) => {
                tracing::warn!(bond = bond.identifier(), error = %err, "estimate failed");
                print_error(&format!("{}: {err}", bond.identifier()));
                failures.push(format!("{}: {err}", bond.identifier()));
            }
        }
    }

    if estimates.is_empty() {
        return Err(CliError::NoEstimates(failures.join("; ")).into());
    }

    match format {
        OutputFormat::Table => {
            print_header(&format!("Return Estimates (settlement {settlement})"));
            let rows: Vec<_> = estimates.iter().flat_map(rows).collect();
            print_output(&rows, format)?;
            if let [single] = estimates.as_slice() {
                print_header(&format!("Costs ({})", estimator.base_currency()));
                print_output(&cost_summary(single), format)?;
            }
        }
        OutputFormat::Json => {
            print_json_value(&estimates)?;
        }
        OutputFormat::Csv => {
            let rows: Vec<_> = estimates.iter().flat_map(rows).collect();
            print_output(&rows, format)?;
        }
        OutputFormat::Minimal => {
            for estimate in &estimates {
                let ytm = estimate.after_tax.metrics.approximate_ytm;
                if estimates.len() == 1 {
                    println!("{ytm:.6}");
                } else {
                    println!("{}\t{ytm:.6}", estimate.identifier);
                }
            }
        }
    }

    Ok(())
}
