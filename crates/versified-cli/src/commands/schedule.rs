//! Schedule command implementation.
//!
//! Lists the cash flows of one bond as each tier receives them.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use versified_returns::estimator::{TierCashFlow, TierResult};
use versified_returns::Tier;

use crate::cli::OutputFormat;
use crate::commands::{
    estimator, load_bonds, select_bond, settlement_or_today, SettingsArgs, TierArg,
};
use crate::output::{format_amount, print_header, print_json_value, print_output};

/// Arguments for the schedule command.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// Bond file: a JSON object, a JSON array, or CSV with one bond per row
    #[arg(short, long)]
    pub bond: PathBuf,

    /// Identifier of the bond to show. Defaults to the first in the file.
    #[arg(long)]
    pub id: Option<String>,

    /// Settlement date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// Only show this tier
    #[arg(short, long, value_enum)]
    pub tier: Option<TierArg>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// One cash flow of one tier.
#[derive(Debug, Clone, Serialize, Tabled)]
struct FlowRow {
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    cf_type: String,
    #[tabled(rename = "Coupon")]
    coupon: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Fees")]
    fees: String,
    #[tabled(rename = "Taxes")]
    taxes: String,
    #[tabled(rename = "Net")]
    net: String,
}

impl FlowRow {
    fn new(tier: Tier, flow: &TierCashFlow) -> Self {
        Self {
            tier: tier.label().to_string(),
            date: flow.date.to_string(),
            cf_type: flow.cf_type.to_string(),
            coupon: format_amount(flow.gross_coupon),
            principal: format_amount(flow.gross_principal),
            fees: format_amount(flow.custody_fee + flow.transaction_fee),
            taxes: format_amount(flow.withholding_tax + flow.capital_gains_tax),
            net: format_amount(flow.net_amount()),
        }
    }
}

fn rows(result: &TierResult) -> impl Iterator<Item = FlowRow> + '_ {
    result
        .flows
        .iter()
        .map(move |flow| FlowRow::new(result.tier, flow))
}

/// Execute the schedule command.
pub fn execute(args: ScheduleArgs, format: OutputFormat) -> Result<()> {
    let settlement = settlement_or_today(args.settlement.as_deref())?;
    let settings = args.settings.load()?;
    let bond = select_bond(load_bonds(&args.bond)?, args.id.as_deref())?;

    let estimate = estimator(&settings).estimate(&bond, settlement)?;
    let tiers: Vec<Tier> = match args.tier {
        Some(tier) => vec![tier.into()],
        None => Tier::all().to_vec(),
    };
    let results: Vec<&TierResult> = tiers.iter().map(|t| estimate.tier(*t)).collect();

    match format {
        OutputFormat::Table => {
            for result in &results {
                print_header(&format!(
                    "Cash flows for {} ({}, cost {})",
                    estimate.identifier,
                    result.tier,
                    format_amount(result.purchase_cost)
                ));
                let flows: Vec<_> = rows(result).collect();
                print_output(&flows, format)?;
            }
        }
        OutputFormat::Json => {
            print_json_value(&results)?;
        }
        OutputFormat::Csv => {
            let flows: Vec<_> = results.iter().copied().flat_map(rows).collect();
            print_output(&flows, format)?;
        }
        OutputFormat::Minimal => {
            for result in &results {
                println!("{}\t{:.2}", result.tier, result.total_received());
            }
        }
    }

    Ok(())
}
