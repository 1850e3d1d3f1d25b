//! Spread command implementation.
//!
//! Solves the bond's yield from its price and the constant spread over a
//! government curve that reproduces the same price.

use anyhow::Result;
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};

use versified_returns::curve::{gov_spread_bps, solve_yield_to_maturity, GovernmentCurve};
use versified_returns::market::{remaining_years, PriceQuote, PriceSource};

use crate::cli::OutputFormat;
use crate::commands::{load_bonds, select_bond, settlement_or_today};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_json_value, print_output, KeyValue};

/// Arguments for the spread command.
#[derive(Args, Debug)]
pub struct SpreadArgs {
    /// Bond file: a JSON object, a JSON array, or CSV with one bond per row
    #[arg(short, long)]
    pub bond: PathBuf,

    /// Identifier of the bond to use. Defaults to the first in the file.
    #[arg(long)]
    pub id: Option<String>,

    /// Government curve: JSON array of {"years": .., "yield": ..} in percent
    #[arg(short, long)]
    pub curve: PathBuf,

    /// Valuation date (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// Ask quote, as delivered by the feed (e.g. "101.25")
    #[arg(long)]
    pub ask: Option<String>,

    /// Bid quote
    #[arg(long)]
    pub bid: Option<String>,

    /// Previous close
    #[arg(long)]
    pub close: Option<String>,
}

/// Figures reported by the spread command.
#[derive(Debug, Clone, Serialize)]
struct SpreadReport {
    identifier: String,
    price: Decimal,
    price_source: Option<PriceSource>,
    years_to_maturity: f64,
    solved_yield_pct: f64,
    curve_yield_pct: f64,
    spread_bps: f64,
}

fn load_curve(path: &Path) -> CliResult<GovernmentCurve> {
    let curve_file = |message: String| CliError::CurveFile {
        path: path.to_path_buf(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| curve_file(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| curve_file(e.to_string()))
}

fn to_f64(value: Decimal, what: &str) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| anyhow::anyhow!("{what} out of range: {value}"))
}

/// Execute the spread command.
pub fn execute(args: SpreadArgs, format: OutputFormat) -> Result<()> {
    let settlement = settlement_or_today(args.settlement.as_deref())?;
    let bond = select_bond(load_bonds(&args.bond)?, args.id.as_deref())?;
    let curve = load_curve(&args.curve)?;

    let (price, price_source) = if args.ask.is_some() || args.bid.is_some() || args.close.is_some() {
        let quote = PriceQuote::from_raw(
            args.ask.as_deref(),
            args.bid.as_deref(),
            args.close.as_deref(),
        );
        let selected = quote
            .select()
            .ok_or_else(|| anyhow::anyhow!("No usable price: need an ask or a close"))?;
        (selected.price, Some(selected.source))
    } else {
        (bond.clean_price(), None)
    };

    let years = remaining_years(bond.maturity_date(), settlement).ok_or_else(|| {
        anyhow::anyhow!(
            "Bond {} has matured: {} is on or before {}",
            bond.identifier(),
            bond.maturity_date(),
            settlement
        )
    })?;

    let years = to_f64(years, "years to maturity")?;
    let price_pct = to_f64(price, "price")?;
    let coupon_pct = to_f64(bond.coupon_rate() * Decimal::ONE_HUNDRED, "coupon")?;

    tracing::info!(bond = bond.identifier(), price = price_pct, years, "solving spread");

    let solved_yield_pct =
        solve_yield_to_maturity(price_pct, coupon_pct, years, bond.frequency(), 100.0)?;
    let spread_bps = gov_spread_bps(price_pct, coupon_pct, years, bond.frequency(), &curve)?;

    let report = SpreadReport {
        identifier: bond.identifier().to_string(),
        price,
        price_source,
        years_to_maturity: years,
        solved_yield_pct,
        curve_yield_pct: curve.yield_at(years),
        spread_bps,
    };

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            let source = report
                .price_source
                .map_or_else(|| "clean".to_string(), |s| s.to_string());
            let rows = vec![
                KeyValue::new("Bond", report.identifier.clone()),
                KeyValue::new("Price", format!("{} ({source})", report.price)),
                KeyValue::new("Years to Maturity", format!("{:.4}", report.years_to_maturity)),
                KeyValue::new("Solved Yield", format!("{:.4}%", report.solved_yield_pct)),
                KeyValue::new("Curve Yield", format!("{:.4}%", report.curve_yield_pct)),
                KeyValue::new("Spread", format!("{:.2} bps", report.spread_bps)),
            ];
            if format == OutputFormat::Table {
                print_header("Government Spread");
            }
            print_output(&rows, format)?;
        }
        OutputFormat::Json => {
            print_json_value(&report)?;
        }
        OutputFormat::Minimal => {
            println!("{:.2}", report.spread_bps);
        }
    }

    Ok(())
}
