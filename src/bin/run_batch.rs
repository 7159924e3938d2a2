//! Run projections for every deal in a CSV file
//!
//! Usage: cargo run --bin run_batch -- deals.csv [--json]

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use permuta_sim::{load_deals, Indicators, ScenarioRunner};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_batch", about = "Project every deal in a CSV file")]
struct Args {
    /// CSV file with one deal per row
    deals: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DealSummary<'a> {
    deal: &'a str,
    delivery_period: usize,
    indicators: Indicators,
    net_cashflow: f64,
    max_exposure: f64,
    truncated_receivables: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let deals = load_deals(&args.deals)
        .with_context(|| format!("loading deals from {}", args.deals.display()))?;
    eprintln!("Loaded {} deals in {:?}", deals.len(), start.elapsed());

    let runner = ScenarioRunner::new();
    let results = runner.run_deals(&deals);

    let mut summaries = Vec::with_capacity(results.len());
    for (name, result) in &results {
        match result {
            Ok(result) => {
                let summary = result.summary();
                summaries.push(DealSummary {
                    deal: name,
                    delivery_period: result.delivery_period,
                    indicators: result.indicators,
                    net_cashflow: summary.net_cashflow,
                    max_exposure: summary.max_exposure,
                    truncated_receivables: summary.truncated_receivables,
                });
            }
            Err(e) => error!("Deal {} skipped: {}", name, e),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        println!("{:<20} {:>8} {:>10} {:>10} {:>8} {:>8} {:>14}",
            "Deal", "Keys", "IRR a.m.", "IRR a.a.", "MoIC", "Payback", "Max exposure");
        println!("{}", "-".repeat(84));
        for s in &summaries {
            println!("{:<20} {:>8} {:>10} {:>10} {:>7.2}x {:>8} {:>14.2}",
                s.deal,
                s.delivery_period,
                s.indicators.irr.map_or_else(|| "N/A".to_string(), |r| format!("{:.3}%", r * 100.0)),
                s.indicators.irr_annual.map_or_else(|| "N/A".to_string(), |r| format!("{:.2}%", r * 100.0)),
                s.indicators.moic,
                s.indicators.payback.map_or_else(|| "N/A".to_string(), |m| m.to_string()),
                s.max_exposure,
            );
        }
    }

    eprintln!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
