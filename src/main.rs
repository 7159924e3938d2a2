//! Permuta Simulator CLI
//!
//! Runs one deal and prints the monthly investor cashflows and indicators

use anyhow::Result;
use clap::Parser;
use permuta_sim::projection::{AmortizationTerm, ProjectionConfig, ProjectionResult, DEFAULT_HORIZON};
use permuta_sim::{CurveVariant, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "permuta_sim", version, about = "Permuta investor cash-flow simulator")]
struct Args {
    /// Total sales value of the units received (R$)
    #[arg(long, default_value_t = 300_000.0)]
    contract_value: f64,

    /// Amount paid for the land position (R$)
    #[arg(long, default_value_t = 300_000.0)]
    land_cost: f64,

    /// Number of monthly land payments
    #[arg(long, default_value_t = 3)]
    land_installments: usize,

    /// Monthly interest on financed installments, in percent
    #[arg(long, default_value_t = 0.5)]
    monthly_rate_pct: f64,

    /// Month sales start (1-indexed)
    #[arg(long, default_value_t = 1)]
    start_period: usize,

    /// Sales curve: normal, optimistic or pessimistic
    #[arg(long, default_value = "normal")]
    curve: CurveVariant,

    /// First month of construction (1-indexed)
    #[arg(long, default_value_t = 1)]
    construction_start: usize,

    /// Construction length in months
    #[arg(long, default_value_t = 36)]
    construction_duration: usize,

    /// Months simulated
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: usize,

    /// Fixed SAC term for every sale instead of amortizing until delivery
    #[arg(long)]
    amortization_months: Option<usize>,

    /// Run all three standard curves and compare their indicators
    #[arg(long)]
    compare: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Months shown in the table
    #[arg(long, default_value_t = 24)]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ProjectionConfig::builder()
        .contract_value(args.contract_value)
        .land_cost(args.land_cost)
        .land_installments(args.land_installments)
        .periodic_rate(args.monthly_rate_pct / 100.0)
        .start_period(args.start_period)
        .curve(args.curve)
        .construction(args.construction_start, args.construction_duration)
        .horizon(args.horizon)
        .amortization_term(
            args.amortization_months
                .map_or(AmortizationTerm::UntilDelivery, AmortizationTerm::Fixed),
        )
        .build()?;

    let runner = ScenarioRunner::with_config(config);
    if args.compare {
        let results = runner.compare_curves()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
            return Ok(());
        }
        println!("{:<12} {:>10} {:>10} {:>8} {:>8}", "Curve", "IRR a.m.", "IRR a.a.", "MoIC", "Payback");
        println!("{}", "-".repeat(52));
        for (curve, result) in &results {
            let ind = &result.indicators;
            println!(
                "{:<12} {:>10} {:>10} {:>7.2}x {:>8}",
                curve.to_string(),
                format_pct(ind.irr),
                format_pct(ind.irr_annual),
                ind.moic,
                format_payback(ind.payback),
            );
        }
        return Ok(());
    }

    let result = runner.run()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_table(&result, args.rows);
    print_indicators(&result);
    Ok(())
}

fn print_table(result: &ProjectionResult, rows: usize) {
    println!("{:>5} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Month", "Sold", "Entry", "SAC", "Keys", "Land", "Investor", "Cumulative");
    println!("{}", "-".repeat(95));

    for row in result.rows.iter().take(rows) {
        println!("{:>5} {:>7.2}% {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.period,
            row.sold_fraction * 100.0,
            row.entry,
            row.installments,
            row.delivery,
            row.land_payment,
            row.investor_flow,
            row.cumulative_flow,
        );
    }

    if result.rows.len() > rows {
        println!("... ({} more months)", result.rows.len() - rows);
    }
}

fn print_indicators(result: &ProjectionResult) {
    let summary = result.summary();
    let ind = &result.indicators;

    println!("\nDelivery month: {}", result.delivery_period);
    println!("  Total sales:        R$ {:.2}", summary.total_sales);
    println!("  Total received:     R$ {:.2}", summary.total_received);
    println!("  Land payments:      R$ {:.2}", summary.total_land_payments);
    println!("  Max exposure:       R$ {:.2}", summary.max_exposure);
    if summary.truncated_receivables > 0.0 {
        println!("  Beyond horizon:     R$ {:.2}", summary.truncated_receivables);
    }
    println!("\nIRR (monthly): {}", format_pct(ind.irr));
    println!("IRR (annual):  {}", format_pct(ind.irr_annual));
    println!("MoIC:          {:.2}x", ind.moic);
    println!("Payback:       {}", format_payback(ind.payback));
}

fn format_pct(rate: Option<f64>) -> String {
    rate.map_or_else(|| "N/A".to_string(), |r| format!("{:.2}%", r * 100.0))
}

fn format_payback(payback: Option<usize>) -> String {
    payback.map_or_else(|| "N/A".to_string(), |m| format!("{} months", m))
}
