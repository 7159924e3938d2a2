//! AWS Lambda handler for permuta simulations
//!
//! Accepts deal parameters as JSON and returns the investor cashflows with IRR, MoIC
//! and payback. Each invocation builds its own engine.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::warn;
use permuta_sim::projection::{
    AmortizationTerm, CashflowRow, PaymentSplit, ProjectionConfig, ProjectionSummary,
    DEFAULT_HORIZON, DEFAULT_IRR_GUESS,
};
use permuta_sim::{CurveVariant, ProjectionEngine};
use serde::{Deserialize, Serialize};

/// Input parameters for one simulation
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Total sales value of the units (default: 300000)
    #[serde(default = "default_amount")]
    pub contract_value: f64,

    /// Land cost paid by the investor (default: 300000)
    #[serde(default = "default_amount")]
    pub land_cost: f64,

    /// Number of land payments (default: 3)
    #[serde(default = "default_land_installments")]
    pub land_installments: usize,

    /// Monthly rate on financed installments, as decimal (default: 0.5%)
    #[serde(default = "default_monthly_rate")]
    pub monthly_rate: f64,

    #[serde(default = "default_one")]
    pub start_period: usize,

    #[serde(default)]
    pub curve: CurveVariant,

    #[serde(default = "default_one")]
    pub construction_start: usize,

    #[serde(default = "default_construction_duration")]
    pub construction_duration: usize,

    #[serde(default = "default_horizon")]
    pub horizon: usize,

    #[serde(default)]
    pub split: PaymentSplit,

    /// Fixed SAC term; amortizes until delivery when absent
    #[serde(default)]
    pub amortization_months: Option<usize>,

    #[serde(default = "default_irr_guess")]
    pub irr_guess: f64,

    /// Include the monthly table in the response
    #[serde(default = "default_true")]
    pub include_cashflows: bool,
}

fn default_amount() -> f64 { 300_000.0 }
fn default_land_installments() -> usize { 3 }
fn default_monthly_rate() -> f64 { 0.005 }
fn default_one() -> usize { 1 }
fn default_construction_duration() -> usize { 36 }
fn default_horizon() -> usize { DEFAULT_HORIZON }
fn default_irr_guess() -> f64 { DEFAULT_IRR_GUESS }
fn default_true() -> bool { true }

/// Output from the simulation
#[derive(Debug, Serialize, Default)]
pub struct SimulationResponse {
    pub irr_monthly_pct: Option<f64>,
    pub irr_annual_pct: Option<f64>,
    pub moic: Option<f64>,
    pub payback_month: Option<usize>,
    pub delivery_period: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProjectionSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cashflows: Vec<CashflowRow>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationRequest {
    fn into_config(self) -> ProjectionConfig {
        ProjectionConfig {
            contract_value: self.contract_value,
            land_cost: self.land_cost,
            land_installments: self.land_installments,
            periodic_rate: self.monthly_rate,
            start_period: self.start_period,
            curve: self.curve,
            construction_start: self.construction_start,
            construction_duration: self.construction_duration,
            horizon: self.horizon,
            split: self.split,
            amortization_term: self
                .amortization_months
                .map_or(AmortizationTerm::UntilDelivery, AmortizationTerm::Fixed),
            irr_guess: self.irr_guess,
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<SimulationRequest>) -> Result<SimulationResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;
    let include_cashflows = request.include_cashflows;

    let engine = match ProjectionEngine::new(request.into_config()) {
        Ok(engine) => engine,
        Err(e) => {
            warn!("Rejected simulation request: {}", e);
            return Ok(SimulationResponse {
                error: Some(e.to_string()),
                execution_time_ms: start.elapsed().as_millis() as u64,
                ..Default::default()
            });
        }
    };

    let result = engine.project();
    let indicators = result.indicators;

    Ok(SimulationResponse {
        irr_monthly_pct: indicators.irr.map(|r| r * 100.0),
        irr_annual_pct: indicators.irr_annual.map(|r| r * 100.0),
        moic: Some(indicators.moic),
        payback_month: indicators.payback,
        delivery_period: Some(result.delivery_period),
        summary: Some(result.summary()),
        cashflows: if include_cashflows { result.rows } else { Vec::new() },
        execution_time_ms: start.elapsed().as_millis() as u64,
        error: None,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
