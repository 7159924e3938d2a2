//! Core projection engine for monthly investor cashflows

use log::{debug, info, warn};

use crate::error::ConfigResult;
use crate::schedule::{build_sales_curve, generate_amortization, CurveVariant};
use super::cashflows::{breakdown_rows, CashflowRow, ProjectionResult};
use super::config::ProjectionConfig;
use super::indicators::Indicators;
use super::irr::IrrSolver;
use super::state::ProjectionState;

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
    solver: IrrSolver,
}

impl ProjectionEngine {
    /// Create an engine for a validated configuration
    pub fn new(config: ProjectionConfig) -> ConfigResult<Self> {
        config.validate()?;
        let solver = IrrSolver::with_guess(config.irr_guess);
        Ok(Self { config, solver })
    }

    /// Run the projection: sales curve, receivables, land payments and indicators
    pub fn project(&self) -> ProjectionResult {
        let config = &self.config;
        let delivery_period = config.delivery_period();
        let curve = build_sales_curve(config.start_period, config.horizon, config.curve);

        let mut state = ProjectionState::new(config.horizon);
        state.book_land_payments(config.land_cost, config.land_installments);

        for (index, &fraction) in curve.iter().enumerate() {
            if fraction <= 0.0 {
                continue;
            }
            self.book_sale(&mut state, index, fraction, delivery_period);
        }

        if state.truncated > 0.0 {
            warn!(
                "{:.2} of receivables fall beyond the {}-month horizon and were dropped",
                state.truncated, config.horizon
            );
        }

        let investor_flows = state.investor_flows();
        let indicators = Indicators::compute(&investor_flows, config.land_cost, &self.solver);

        info!(
            "Projected {} months ({} curve, delivery month {}): IRR {:?}, MoIC {:.4}, payback {:?}",
            config.horizon, config.curve, delivery_period, indicators.irr, indicators.moic, indicators.payback
        );

        ProjectionResult {
            rows: breakdown_rows(&state),
            investor_flows,
            delivery_period,
            truncated_receivables: state.truncated,
            indicators,
        }
    }

    /// Split one month's sales into entry, SAC installments and delivery payment
    fn book_sale(&self, state: &mut ProjectionState, index: usize, fraction: f64, delivery_period: usize) {
        let config = &self.config;
        let sale_period = index + 1;
        let value = config.contract_value * fraction;

        state.record_sale(index, fraction, value);
        state.book_entry(index, value * config.split.entry);

        let term = config.amortization_term.installments(sale_period, delivery_period);
        let schedule = generate_amortization(value * config.split.installments, term, config.periodic_rate);
        state.book_installments(index, &schedule);

        state.book_delivery(delivery_period, value * config.split.delivery);

        debug!(
            "Month {}: sold {:.4} ({:.2}), {} installments",
            sale_period, fraction, value, term
        );
    }
}

/// Project an investor's flows from the individual deal parameters.
///
/// Returns the monthly breakdown, the investor flow vector and the delivery month.
#[allow(clippy::too_many_arguments)]
pub fn project_cash_flows(
    contract_value: f64,
    land_cost: f64,
    installment_count: usize,
    periodic_rate: f64,
    start_period: usize,
    curve: CurveVariant,
    construction_start: usize,
    construction_duration: usize,
    horizon: usize,
) -> ConfigResult<(Vec<CashflowRow>, Vec<f64>, usize)> {
    let config = ProjectionConfig::builder()
        .contract_value(contract_value)
        .land_cost(land_cost)
        .land_installments(installment_count)
        .periodic_rate(periodic_rate)
        .start_period(start_period)
        .curve(curve)
        .construction(construction_start, construction_duration)
        .horizon(horizon)
        .build()?;

    let result = ProjectionEngine::new(config)?.project();
    Ok((result.rows, result.investor_flows, result.delivery_period))
}
