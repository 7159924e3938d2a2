//! Cashflow output structures for projections

use serde::{Deserialize, Serialize};

use super::indicators::Indicators;
use super::state::ProjectionState;

/// A single row of projection output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Projection month (1-indexed)
    pub period: u32,

    // Sales
    pub sold_fraction: f64,
    pub sales_value: f64,

    // Receivables
    pub entry: f64,
    pub installments: f64,
    pub delivery: f64,

    /// Land payment made by the investor (negative)
    pub land_payment: f64,

    // Investor position
    pub investor_flow: f64,
    pub cumulative_flow: f64,
}

impl CashflowRow {
    /// Cash received from unit buyers this month
    pub fn inflow(&self) -> f64 {
        self.entry + self.installments + self.delivery
    }
}

/// Build the breakdown table from accumulated components
pub fn breakdown_rows(state: &ProjectionState) -> Vec<CashflowRow> {
    let mut cumulative = 0.0;
    (0..state.horizon())
        .map(|i| {
            let investor_flow = state.net_flow(i);
            cumulative += investor_flow;
            CashflowRow {
                period: (i + 1) as u32,
                sold_fraction: state.sold_fraction[i],
                sales_value: state.sales_value[i],
                entry: state.entry[i],
                installments: state.installments[i],
                delivery: state.delivery[i],
                land_payment: state.land_payment[i],
                investor_flow,
                cumulative_flow: cumulative,
            }
        })
        .collect()
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Monthly breakdown
    pub rows: Vec<CashflowRow>,

    /// Investor's net flow per month
    pub investor_flows: Vec<f64>,

    /// Month of key delivery (1-indexed)
    pub delivery_period: usize,

    /// Receivables dropped because they fell past the horizon
    pub truncated_receivables: f64,

    pub indicators: Indicators,
}

impl ProjectionResult {
    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_sales: f64 = self.rows.iter().map(|r| r.sales_value).sum();
        let total_entry: f64 = self.rows.iter().map(|r| r.entry).sum();
        let total_installments: f64 = self.rows.iter().map(|r| r.installments).sum();
        let total_delivery: f64 = self.rows.iter().map(|r| r.delivery).sum();
        let total_received: f64 = self.rows.iter().map(CashflowRow::inflow).sum();
        let total_land_payments: f64 = self.rows.iter().map(|r| r.land_payment).sum();
        let net_cashflow: f64 = self.investor_flows.iter().sum();

        let max_exposure = self
            .rows
            .iter()
            .map(|r| r.cumulative_flow)
            .fold(0.0_f64, f64::min);

        ProjectionSummary {
            total_months: self.rows.len() as u32,
            total_sales,
            total_entry,
            total_installments,
            total_delivery,
            total_received,
            total_land_payments,
            net_cashflow,
            max_exposure,
            truncated_receivables: self.truncated_receivables,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_sales: f64,
    pub total_entry: f64,
    pub total_installments: f64,
    pub total_delivery: f64,
    /// Entry, installments and delivery together
    pub total_received: f64,
    pub total_land_payments: f64,
    pub net_cashflow: f64,
    /// Most negative cumulative position reached
    pub max_exposure: f64,
    pub truncated_receivables: f64,
}
