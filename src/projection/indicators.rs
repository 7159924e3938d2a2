//! Return indicators derived from an investor flow vector

use serde::{Deserialize, Serialize};

use super::irr::{annualize, IrrSolver};

/// Sum of flows over the invested basis. Not time-weighted.
///
/// `basis` must be positive; a zero basis yields an infinite or NaN ratio.
/// `ProjectionConfig::validate` rejects a non-positive land cost, so projections
/// always pass a usable basis.
pub fn compute_moic(cashflows: &[f64], basis: f64) -> f64 {
    cashflows.iter().sum::<f64>() / basis
}

/// First month (1-indexed) at which the cumulative flow is non-negative
pub fn compute_payback(cashflows: &[f64]) -> Option<usize> {
    let mut cumulative = 0.0;
    for (i, &cf) in cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Some(i + 1);
        }
    }
    None
}

/// IRR, MoIC and payback for one projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    /// Monthly IRR, `None` when no rate was found
    pub irr: Option<f64>,
    /// IRR compounded to an annual rate
    pub irr_annual: Option<f64>,
    pub moic: f64,
    /// Payback month (1-indexed), `None` when never reached
    pub payback: Option<usize>,
}

impl Indicators {
    pub fn compute(cashflows: &[f64], basis: f64, solver: &IrrSolver) -> Self {
        let irr = solver.solve_robust(cashflows);
        Self {
            irr,
            irr_annual: irr.map(|rate| annualize(rate, 12)),
            moic: compute_moic(cashflows, basis),
            payback: compute_payback(cashflows),
        }
    }
}
