//! Projection engine for investor cashflows and return indicators

mod state;
mod config;
mod engine;
mod cashflows;
mod indicators;
pub mod irr;

pub use state::ProjectionState;
pub use config::{
    AmortizationTerm, PaymentSplit, ProjectionConfig, ProjectionConfigBuilder, DEFAULT_HORIZON, MAX_HORIZON,
};
pub use engine::{project_cash_flows, ProjectionEngine};
pub use cashflows::{CashflowRow, ProjectionResult, ProjectionSummary};
pub use indicators::{compute_moic, compute_payback, Indicators};
pub use irr::{annualize, compute_irr, IrrSolver, SolverState, DEFAULT_IRR_GUESS};
