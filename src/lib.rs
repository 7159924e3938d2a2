//! Permuta Simulator - cash-flow projections for land-for-units swap investors
//!
//! This library provides:
//! - SAC (constant amortization) schedules for financed unit sales
//! - Sales curves over a fixed monthly horizon
//! - Investor cash-flow projection (entry, installments, key delivery, land payments)
//! - IRR (Newton-Raphson with bisection fallback), MoIC and payback
//! - Batch scenarios and CSV deal loading

pub mod error;
pub mod schedule;
pub mod projection;
pub mod scenario;
pub mod loader;

// Re-export commonly used types
pub use error::{ConfigError, LoadError};
pub use schedule::{build_sales_curve, generate_amortization, CurveVariant};
pub use projection::{
    compute_irr, compute_moic, compute_payback, project_cash_flows, CashflowRow, Indicators,
    ProjectionConfig, ProjectionEngine, ProjectionResult,
};
pub use scenario::ScenarioRunner;
pub use loader::{load_deals, Deal};
