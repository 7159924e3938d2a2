//! Time-indexed building blocks: sales curves and SAC amortization schedules

mod amortization;
mod sales_curve;

pub use amortization::{generate_amortization, sac_schedule, SacInstallment};
pub use sales_curve::{build_sales_curve, CurveVariant};
