//! Error types for configuration and deal loading
//!
//! Numerical outcomes (no IRR, no payback) are not errors and never appear here;
//! they travel as `Option` through the indicators.

use thiserror::Error;

/// Result alias for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Rejected simulation parameters, reported before the projector runs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("horizon must be at least one period")]
    ZeroHorizon,

    #[error("horizon of {horizon} periods exceeds the maximum of {max}")]
    HorizonTooLong { horizon: usize, max: usize },

    #[error("installment count must be at least one")]
    ZeroInstallments,

    #[error("installment count {count} exceeds the {horizon}-period horizon")]
    InstallmentsBeyondHorizon { count: usize, horizon: usize },

    #[error("start period must be between 1 and {horizon}, got {start}")]
    StartPeriodOutOfRange { start: usize, horizon: usize },

    #[error("construction {field} must be at least one period")]
    InvalidConstruction { field: &'static str },

    #[error("construction from period {start} for {duration} periods delivers too far past the {horizon}-period horizon")]
    DeliveryOutOfRange { start: usize, duration: usize, horizon: usize },

    #[error("fixed amortization term must be at least one period")]
    ZeroAmortizationTerm,

    #[error("fixed amortization term of {term} periods exceeds the {horizon}-period horizon")]
    AmortizationTermBeyondHorizon { term: usize, horizon: usize },

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("periodic rate must be finite and non-negative, got {0}")]
    InvalidRate(f64),

    #[error("payment split must be non-negative and sum to 1 (entry {entry}, installments {installments}, delivery {delivery})")]
    InvalidPaymentSplit {
        entry: f64,
        installments: f64,
        delivery: f64,
    },

    #[error("invalid custom sales curve (initial {initial}, monthly {monthly})")]
    InvalidCurve { initial: f64, monthly: f64 },
}

/// Failure while reading deal definitions
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read deals: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown curve variant '{0}'")]
    UnknownCurve(String),

    #[error("deal '{deal}': {source}")]
    Config {
        deal: String,
        #[source]
        source: ConfigError,
    },
}
