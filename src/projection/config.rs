//! Projection configuration, payment terms and boundary validation

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::schedule::CurveVariant;
use super::irr::DEFAULT_IRR_GUESS;

/// Default simulation horizon in months
pub const DEFAULT_HORIZON: usize = 120;

/// Longest simulation horizon accepted, in months
pub const MAX_HORIZON: usize = 1200;

/// Tolerance on the payment split adding up to 100%
const SPLIT_TOLERANCE: f64 = 1e-9;

/// How the value of each sale is paid by the unit buyer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// Down payment, received in the month of sale
    pub entry: f64,
    /// Financed part, received as SAC installments
    pub installments: f64,
    /// Paid at delivery of the keys ("chaves")
    pub delivery: f64,
}

impl Default for PaymentSplit {
    fn default() -> Self {
        Self {
            entry: 0.10,
            installments: 0.20,
            delivery: 0.70,
        }
    }
}

impl PaymentSplit {
    pub fn validate(&self) -> ConfigResult<()> {
        let parts = [self.entry, self.installments, self.delivery];
        let well_formed = parts.iter().all(|p| p.is_finite() && *p >= 0.0);
        let total: f64 = parts.iter().sum();

        if !well_formed || (total - 1.0).abs() > SPLIT_TOLERANCE {
            return Err(ConfigError::InvalidPaymentSplit {
                entry: self.entry,
                installments: self.installments,
                delivery: self.delivery,
            });
        }
        Ok(())
    }
}

/// Length of the SAC schedule generated for each sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationTerm {
    /// Installments end exactly at the delivery period
    UntilDelivery,
    /// Same number of installments for every sale
    Fixed(usize),
}

impl Default for AmortizationTerm {
    fn default() -> Self {
        AmortizationTerm::UntilDelivery
    }
}

impl AmortizationTerm {
    /// Number of installments for a sale closed in `sale_period` (1-indexed)
    pub fn installments(&self, sale_period: usize, delivery_period: usize) -> usize {
        match self {
            AmortizationTerm::UntilDelivery => delivery_period.saturating_sub(sale_period).max(1),
            AmortizationTerm::Fixed(n) => *n,
        }
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Total sales value of the units received in the swap
    pub contract_value: f64,

    /// Amount the investor pays for the land position
    pub land_cost: f64,

    /// Number of equal monthly payments for the land
    pub land_installments: usize,

    /// Monthly interest rate on the financed installments
    pub periodic_rate: f64,

    /// Launch month of sales (1-indexed)
    pub start_period: usize,

    /// Sales velocity scenario
    pub curve: CurveVariant,

    /// First month of construction (1-indexed)
    pub construction_start: usize,

    /// Construction length in months
    pub construction_duration: usize,

    /// Number of months simulated
    pub horizon: usize,

    pub split: PaymentSplit,

    pub amortization_term: AmortizationTerm,

    /// Starting rate for the IRR search
    pub irr_guess: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            contract_value: 300_000.0,
            land_cost: 300_000.0,
            land_installments: 3,
            periodic_rate: 0.005,
            start_period: 1,
            curve: CurveVariant::Normal,
            construction_start: 1,
            construction_duration: 36,
            horizon: DEFAULT_HORIZON,
            split: PaymentSplit::default(),
            amortization_term: AmortizationTerm::UntilDelivery,
            irr_guess: DEFAULT_IRR_GUESS,
        }
    }
}

impl ProjectionConfig {
    pub fn builder() -> ProjectionConfigBuilder {
        ProjectionConfigBuilder::default()
    }

    /// Month in which the keys are handed over (1-indexed)
    pub fn delivery_period(&self) -> usize {
        self.construction_start
            .saturating_add(self.construction_duration.saturating_sub(1))
    }

    /// Delivery month, if it lies within one horizon past the end of the simulation
    fn checked_delivery_period(&self) -> Option<usize> {
        self.construction_start
            .checked_add(self.construction_duration - 1)
            .filter(|&delivery| delivery <= self.horizon * 2)
    }

    /// Reject parameters the projector cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.horizon == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.horizon > MAX_HORIZON {
            return Err(ConfigError::HorizonTooLong {
                horizon: self.horizon,
                max: MAX_HORIZON,
            });
        }
        if self.land_installments == 0 {
            return Err(ConfigError::ZeroInstallments);
        }
        if self.land_installments > self.horizon {
            return Err(ConfigError::InstallmentsBeyondHorizon {
                count: self.land_installments,
                horizon: self.horizon,
            });
        }
        if self.start_period == 0 || self.start_period > self.horizon {
            return Err(ConfigError::StartPeriodOutOfRange {
                start: self.start_period,
                horizon: self.horizon,
            });
        }
        if self.construction_start == 0 {
            return Err(ConfigError::InvalidConstruction { field: "start" });
        }
        if self.construction_duration == 0 {
            return Err(ConfigError::InvalidConstruction { field: "duration" });
        }
        if self.checked_delivery_period().is_none() {
            return Err(ConfigError::DeliveryOutOfRange {
                start: self.construction_start,
                duration: self.construction_duration,
                horizon: self.horizon,
            });
        }
        if !self.contract_value.is_finite() || self.contract_value < 0.0 {
            return Err(ConfigError::InvalidAmount {
                field: "contract_value",
                value: self.contract_value,
            });
        }
        if !self.land_cost.is_finite() || self.land_cost <= 0.0 {
            return Err(ConfigError::InvalidAmount {
                field: "land_cost",
                value: self.land_cost,
            });
        }
        if !self.periodic_rate.is_finite() || self.periodic_rate < 0.0 {
            return Err(ConfigError::InvalidRate(self.periodic_rate));
        }
        if !self.irr_guess.is_finite() || self.irr_guess <= -1.0 {
            return Err(ConfigError::InvalidAmount {
                field: "irr_guess",
                value: self.irr_guess,
            });
        }
        match self.amortization_term {
            AmortizationTerm::Fixed(0) => return Err(ConfigError::ZeroAmortizationTerm),
            AmortizationTerm::Fixed(term) if term > self.horizon => {
                return Err(ConfigError::AmortizationTermBeyondHorizon {
                    term,
                    horizon: self.horizon,
                });
            }
            _ => {}
        }
        if !self.curve.is_valid() {
            return Err(ConfigError::InvalidCurve {
                initial: self.curve.initial_fraction(),
                monthly: self.curve.monthly_fraction(),
            });
        }
        self.split.validate()
    }
}

/// Builder over [`ProjectionConfig`], starting from the defaults
#[derive(Debug, Clone, Default)]
pub struct ProjectionConfigBuilder {
    config: ProjectionConfig,
}

impl ProjectionConfigBuilder {
    pub fn contract_value(mut self, value: f64) -> Self {
        self.config.contract_value = value;
        self
    }

    pub fn land_cost(mut self, cost: f64) -> Self {
        self.config.land_cost = cost;
        self
    }

    pub fn land_installments(mut self, count: usize) -> Self {
        self.config.land_installments = count;
        self
    }

    pub fn periodic_rate(mut self, rate: f64) -> Self {
        self.config.periodic_rate = rate;
        self
    }

    pub fn start_period(mut self, period: usize) -> Self {
        self.config.start_period = period;
        self
    }

    pub fn curve(mut self, curve: CurveVariant) -> Self {
        self.config.curve = curve;
        self
    }

    pub fn construction(mut self, start: usize, duration: usize) -> Self {
        self.config.construction_start = start;
        self.config.construction_duration = duration;
        self
    }

    pub fn horizon(mut self, months: usize) -> Self {
        self.config.horizon = months;
        self
    }

    pub fn split(mut self, split: PaymentSplit) -> Self {
        self.config.split = split;
        self
    }

    pub fn amortization_term(mut self, term: AmortizationTerm) -> Self {
        self.config.amortization_term = term;
        self
    }

    pub fn irr_guess(mut self, guess: f64) -> Self {
        self.config.irr_guess = guess;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> ConfigResult<ProjectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProjectionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delivery_period(), 36);
    }

    #[test]
    fn test_delivery_period_follows_construction() {
        let config = ProjectionConfig::builder().construction(13, 24).build().unwrap();
        assert_eq!(config.delivery_period(), 36);
    }

    #[test]
    fn test_rejects_zero_installments() {
        let err = ProjectionConfig::builder().land_installments(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroInstallments);
    }

    #[test]
    fn test_rejects_installments_beyond_horizon() {
        let err = ProjectionConfig::builder()
            .horizon(12)
            .land_installments(13)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InstallmentsBeyondHorizon { count: 13, horizon: 12 });
    }

    #[test]
    fn test_rejects_zero_horizon() {
        let err = ProjectionConfig::builder().horizon(0).build().unwrap_err();
        assert_eq!(err, ConfigError::ZeroHorizon);
    }

    #[test]
    fn test_rejects_start_beyond_horizon() {
        let err = ProjectionConfig::builder().start_period(121).build().unwrap_err();
        assert_eq!(err, ConfigError::StartPeriodOutOfRange { start: 121, horizon: 120 });
        assert!(ProjectionConfig::builder().start_period(0).build().is_err());
    }

    #[test]
    fn test_rejects_bad_amounts_and_rates() {
        assert!(ProjectionConfig::builder().land_cost(0.0).build().is_err());
        assert!(ProjectionConfig::builder().contract_value(f64::NAN).build().is_err());
        assert_eq!(
            ProjectionConfig::builder().periodic_rate(-0.01).build().unwrap_err(),
            ConfigError::InvalidRate(-0.01)
        );
        assert!(ProjectionConfig::builder().construction(1, 0).build().is_err());
        assert!(ProjectionConfig::builder().irr_guess(-1.0).build().is_err());
    }

    #[test]
    fn test_rejects_unbalanced_split() {
        let split = PaymentSplit { entry: 0.10, installments: 0.20, delivery: 0.60 };
        let err = ProjectionConfig::builder().split(split).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPaymentSplit { .. }));
    }

    #[test]
    fn test_rejects_zero_fixed_term_and_bad_curve() {
        assert_eq!(
            ProjectionConfig::builder()
                .amortization_term(AmortizationTerm::Fixed(0))
                .build()
                .unwrap_err(),
            ConfigError::ZeroAmortizationTerm
        );
        let curve = CurveVariant::Custom { initial: 1.5, monthly: 0.1 };
        assert!(ProjectionConfig::builder().curve(curve).build().is_err());
    }

    #[test]
    fn test_rejects_fixed_term_longer_than_horizon() {
        let err = ProjectionConfig::builder()
            .amortization_term(AmortizationTerm::Fixed(usize::MAX))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::AmortizationTermBeyondHorizon { term: usize::MAX, horizon: 120 });

        let err = ProjectionConfig::builder()
            .amortization_term(AmortizationTerm::Fixed(121))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::AmortizationTermBeyondHorizon { term: 121, horizon: 120 });
        assert!(ProjectionConfig::builder().amortization_term(AmortizationTerm::Fixed(120)).build().is_ok());
    }

    #[test]
    fn test_rejects_delivery_that_overflows_or_lies_far_out() {
        let err = ProjectionConfig::builder().construction(usize::MAX, 2).build().unwrap_err();
        assert_eq!(
            err,
            ConfigError::DeliveryOutOfRange { start: usize::MAX, duration: 2, horizon: 120 }
        );
        assert!(ProjectionConfig::builder().construction(1, usize::MAX).build().is_err());
        assert!(ProjectionConfig::builder().construction(200, 50).build().is_err());

        // Up to one horizon past the end is still projected, with truncation
        let config = ProjectionConfig::builder().horizon(24).construction(1, 48).build().unwrap();
        assert_eq!(config.delivery_period(), 48);
    }

    #[test]
    fn test_rejects_oversized_horizon() {
        let err = ProjectionConfig::builder().horizon(usize::MAX).build().unwrap_err();
        assert_eq!(err, ConfigError::HorizonTooLong { horizon: usize::MAX, max: MAX_HORIZON });
        assert!(ProjectionConfig::builder().horizon(MAX_HORIZON).build().is_ok());
    }

    #[test]
    fn test_delivery_period_saturates() {
        let config = ProjectionConfig {
            construction_start: usize::MAX,
            construction_duration: 2,
            ..ProjectionConfig::default()
        };
        assert_eq!(config.delivery_period(), usize::MAX);
    }

    #[test]
    fn test_amortization_term_lengths() {
        let term = AmortizationTerm::UntilDelivery;
        assert_eq!(term.installments(1, 36), 35);
        assert_eq!(term.installments(35, 36), 1);
        assert_eq!(term.installments(36, 36), 1);
        assert_eq!(term.installments(50, 36), 1);
        assert_eq!(AmortizationTerm::Fixed(48).installments(50, 36), 48);
    }
}
