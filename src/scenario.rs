//! Scenario runner for batch projections
//!
//! Holds a base configuration and fans runs out across the rayon pool. Every run
//! builds its own engine, so nothing is shared between projections.

use log::info;
use rayon::prelude::*;

use crate::error::ConfigResult;
use crate::loader::Deal;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::schedule::CurveVariant;

/// Runner for one base deal and its variations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::with_config(config);
/// for (variant, result) in runner.compare_curves()? {
///     println!("{}: {:?}", variant, result.indicators.irr);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the default deal
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { base_config: config }
    }

    /// Project the base deal
    pub fn run(&self) -> ConfigResult<ProjectionResult> {
        run_config(&self.base_config)
    }

    /// Project the base deal under a different sales curve
    pub fn run_with_curve(&self, curve: CurveVariant) -> ConfigResult<ProjectionResult> {
        let config = ProjectionConfig {
            curve,
            ..self.base_config.clone()
        };
        run_config(&config)
    }

    /// Project the base deal under each standard curve, pessimistic first
    pub fn compare_curves(&self) -> ConfigResult<Vec<(CurveVariant, ProjectionResult)>> {
        self.base_config.validate()?;
        CurveVariant::STANDARD
            .par_iter()
            .map(|&curve| self.run_with_curve(curve).map(|result| (curve, result)))
            .collect()
    }

    /// Project many configurations in parallel, preserving input order
    pub fn run_batch(&self, configs: &[ProjectionConfig]) -> Vec<ConfigResult<ProjectionResult>> {
        info!("Running {} projections", configs.len());
        configs.par_iter().map(run_config).collect()
    }

    /// Project named deals in parallel
    pub fn run_deals<'a>(&self, deals: &'a [Deal]) -> Vec<(&'a str, ConfigResult<ProjectionResult>)> {
        info!("Running {} deals", deals.len());
        deals
            .par_iter()
            .map(|deal| (deal.name.as_str(), run_config(&deal.config)))
            .collect()
    }

    pub fn config_mut(&mut self) -> &mut ProjectionConfig {
        &mut self.base_config
    }
}

fn run_config(config: &ProjectionConfig) -> ConfigResult<ProjectionResult> {
    Ok(ProjectionEngine::new(config.clone())?.project())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_compare_curves_in_standard_order() {
        let runner = ScenarioRunner::new();
        let results = runner.compare_curves().unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, CurveVariant::Pessimistic);
        assert_eq!(results[2].0, CurveVariant::Optimistic);
        for (_, result) in &results {
            assert!(result.indicators.irr.is_some());
            assert_eq!(result.rows.len(), 120);
        }

        // Faster sales bring the entry payments forward
        let first_month = |i: usize| results[i].1.investor_flows[0];
        assert!(first_month(0) < first_month(1));
        assert!(first_month(1) < first_month(2));
    }

    #[test]
    fn test_batch_keeps_order_and_reports_bad_configs() {
        let runner = ScenarioRunner::new();
        let configs = vec![
            ProjectionConfig::default(),
            ProjectionConfig { horizon: 0, ..ProjectionConfig::default() },
            ProjectionConfig { land_cost: 150_000.0, ..ProjectionConfig::default() },
        ];

        let results = runner.run_batch(&configs);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err(), &ConfigError::ZeroHorizon);

        // Same receivables on half the land cost
        let base_moic = results[0].as_ref().unwrap().indicators.moic;
        let cheap_moic = results[2].as_ref().unwrap().indicators.moic;
        assert!(cheap_moic > base_moic);
    }

    #[test]
    fn test_run_projects_the_base_deal() {
        let config = ProjectionConfig { curve: CurveVariant::Optimistic, ..ProjectionConfig::default() };
        let runner = ScenarioRunner::with_config(config.clone());

        let result = runner.run().unwrap();
        let direct = ProjectionEngine::new(config).unwrap().project();
        assert_eq!(result.investor_flows, direct.investor_flows);
        assert_eq!(result.rows, runner.run_with_curve(CurveVariant::Optimistic).unwrap().rows);

        let mut runner = runner;
        runner.config_mut().horizon = 0;
        assert_eq!(runner.run().unwrap_err(), ConfigError::ZeroHorizon);
    }

    #[test]
    fn test_compare_curves_rejects_invalid_base() {
        let mut runner = ScenarioRunner::new();
        runner.config_mut().land_installments = 0;
        assert!(runner.compare_curves().is_err());
    }
}
