//! Load deal definitions from CSV
//!
//! Expected header:
//! `Deal,ContractValue,LandCost,LandInstallments,MonthlyRate,StartPeriod,Curve,ConstructionStart,ConstructionDuration[,Horizon][,AmortizationMonths]`
//!
//! `Horizon` defaults to 120 months. When `AmortizationMonths` is present every
//! sale uses that fixed SAC term instead of amortizing until delivery.

use csv::Reader;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::projection::{AmortizationTerm, ProjectionConfig, DEFAULT_HORIZON};
use crate::schedule::CurveVariant;

/// A named, validated projection configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub name: String,
    pub config: ProjectionConfig,
}

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Deal")]
    deal: String,
    #[serde(rename = "ContractValue")]
    contract_value: f64,
    #[serde(rename = "LandCost")]
    land_cost: f64,
    #[serde(rename = "LandInstallments")]
    land_installments: usize,
    #[serde(rename = "MonthlyRate")]
    monthly_rate: f64,
    #[serde(rename = "StartPeriod")]
    start_period: usize,
    #[serde(rename = "Curve")]
    curve: String,
    #[serde(rename = "ConstructionStart")]
    construction_start: usize,
    #[serde(rename = "ConstructionDuration")]
    construction_duration: usize,
    #[serde(rename = "Horizon", default)]
    horizon: Option<usize>,
    #[serde(rename = "AmortizationMonths", default)]
    amortization_months: Option<usize>,
}

impl CsvRow {
    fn into_deal(self) -> Result<Deal, LoadError> {
        let curve: CurveVariant = self.curve.parse().map_err(LoadError::UnknownCurve)?;
        let term = self
            .amortization_months
            .map_or(AmortizationTerm::UntilDelivery, AmortizationTerm::Fixed);

        let config = ProjectionConfig::builder()
            .contract_value(self.contract_value)
            .land_cost(self.land_cost)
            .land_installments(self.land_installments)
            .periodic_rate(self.monthly_rate)
            .start_period(self.start_period)
            .curve(curve)
            .construction(self.construction_start, self.construction_duration)
            .horizon(self.horizon.unwrap_or(DEFAULT_HORIZON))
            .amortization_term(term)
            .build()
            .map_err(|source| LoadError::Config {
                deal: self.deal.clone(),
                source,
            })?;

        Ok(Deal {
            name: self.deal,
            config,
        })
    }
}

/// Load all deals from a CSV file
pub fn load_deals<P: AsRef<Path>>(path: P) -> Result<Vec<Deal>, LoadError> {
    read_deals(Reader::from_path(path)?)
}

/// Load deals from any reader (e.g., string buffer, stdin)
pub fn load_deals_from_reader<R: Read>(reader: R) -> Result<Vec<Deal>, LoadError> {
    read_deals(Reader::from_reader(reader))
}

fn read_deals<R: Read>(mut reader: Reader<R>) -> Result<Vec<Deal>, LoadError> {
    let mut deals = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        deals.push(row.into_deal()?);
    }
    Ok(deals)
}
