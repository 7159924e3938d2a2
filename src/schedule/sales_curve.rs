//! Sales curves: which fraction of the total contract value is sold in each month

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remaining fraction below which the curve counts as fully sold
const SOLD_OUT_EPSILON: f64 = 1e-12;

/// Sales velocity scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveVariant {
    /// 35% at launch, 6% per month afterwards
    Normal,
    /// 50% at launch, 10% per month afterwards
    Optimistic,
    /// 20% at launch, 5% per month afterwards
    Pessimistic,
    /// Arbitrary launch and monthly fractions
    Custom { initial: f64, monthly: f64 },
}

impl CurveVariant {
    /// The three standard scenarios, in display order
    pub const STANDARD: [CurveVariant; 3] = [
        CurveVariant::Pessimistic,
        CurveVariant::Normal,
        CurveVariant::Optimistic,
    ];

    /// Fraction sold in the launch month
    pub fn initial_fraction(&self) -> f64 {
        match self {
            CurveVariant::Normal => 0.35,
            CurveVariant::Optimistic => 0.50,
            CurveVariant::Pessimistic => 0.20,
            CurveVariant::Custom { initial, .. } => *initial,
        }
    }

    /// Fraction sold in each month after launch
    pub fn monthly_fraction(&self) -> f64 {
        match self {
            CurveVariant::Normal => 0.06,
            CurveVariant::Optimistic => 0.10,
            CurveVariant::Pessimistic => 0.05,
            CurveVariant::Custom { monthly, .. } => *monthly,
        }
    }

    /// Whether both fractions lie in [0, 1]
    pub fn is_valid(&self) -> bool {
        let in_unit = |x: f64| x.is_finite() && (0.0..=1.0).contains(&x);
        in_unit(self.initial_fraction()) && in_unit(self.monthly_fraction())
    }
}

impl Default for CurveVariant {
    fn default() -> Self {
        CurveVariant::Normal
    }
}

impl fmt::Display for CurveVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveVariant::Normal => write!(f, "Normal"),
            CurveVariant::Optimistic => write!(f, "Optimistic"),
            CurveVariant::Pessimistic => write!(f, "Pessimistic"),
            CurveVariant::Custom { initial, monthly } => {
                write!(f, "Custom({:.2}/{:.2})", initial, monthly)
            }
        }
    }
}

impl FromStr for CurveVariant {
    type Err = String;

    /// Parses the standard names (case-insensitive, English or Portuguese)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(CurveVariant::Normal),
            "optimistic" | "otimista" => Ok(CurveVariant::Optimistic),
            "pessimistic" | "pessimista" => Ok(CurveVariant::Pessimistic),
            other => Err(other.to_string()),
        }
    }
}

/// Distribute sales over `horizon` months starting at `start_period` (1-indexed).
///
/// The launch month receives the initial fraction; each following month receives the
/// monthly fraction, clamped so the cumulative never exceeds 100%. A start period
/// outside `1..=horizon` yields a curve with no sales.
pub fn build_sales_curve(start_period: usize, horizon: usize, variant: CurveVariant) -> Vec<f64> {
    let mut curve = vec![0.0; horizon];
    if start_period == 0 || start_period > horizon {
        return curve;
    }

    let launch = variant.initial_fraction().min(1.0);
    curve[start_period - 1] = launch;
    let mut cumulative = launch;

    for slot in curve.iter_mut().skip(start_period) {
        let remaining = 1.0 - cumulative;
        if remaining <= SOLD_OUT_EPSILON {
            break;
        }
        let sold = variant.monthly_fraction().min(remaining);
        *slot = sold;
        cumulative += sold;
    }

    curve
}
