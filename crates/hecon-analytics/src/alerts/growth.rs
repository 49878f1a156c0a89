//! Pluggable per-unit growth estimators for predictive alerts.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::aggregate::UnitProfile;
use crate::forecast::fit_trend;
use crate::stats::{mean, percentile};

/// Percentiles of the unit population a single unit is judged against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeerStats {
    pub billed_p75: f64,
    pub billed_p90: f64,
    pub encounters_p50: f64,
    pub encounters_p75: f64,
}

impl PeerStats {
    /// `None` when there are no units.
    pub fn from_units(units: &[UnitProfile]) -> Option<Self> {
        let billed: Vec<f64> = units.iter().map(|u| u.billed_total).collect();
        let encounters: Vec<f64> = units.iter().map(|u| u.encounters as f64).collect();
        Some(Self {
            billed_p75: percentile(&billed, 75.0)?,
            billed_p90: percentile(&billed, 90.0)?,
            encounters_p50: percentile(&encounters, 50.0)?,
            encounters_p75: percentile(&encounters, 75.0)?,
        })
    }
}

/// Estimates the fractional change expected for a unit (0.05 = +5%).
pub trait GrowthEstimator {
    fn estimate_growth(&self, unit: &UnitProfile, peers: &PeerStats) -> f64;

    /// Name reported in the model summary.
    fn name(&self) -> &'static str;
}

/// Seeded normal draw whose spread depends on the unit's revenue tier.
///
/// Units above the billed p90 draw from N(0.03, 0.05), above p75 from
/// N(0.05, 0.08), the rest from N(0.02, 0.12). The draw is a function of
/// the seed and the unit name only.
#[derive(Debug, Clone, Copy)]
pub struct NormalNoise {
    pub seed: u64,
}

impl NormalNoise {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn unit_seed(&self, unit: &str) -> u64 {
        // FNV-1a over the unit name, starting from the run seed.
        unit.bytes().fold(self.seed ^ 0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
    }
}

impl GrowthEstimator for NormalNoise {
    fn estimate_growth(&self, unit: &UnitProfile, peers: &PeerStats) -> f64 {
        let (center, spread) = if unit.billed_total > peers.billed_p90 {
            (0.03, 0.05)
        } else if unit.billed_total > peers.billed_p75 {
            (0.05, 0.08)
        } else {
            (0.02, 0.12)
        };
        let mut rng = StdRng::seed_from_u64(self.unit_seed(&unit.unit));
        Normal::new(center, spread).map_or(0.0, |normal| normal.sample(&mut rng))
    }

    fn name(&self) -> &'static str {
        "normal_noise"
    }
}

/// Slope of the unit's own monthly billed series relative to its mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendSlope;

impl GrowthEstimator for TrendSlope {
    fn estimate_growth(&self, unit: &UnitProfile, _peers: &PeerStats) -> f64 {
        let values: Vec<Option<f64>> = unit.monthly_billed.iter().copied().map(Some).collect();
        let model = fit_trend(&values);
        match mean(&unit.monthly_billed) {
            Some(avg) if avg > 0.0 && !model.is_degenerate() => model.slope() / avg,
            _ => 0.0,
        }
    }

    fn name(&self) -> &'static str {
        "trend_slope"
    }
}

/// No change predicted; disables predictive alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flat;

impl GrowthEstimator for Flat {
    fn estimate_growth(&self, _unit: &UnitProfile, _peers: &PeerStats) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "flat"
    }
}

/// Estimator selection as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    #[default]
    NormalNoise,
    TrendSlope,
    Flat,
}

impl EstimatorKind {
    pub fn build(self, seed: u64) -> Box<dyn GrowthEstimator> {
        match self {
            EstimatorKind::NormalNoise => Box::new(NormalNoise::new(seed)),
            EstimatorKind::TrendSlope => Box::new(TrendSlope),
            EstimatorKind::Flat => Box::new(Flat),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EstimatorKind::NormalNoise => "normal_noise",
            EstimatorKind::TrendSlope => "trend_slope",
            EstimatorKind::Flat => "flat",
        }
    }
}
