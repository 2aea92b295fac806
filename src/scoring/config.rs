use serde::{Deserialize, Serialize};

/// Tolerance used when checking that weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Which aggregation strategy scores a candidate.
///
/// `weighted` is the configurable proportional sum; `budgeted` is the
/// stricter confidence-weighted variant with fixed point budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Weighted,
    Budgeted,
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::Budgeted
    }
}

/// Per-factor weights for the proportional strategy. Must sum to 1.0
/// (within [`WEIGHT_SUM_TOLERANCE`]); call [`FactorWeights::normalize`] to
/// rescale a hand-edited set without changing the relative ratios.
///
/// Example YAML:
/// ```yaml
/// weights:
///   nse: 0.20
///   foot_traffic: 0.20
///   own_brand_distance: 0.15
///   competitor_distance: 0.10
///   competitor_density: 0.15
///   rent: 0.10
///   rating: 0.10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FactorWeights {
    pub nse: f64,
    pub foot_traffic: f64,
    pub own_brand_distance: f64,
    pub competitor_distance: f64,
    pub competitor_density: f64,
    pub rent: f64,
    pub rating: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            nse: 0.20,
            foot_traffic: 0.20,
            own_brand_distance: 0.15,
            competitor_distance: 0.10,
            competitor_density: 0.15,
            rent: 0.10,
            rating: 0.10,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.nse
            + self.foot_traffic
            + self.own_brand_distance
            + self.competitor_distance
            + self.competitor_density
            + self.rent
            + self.rating
    }

    /// Rescale so the weights sum to 1.0, preserving pairwise ratios.
    /// A zero-sum set is left untouched (validation rejects it anyway).
    pub fn normalize(&mut self) {
        let total = self.sum();
        if total > 0.0 {
            let factor = 1.0 / total;
            self.nse *= factor;
            self.foot_traffic *= factor;
            self.own_brand_distance *= factor;
            self.competitor_distance *= factor;
            self.competitor_density *= factor;
            self.rent *= factor;
            self.rating *= factor;
        }
    }
}

/// Classification cut-offs for the proportional strategy, 0-100.
/// `viable` must be strictly above `evaluate`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    pub evaluate: f64,
    pub viable: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            evaluate: 45.0,
            viable: 60.0,
        }
    }
}

/// Main scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   strategy: budgeted
///   thresholds: { evaluate: 45, viable: 60 }
///   weights:
///     nse: 0.20
///     foot_traffic: 0.20
///     own_brand_distance: 0.15
///     competitor_distance: 0.10
///     competitor_density: 0.15
///     rent: 0.10
///     rating: 0.10
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    #[serde(default)]
    pub weights: FactorWeights,

    #[serde(default)]
    pub thresholds: Thresholds,
}
