use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

/// Days per month used by every monthly projection.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Business parameters of the franchise concept. Externally loaded, never
/// hard-coded inside the scoring or projection logic.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessParams {
    /// Average ticket per customer, in the operating currency.
    pub average_ticket: f64,
    /// Up-front investment to open a location.
    pub base_investment: f64,
    /// Target operating margin the brand underwrites against, 0-1.
    pub operating_margin: f64,
    /// Customers per day a healthy location is expected to serve.
    pub daily_customer_target: f64,
}

impl Default for BusinessParams {
    fn default() -> Self {
        Self {
            average_ticket: 185.0,
            base_investment: 900_000.0,
            operating_margin: 0.15,
            daily_customer_target: 220.0,
        }
    }
}

impl BusinessParams {
    /// Monthly revenue at the daily customer target.
    pub fn target_monthly_revenue(&self) -> f64 {
        self.average_ticket * self.daily_customer_target * DAYS_PER_MONTH
    }
}

/// Parameters of the gravity (Huff) cannibalization model.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HuffConfig {
    /// Distance-friction exponent. ~2.0 fits quick-service dining: demand
    /// falls off with roughly the square of distance.
    pub lambda: f64,
}

impl Default for HuffConfig {
    fn default() -> Self {
        Self { lambda: 2.0 }
    }
}

/// Top-level configuration, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub business: BusinessParams,

    #[serde(default)]
    pub huff: HuffConfig,
}
