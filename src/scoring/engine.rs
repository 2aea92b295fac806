use serde::Serialize;

use super::config::{StrategyKind, Thresholds};
use super::factors::{read_factor, Factor, FactorReading};
use crate::config::Config;
use crate::locations::CandidateLocation;

/// Factor order for the proportional strategy; weights come from config.
const WEIGHTED_FACTORS: [Factor; 7] = [
    Factor::Nse,
    Factor::FootTraffic,
    Factor::OwnBrandDistance,
    Factor::CompetitorDistance,
    Factor::CompetitorDensity,
    Factor::Rent,
    Factor::Rating,
];

/// Fixed point budgets for the budgeted strategy. The budget IS the weight:
/// a factor contributes `fraction x budget` directly. Sums to 100.
const BUDGETED_FACTORS: [(Factor, f64); 6] = [
    (Factor::Nse, 25.0),
    (Factor::FootTraffic, 25.0),
    (Factor::OwnBrandDistance, 15.0),
    (Factor::CompetitorDensity, 15.0),
    (Factor::Rent, 10.0),
    (Factor::Rating, 10.0),
];

// Budgeted classification ladder.
const EXCELLENT_FLOOR: f64 = 75.0;
const GOOD_FLOOR: f64 = 60.0;
const EVALUATE_FLOOR: f64 = 45.0;
const RISKY_FLOOR: f64 = 30.0;

/// Below this global confidence the budgeted result carries a verify-first
/// alert at the head of the alert list.
const LOW_CONFIDENCE_FLOOR: f64 = 60.0;

/// Decision tier for a scored candidate. The proportional strategy uses the
/// three config-driven tiers (Viable / Evaluate / NotViable); the budgeted
/// strategy uses the five fixed tiers (Excellent / Good / Evaluate / Risky /
/// NotViable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    Excellent,
    Good,
    Viable,
    Evaluate,
    Risky,
    NotViable,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Excellent => "EXCELLENT",
            Classification::Good => "GOOD",
            Classification::Viable => "VIABLE",
            Classification::Evaluate => "EVALUATE",
            Classification::Risky => "RISKY",
            Classification::NotViable => "NOT VIABLE",
        }
    }

    /// Tiers worth pursuing without a strategic override.
    pub fn is_favorable(&self) -> bool {
        matches!(
            self,
            Classification::Excellent | Classification::Good | Classification::Viable
        )
    }
}

/// One factor's contribution to a score, for the breakdown the report layer
/// prints. Built fresh per evaluation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub factor: Factor,
    pub points: f64,
    pub max_points: f64,
    pub confidence: f64,
    pub rationale: String,
    pub is_positive: bool,
}

impl FactorScore {
    fn from_reading(reading: FactorReading, max_points: f64) -> Self {
        Self {
            points: reading.fraction * max_points,
            max_points,
            confidence: reading.confidence,
            is_positive: reading.is_positive(),
            factor: reading.factor,
            rationale: reading.rationale,
        }
    }
}

/// The outcome of scoring one candidate. Plain serializable data; computed
/// fresh per candidate and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub strategy: &'static str,
    /// Total score, clamped to 0-100.
    pub score: f64,
    /// Confidence-weighted trust in the score; only the budgeted strategy
    /// tracks it.
    pub confidence: Option<f64>,
    pub classification: Classification,
    pub factors: Vec<FactorScore>,
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
    pub recommendation: String,
    pub alerts: Vec<String>,
}

/// Common seam over the two aggregation strategies, so the ranking layer can
/// switch between them without caring which is active.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, candidate: &CandidateLocation, config: &Config) -> ScoringResult;
}

pub fn strategy_for(kind: StrategyKind) -> &'static dyn Strategy {
    match kind {
        StrategyKind::Weighted => &WeightedStrategy,
        StrategyKind::Budgeted => &BudgetedStrategy,
    }
}

/// Three-tier classification against the configured thresholds.
pub fn classify_proportional(score: f64, thresholds: &Thresholds) -> Classification {
    if score >= thresholds.viable {
        Classification::Viable
    } else if score >= thresholds.evaluate {
        Classification::Evaluate
    } else {
        Classification::NotViable
    }
}

/// Five-tier classification on the fixed budgeted ladder.
pub fn classify_budgeted(score: f64) -> Classification {
    if score >= EXCELLENT_FLOOR {
        Classification::Excellent
    } else if score >= GOOD_FLOOR {
        Classification::Good
    } else if score >= EVALUATE_FLOOR {
        Classification::Evaluate
    } else if score >= RISKY_FLOOR {
        Classification::Risky
    } else {
        Classification::NotViable
    }
}

fn recommendation_for(classification: Classification) -> String {
    match classification {
        Classification::Excellent => "Prime candidate. Move to lease negotiation.",
        Classification::Good => "Strong candidate. Confirm rent terms and proceed.",
        Classification::Viable => "Meets the viability bar. Proceed with standard diligence.",
        Classification::Evaluate => "Borderline. Commission a field survey before committing.",
        Classification::Risky => "Weak signals. Only pursue with a compelling strategic reason.",
        Classification::NotViable => "Does not meet the bar. Discard.",
    }
    .to_string()
}

fn split_labels(factors: &[FactorScore]) -> (Vec<String>, Vec<String>) {
    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    for factor in factors {
        if factor.is_positive {
            positives.push(factor.factor.label().to_string());
        } else {
            negatives.push(factor.factor.label().to_string());
        }
    }
    (positives, negatives)
}

/// Proportional weighted sum: each factor scores 0-100 on its ladder and is
/// multiplied by its configured weight. Missing optional inputs are skipped
/// silently. No confidence tracking.
pub struct WeightedStrategy;

impl Strategy for WeightedStrategy {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn evaluate(&self, candidate: &CandidateLocation, config: &Config) -> ScoringResult {
        let weights = &config.scoring.weights;
        let mut factors = Vec::new();
        let mut score = 0.0;

        for factor in WEIGHTED_FACTORS {
            let weight = match factor {
                Factor::Nse => weights.nse,
                Factor::FootTraffic => weights.foot_traffic,
                Factor::OwnBrandDistance => weights.own_brand_distance,
                Factor::CompetitorDistance => weights.competitor_distance,
                Factor::CompetitorDensity => weights.competitor_density,
                Factor::Rent => weights.rent,
                Factor::Rating => weights.rating,
            };
            if let Some(reading) = read_factor(factor, candidate, &config.business) {
                let scored = FactorScore::from_reading(reading, weight * 100.0);
                score += scored.points;
                factors.push(scored);
            }
        }

        let score = score.clamp(0.0, 100.0);
        let classification = classify_proportional(score, &config.scoring.thresholds);
        let (positives, negatives) = split_labels(&factors);

        ScoringResult {
            strategy: self.name(),
            score,
            confidence: None,
            classification,
            factors,
            positives,
            negatives,
            recommendation: recommendation_for(classification),
            alerts: Vec::new(),
        }
    }
}

/// Confidence-weighted budgeted sum: fixed point budgets per factor, global
/// confidence as the budget-weighted average over the factors that were
/// actually evaluated. Skipped optional factors surface as data-quality
/// alerts instead of silent zeros.
pub struct BudgetedStrategy;

impl Strategy for BudgetedStrategy {
    fn name(&self) -> &'static str {
        "budgeted"
    }

    fn evaluate(&self, candidate: &CandidateLocation, config: &Config) -> ScoringResult {
        let mut factors = Vec::new();
        let mut alerts = Vec::new();
        let mut score = 0.0;
        let mut confidence_sum = 0.0;
        let mut budget_sum = 0.0;

        for (factor, budget) in BUDGETED_FACTORS {
            match read_factor(factor, candidate, &config.business) {
                Some(reading) => {
                    confidence_sum += reading.confidence * budget;
                    budget_sum += budget;
                    let scored = FactorScore::from_reading(reading, budget);
                    score += scored.points;
                    factors.push(scored);
                }
                None => {
                    alerts.push(format!(
                        "{} not provided: factor skipped, {:.0} points unreachable",
                        factor.label(),
                        budget
                    ));
                }
            }
        }

        let score = score.clamp(0.0, 100.0);
        let confidence = if budget_sum > 0.0 {
            confidence_sum / budget_sum
        } else {
            0.0
        };

        if confidence < LOW_CONFIDENCE_FLOOR {
            alerts.insert(
                0,
                format!(
                    "Overall data confidence {:.0}% is low: verify inputs before acting on this score",
                    confidence
                ),
            );
        }

        let classification = classify_budgeted(score);
        let (positives, negatives) = split_labels(&factors);

        ScoringResult {
            strategy: self.name(),
            score,
            confidence: Some(confidence),
            classification,
            factors,
            positives,
            negatives,
            recommendation: recommendation_for(classification),
            alerts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::{ConfidenceDatum, NseTier};

    fn sample_candidate(nse: NseTier, foot_traffic: f64) -> CandidateLocation {
        CandidateLocation {
            id: "test-01".to_string(),
            name: "Test site".to_string(),
            lat: 19.43,
            lon: -99.13,
            nse: ConfidenceDatum::new(nse, 95.0, "government-census"),
            foot_traffic: ConfidenceDatum::new(foot_traffic, 90.0, "betime"),
            own_brand_distance_km: 9.0,
            competitor_distance_km: 3.0,
            competitors_within_radius: 0,
            monthly_rent: None,
            rating: None,
            review_count: None,
        }
    }

    #[test]
    fn test_weighted_score_in_range() {
        let config = Config::default();
        let best = WeightedStrategy.evaluate(&sample_candidate(NseTier::A, 100.0), &config);
        assert!(best.score >= 0.0 && best.score <= 100.0);

        let mut worst_candidate = sample_candidate(NseTier::D, 0.0);
        worst_candidate.own_brand_distance_km = 0.5;
        worst_candidate.competitor_distance_km = 0.1;
        worst_candidate.competitors_within_radius = 9;
        let worst = WeightedStrategy.evaluate(&worst_candidate, &config);
        assert!(worst.score >= 0.0 && worst.score <= 100.0);
        assert!(best.score > worst.score);
    }

    #[test]
    fn test_weighted_monotonic_in_foot_traffic() {
        let config = Config::default();
        let mut last = -1.0;
        for traffic in [0.0, 20.0, 40.0, 60.0, 80.0, 100.0] {
            let result =
                WeightedStrategy.evaluate(&sample_candidate(NseTier::B, traffic), &config);
            assert!(
                result.score >= last,
                "score decreased when foot traffic rose to {}",
                traffic
            );
            last = result.score;
        }
    }

    #[test]
    fn test_weighted_skips_missing_optionals_silently() {
        let config = Config::default();
        let result = WeightedStrategy.evaluate(&sample_candidate(NseTier::B, 60.0), &config);
        // rent and rating absent: five factors evaluated, no alerts, no confidence
        assert_eq!(result.factors.len(), 5);
        assert!(result.alerts.is_empty());
        assert!(result.confidence.is_none());
    }

    #[test]
    fn test_classify_proportional_boundaries() {
        let thresholds = Thresholds {
            evaluate: 45.0,
            viable: 60.0,
        };
        assert_eq!(
            classify_proportional(60.0, &thresholds),
            Classification::Viable
        );
        assert_eq!(
            classify_proportional(59.9, &thresholds),
            Classification::Evaluate
        );
        assert_eq!(
            classify_proportional(45.0, &thresholds),
            Classification::Evaluate
        );
        assert_eq!(
            classify_proportional(44.9, &thresholds),
            Classification::NotViable
        );
    }

    #[test]
    fn test_classify_budgeted_boundaries() {
        assert_eq!(classify_budgeted(75.0), Classification::Excellent);
        assert_eq!(classify_budgeted(74.9), Classification::Good);
        assert_eq!(classify_budgeted(60.0), Classification::Good);
        assert_eq!(classify_budgeted(59.9), Classification::Evaluate);
        assert_eq!(classify_budgeted(45.0), Classification::Evaluate);
        assert_eq!(classify_budgeted(44.9), Classification::Risky);
        assert_eq!(classify_budgeted(30.0), Classification::Risky);
        assert_eq!(classify_budgeted(29.9), Classification::NotViable);
    }

    #[test]
    fn test_budgeted_prime_scenario_is_excellent() {
        // NSE A, traffic 85 at 90% confidence, 9 km from own brand, no
        // competitors in radius, rent and rating unknown.
        let config = Config::default();
        let result = BudgetedStrategy.evaluate(&sample_candidate(NseTier::A, 85.0), &config);

        // 25 + 25 + 15 + 15 with rent/rating skipped
        assert_eq!(result.score, 80.0);
        assert_eq!(result.classification, Classification::Excellent);
        assert!(result.confidence.unwrap() >= 80.0);
    }

    #[test]
    fn test_budgeted_missing_optionals_alert() {
        let config = Config::default();
        let result = BudgetedStrategy.evaluate(&sample_candidate(NseTier::A, 85.0), &config);
        assert_eq!(result.alerts.len(), 2);
        assert!(result.alerts[0].contains("Rent burden"));
        assert!(result.alerts[1].contains("Rating"));
    }

    #[test]
    fn test_budgeted_confidence_excludes_skipped_factors() {
        let config = Config::default();
        let result = BudgetedStrategy.evaluate(&sample_candidate(NseTier::A, 85.0), &config);
        // nse 95x25, traffic 90x25, distances 100x15 each over 80 budget points
        let expected = (95.0 * 25.0 + 90.0 * 25.0 + 100.0 * 15.0 + 100.0 * 15.0) / 80.0;
        assert!((result.confidence.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_budgeted_low_confidence_alert_prepended() {
        let config = Config::default();
        let mut candidate = sample_candidate(NseTier::B, 60.0);
        candidate.nse.confidence = 30.0;
        candidate.foot_traffic.confidence = 35.0;
        let result = BudgetedStrategy.evaluate(&candidate, &config);
        assert!(result.confidence.unwrap() < 60.0);
        assert!(result.alerts[0].contains("verify inputs"));
    }

    #[test]
    fn test_budgeted_full_candidate_has_no_alerts() {
        let config = Config::default();
        let mut candidate = sample_candidate(NseTier::A, 85.0);
        candidate.monthly_rent = Some(ConfidenceDatum::new(80_000.0, 85.0, "listing"));
        candidate.rating = Some(ConfidenceDatum::new(4.6, 80.0, "places-api"));
        candidate.review_count = Some(250);
        let result = BudgetedStrategy.evaluate(&candidate, &config);
        assert!(result.alerts.is_empty());
        assert_eq!(result.factors.len(), 6);
    }

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(strategy_for(StrategyKind::Weighted).name(), "weighted");
        assert_eq!(strategy_for(StrategyKind::Budgeted).name(), "budgeted");
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let config = Config::default();
        let candidate = sample_candidate(NseTier::B, 72.0);
        let a = BudgetedStrategy.evaluate(&candidate, &config);
        let b = BudgetedStrategy.evaluate(&candidate, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_positive_and_negative_labels() {
        let config = Config::default();
        let mut candidate = sample_candidate(NseTier::A, 85.0);
        candidate.competitors_within_radius = 6;
        let result = BudgetedStrategy.evaluate(&candidate, &config);
        assert!(result.positives.contains(&"NSE".to_string()));
        assert!(result
            .negatives
            .contains(&"Competitor density".to_string()));
    }
}
