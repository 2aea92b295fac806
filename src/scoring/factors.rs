use serde::Serialize;

use crate::config::BusinessParams;
use crate::locations::{CandidateLocation, ConfidenceDatum, NseTier, COMPETITOR_RADIUS_KM};

/// Factor confidence used for values measured by the mapping pipeline
/// (distances, competitor counts) rather than estimated by a provider.
const MEASURED_CONFIDENCE: f64 = 100.0;

/// Fraction at or above which a factor counts as a positive signal.
const POSITIVE_CUTOFF: f64 = 0.6;

/// The seven site factors. `CompetitorDistance` only participates in the
/// proportional strategy; the budgeted strategy folds competition into the
/// density factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Factor {
    Nse,
    FootTraffic,
    OwnBrandDistance,
    CompetitorDistance,
    CompetitorDensity,
    Rent,
    Rating,
}

impl Factor {
    pub fn label(&self) -> &'static str {
        match self {
            Factor::Nse => "NSE",
            Factor::FootTraffic => "Foot traffic",
            Factor::OwnBrandDistance => "Own-brand distance",
            Factor::CompetitorDistance => "Competitor distance",
            Factor::CompetitorDensity => "Competitor density",
            Factor::Rent => "Rent burden",
            Factor::Rating => "Rating",
        }
    }
}

/// An ordered step ladder: rows are `(lower_bound, fraction)` with bounds
/// descending, first matching row wins. One shared lookup keeps every
/// bucketed evaluator on the same code path, so the two strategies can never
/// disagree about where a bucket starts.
pub struct PointScale {
    rows: &'static [(f64, f64)],
}

impl PointScale {
    pub const fn new(rows: &'static [(f64, f64)]) -> Self {
        Self { rows }
    }

    /// Fraction of the factor maximum awarded for `value`.
    pub fn fraction(&self, value: f64) -> f64 {
        for &(bound, fraction) in self.rows {
            if value >= bound {
                return fraction;
            }
        }
        // Rows end with a 0.0 bound, so only negative input lands here.
        0.0
    }
}

/// Foot-traffic index, 0-100, six buckets.
pub const FOOT_TRAFFIC_SCALE: PointScale = PointScale::new(&[
    (85.0, 1.0),
    (70.0, 0.84),
    (55.0, 0.64),
    (40.0, 0.44),
    (25.0, 0.24),
    (0.0, 0.0),
]);

/// Distance to the nearest own-brand site, km. Below 2 km the candidate sits
/// inside an existing trade area and earns nothing.
pub const OWN_BRAND_DISTANCE_SCALE: PointScale = PointScale::new(&[
    (8.0, 1.0),
    (5.0, 0.73),
    (3.5, 0.53),
    (2.0, 0.27),
    (0.0, 0.0),
]);

/// Distance to the nearest primary competitor, km.
pub const COMPETITOR_DISTANCE_SCALE: PointScale =
    PointScale::new(&[(3.0, 1.0), (2.0, 0.7), (1.0, 0.4), (0.0, 0.1)]);

/// Competitor count inside the fixed radius. Zero competitors earns the
/// maximum; five or more earns nothing.
pub const COMPETITOR_DENSITY_SCALE: PointScale = PointScale::new(&[
    (5.0, 0.0),
    (4.0, 0.2),
    (3.0, 0.4),
    (2.0, 0.6),
    (1.0, 0.8),
    (0.0, 1.0),
]);

/// Rent burden: asking rent over the business target monthly revenue.
/// Anchored to the 15% rent cap the financial viability gate enforces.
pub const RENT_BURDEN_SCALE: PointScale = PointScale::new(&[
    (0.20, 0.0),
    (0.15, 0.25),
    (0.12, 0.5),
    (0.08, 0.75),
    (0.0, 1.0),
]);

/// Place rating, 0-5.
pub const RATING_SCALE: PointScale = PointScale::new(&[
    (4.5, 1.0),
    (4.0, 0.8),
    (3.5, 0.55),
    (3.0, 0.3),
    (0.0, 0.1),
]);

/// Reviews below this count cap the rating factor's confidence.
const THIN_REVIEW_COUNT: u32 = 20;
const THIN_REVIEW_CONFIDENCE_CAP: f64 = 40.0;

/// The raw outcome of one factor evaluator: a fraction of whatever maximum
/// the aggregation strategy allocates, plus the confidence and rationale that
/// travel into the breakdown.
#[derive(Debug, Clone)]
pub struct FactorReading {
    pub factor: Factor,
    /// 0.0 - 1.0 of the factor maximum.
    pub fraction: f64,
    /// 0 - 100.
    pub confidence: f64,
    pub rationale: String,
}

impl FactorReading {
    pub fn is_positive(&self) -> bool {
        self.fraction >= POSITIVE_CUTOFF
    }
}

fn nse_fraction(tier: NseTier) -> f64 {
    match tier {
        NseTier::A => 1.0,
        NseTier::B => 0.8,
        NseTier::CPlus => 0.6,
        NseTier::C => 0.32,
        NseTier::D => 0.0,
    }
}

pub fn evaluate_nse(datum: &ConfidenceDatum<NseTier>) -> FactorReading {
    FactorReading {
        factor: Factor::Nse,
        fraction: nse_fraction(datum.value),
        confidence: datum.confidence,
        rationale: format!("NSE {} trade area ({})", datum.value.label(), datum.source),
    }
}

pub fn evaluate_foot_traffic(datum: &ConfidenceDatum<f64>) -> FactorReading {
    FactorReading {
        factor: Factor::FootTraffic,
        fraction: FOOT_TRAFFIC_SCALE.fraction(datum.value),
        confidence: datum.confidence,
        rationale: format!(
            "foot-traffic index {:.0} ({})",
            datum.value, datum.source
        ),
    }
}

pub fn evaluate_own_brand_distance(km: f64) -> FactorReading {
    let fraction = OWN_BRAND_DISTANCE_SCALE.fraction(km);
    let rationale = if km < 2.0 {
        format!("{:.1} km from own brand, inside an existing trade area", km)
    } else {
        format!("{:.1} km from the nearest own-brand site", km)
    };
    FactorReading {
        factor: Factor::OwnBrandDistance,
        fraction,
        confidence: MEASURED_CONFIDENCE,
        rationale,
    }
}

pub fn evaluate_competitor_distance(km: f64) -> FactorReading {
    FactorReading {
        factor: Factor::CompetitorDistance,
        fraction: COMPETITOR_DISTANCE_SCALE.fraction(km),
        confidence: MEASURED_CONFIDENCE,
        rationale: format!("{:.1} km to the nearest primary competitor", km),
    }
}

pub fn evaluate_competitor_density(count: u32) -> FactorReading {
    FactorReading {
        factor: Factor::CompetitorDensity,
        fraction: COMPETITOR_DENSITY_SCALE.fraction(count as f64),
        confidence: MEASURED_CONFIDENCE,
        rationale: format!(
            "{} competitors within {:.0} km",
            count, COMPETITOR_RADIUS_KM
        ),
    }
}

pub fn evaluate_rent(
    rent: &ConfidenceDatum<f64>,
    business: &BusinessParams,
) -> FactorReading {
    let target = business.target_monthly_revenue();
    let burden = if target > 0.0 { rent.value / target } else { 1.0 };
    FactorReading {
        factor: Factor::Rent,
        fraction: RENT_BURDEN_SCALE.fraction(burden),
        confidence: rent.confidence,
        rationale: format!(
            "rent {:.0}/month is {:.0}% of target revenue ({})",
            rent.value,
            burden * 100.0,
            rent.source
        ),
    }
}

pub fn evaluate_rating(
    rating: &ConfidenceDatum<f64>,
    review_count: Option<u32>,
) -> FactorReading {
    let reviews = review_count.unwrap_or(0);
    let confidence = if reviews < THIN_REVIEW_COUNT {
        rating.confidence.min(THIN_REVIEW_CONFIDENCE_CAP)
    } else {
        rating.confidence
    };
    FactorReading {
        factor: Factor::Rating,
        fraction: RATING_SCALE.fraction(rating.value),
        confidence,
        rationale: format!(
            "rated {:.1} across {} reviews ({})",
            rating.value, reviews, rating.source
        ),
    }
}

/// Evaluate one factor against a candidate. Returns None when an optional
/// input (rent, rating) is absent; the strategies decide what absence means.
pub fn read_factor(
    factor: Factor,
    candidate: &CandidateLocation,
    business: &BusinessParams,
) -> Option<FactorReading> {
    match factor {
        Factor::Nse => Some(evaluate_nse(&candidate.nse)),
        Factor::FootTraffic => Some(evaluate_foot_traffic(&candidate.foot_traffic)),
        Factor::OwnBrandDistance => {
            Some(evaluate_own_brand_distance(candidate.own_brand_distance_km))
        }
        Factor::CompetitorDistance => {
            Some(evaluate_competitor_distance(candidate.competitor_distance_km))
        }
        Factor::CompetitorDensity => {
            Some(evaluate_competitor_density(candidate.competitors_within_radius))
        }
        Factor::Rent => candidate
            .monthly_rent
            .as_ref()
            .map(|rent| evaluate_rent(rent, business)),
        Factor::Rating => candidate
            .rating
            .as_ref()
            .map(|rating| evaluate_rating(rating, candidate.review_count)),
    }
}
