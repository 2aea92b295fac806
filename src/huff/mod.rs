//! Gravity-model (Huff) market-share allocation and cannibalization.
//!
//! For a demand point `i` and locations `j` with attractiveness `S_j` at
//! distance `D_ij`, the visit probability is
//! `P_ij = (S_j / D_ij^lambda) / sum_k (S_k / D_ik^lambda)`.
//! Cannibalization of an existing site is the probability mass it loses when
//! the candidate joins the choice set, as a percentage of its baseline mass.

use serde::Serialize;

use crate::geo::haversine_km;
use crate::locations::BrandSite;

/// Distances below this are treated as coincident with the demand point.
const COINCIDENT_EPS_KM: f64 = 1e-6;

/// Kilometers per degree of latitude; longitude is scaled by cos(lat).
const KM_PER_DEGREE_LAT: f64 = 110.574;

/// Visit-probability allocation for one demand point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareOutcome {
    /// One probability per attractor, in input order. Sums to 1.0 unless
    /// `undefined` is set, in which case every entry is 0.0.
    pub shares: Vec<f64>,
    /// True when no location exerts any pull (zero total attractiveness):
    /// the distribution is undefined rather than uniform.
    pub undefined: bool,
}

/// Huff visit probabilities for `origin` across `attractors`.
///
/// A coincident attractor (distance ~ 0 with positive attractiveness) is the
/// asymptotically dominant choice: such attractors split the whole mass
/// equally and everything else gets zero. Never divides by zero.
pub fn visit_shares(origin: (f64, f64), attractors: &[BrandSite], lambda: f64) -> ShareOutcome {
    let (lat, lon) = origin;
    let n = attractors.len();

    let distances: Vec<f64> = attractors
        .iter()
        .map(|site| haversine_km(lat, lon, site.lat, site.lon))
        .collect();

    let coincident: Vec<usize> = (0..n)
        .filter(|&j| distances[j] < COINCIDENT_EPS_KM && attractors[j].attractiveness > 0.0)
        .collect();
    if !coincident.is_empty() {
        let mut shares = vec![0.0; n];
        let split = 1.0 / coincident.len() as f64;
        for j in coincident {
            shares[j] = split;
        }
        return ShareOutcome {
            shares,
            undefined: false,
        };
    }

    let utilities: Vec<f64> = (0..n)
        .map(|j| {
            let s = attractors[j].attractiveness;
            if s <= 0.0 {
                0.0
            } else {
                s / distances[j].powf(lambda)
            }
        })
        .collect();

    let total: f64 = utilities.iter().sum();
    if total <= 0.0 {
        return ShareOutcome {
            shares: vec![0.0; n],
            undefined: true,
        };
    }

    ShareOutcome {
        shares: utilities.iter().map(|u| u / total).collect(),
        undefined: false,
    }
}

/// A reference point of the demand surface. Weight lets callers emphasize
/// residential density or daypart demand without resampling the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemandPoint {
    pub lat: f64,
    pub lon: f64,
    pub weight: f64,
}

impl DemandPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            weight: 1.0,
        }
    }
}

/// Build a square `steps x steps` demand grid centered on `center`,
/// spanning `half_extent_km` out in each direction. Approximates the trade
/// area when no demand surface is available.
pub fn grid_around(center: (f64, f64), half_extent_km: f64, steps: u32) -> Vec<DemandPoint> {
    let steps = steps.max(1);
    let (lat, lon) = center;
    let dlat = half_extent_km / KM_PER_DEGREE_LAT;
    let dlon = half_extent_km / (KM_PER_DEGREE_LAT * lat.to_radians().cos().abs().max(1e-9));

    let mut points = Vec::with_capacity((steps * steps) as usize);
    for row in 0..steps {
        for col in 0..steps {
            // Rows span [-1, 1]; a 1-step grid degenerates to the center point.
            let fr = if steps == 1 {
                0.0
            } else {
                row as f64 / (steps - 1) as f64 * 2.0 - 1.0
            };
            let fc = if steps == 1 {
                0.0
            } else {
                col as f64 / (steps - 1) as f64 * 2.0 - 1.0
            };
            points.push(DemandPoint::new(lat + fr * dlat, lon + fc * dlon));
        }
    }
    points
}

/// Impact on one existing site of adding the candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteImpact {
    pub id: String,
    /// Aggregate probability mass before the candidate exists.
    pub baseline_share: f64,
    /// Aggregate probability mass with the candidate in the choice set.
    pub projected_share: f64,
    /// Mass lost, as a percentage of the baseline mass.
    pub cannibalization_pct: f64,
}

/// Trade-area impact of adding `candidate` next to `existing` sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CannibalizationReport {
    /// Aggregate share the candidate captures across the demand grid.
    pub candidate_share: f64,
    pub impacts: Vec<SiteImpact>,
    /// Demand points where no location exerted pull; excluded from the
    /// aggregation.
    pub undefined_points: usize,
}

/// Compute baseline and with-candidate market shares over a weighted demand
/// grid and express each existing site's loss as a percentage of its
/// baseline mass.
pub fn cannibalization_impact(
    existing: &[BrandSite],
    candidate: &BrandSite,
    demand: &[DemandPoint],
    lambda: f64,
) -> CannibalizationReport {
    let mut combined: Vec<BrandSite> = existing.to_vec();
    combined.push(candidate.clone());

    let mut baseline_mass = vec![0.0; existing.len()];
    let mut projected_mass = vec![0.0; existing.len()];
    let mut candidate_mass = 0.0;
    let mut weight_total = 0.0;
    let mut undefined_points = 0;

    for point in demand {
        if point.weight <= 0.0 {
            continue;
        }
        let origin = (point.lat, point.lon);
        let with_candidate = visit_shares(origin, &combined, lambda);
        if with_candidate.undefined {
            undefined_points += 1;
            continue;
        }
        // Baseline over existing sites only; an empty baseline set simply
        // contributes no baseline mass.
        if !existing.is_empty() {
            let baseline = visit_shares(origin, existing, lambda);
            if baseline.undefined {
                undefined_points += 1;
                continue;
            }
            for (j, share) in baseline.shares.iter().enumerate() {
                baseline_mass[j] += share * point.weight;
            }
        }
        for (j, share) in with_candidate.shares[..existing.len()].iter().enumerate() {
            projected_mass[j] += share * point.weight;
        }
        candidate_mass += with_candidate.shares[existing.len()] * point.weight;
        weight_total += point.weight;
    }

    let normalize = |mass: f64| {
        if weight_total > 0.0 {
            mass / weight_total
        } else {
            0.0
        }
    };

    let impacts = existing
        .iter()
        .enumerate()
        .map(|(j, site)| {
            let baseline_share = normalize(baseline_mass[j]);
            let projected_share = normalize(projected_mass[j]);
            let cannibalization_pct = if baseline_share > 0.0 {
                (baseline_share - projected_share) / baseline_share * 100.0
            } else {
                0.0
            };
            SiteImpact {
                id: site.id.clone(),
                baseline_share,
                projected_share,
                cannibalization_pct,
            }
        })
        .collect();

    CannibalizationReport {
        candidate_share: normalize(candidate_mass),
        impacts,
        undefined_points,
    }
}
