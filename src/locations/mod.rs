mod types;

pub use types::{BrandSite, CandidateLocation, ConfidenceDatum, NseTier, COMPETITOR_RADIUS_KM};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load candidate location records from a JSON file.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateLocation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidates file at {}", path.display()))?;
    let candidates: Vec<CandidateLocation> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse candidates: invalid JSON in {}", path.display()))?;
    Ok(candidates)
}

/// Load existing brand sites from a JSON file.
pub fn load_sites(path: &Path) -> Result<Vec<BrandSite>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sites file at {}", path.display()))?;
    let sites: Vec<BrandSite> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse sites: invalid JSON in {}", path.display()))?;
    Ok(sites)
}

fn check_confidence(errors: &mut Vec<String>, field: &str, confidence: f64) {
    if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
        errors.push(format!(
            "{}.confidence: must be between 0 and 100, got {}",
            field, confidence
        ));
    }
}

/// Validate a candidate record at the boundary.
/// Returns all validation errors at once (not just the first).
/// Evaluators downstream assume records that passed this check.
pub fn validate_candidate(c: &CandidateLocation) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if c.id.trim().is_empty() {
        errors.push("id: must not be empty".to_string());
    }
    if !c.lat.is_finite() || !(-90.0..=90.0).contains(&c.lat) {
        errors.push(format!("lat: must be within [-90, 90], got {}", c.lat));
    }
    if !c.lon.is_finite() || !(-180.0..=180.0).contains(&c.lon) {
        errors.push(format!("lon: must be within [-180, 180], got {}", c.lon));
    }

    check_confidence(&mut errors, "nse", c.nse.confidence);

    if !c.foot_traffic.value.is_finite() || !(0.0..=100.0).contains(&c.foot_traffic.value) {
        errors.push(format!(
            "foot_traffic: index must be within [0, 100], got {}",
            c.foot_traffic.value
        ));
    }
    check_confidence(&mut errors, "foot_traffic", c.foot_traffic.confidence);

    if !c.own_brand_distance_km.is_finite() || c.own_brand_distance_km < 0.0 {
        errors.push(format!(
            "own_brand_distance_km: must be non-negative, got {}",
            c.own_brand_distance_km
        ));
    }
    if !c.competitor_distance_km.is_finite() || c.competitor_distance_km < 0.0 {
        errors.push(format!(
            "competitor_distance_km: must be non-negative, got {}",
            c.competitor_distance_km
        ));
    }

    if let Some(ref rent) = c.monthly_rent {
        if !rent.value.is_finite() || rent.value < 0.0 {
            errors.push(format!(
                "monthly_rent: must be non-negative, got {}",
                rent.value
            ));
        }
        check_confidence(&mut errors, "monthly_rent", rent.confidence);
    }

    if let Some(ref rating) = c.rating {
        if !rating.value.is_finite() || !(0.0..=5.0).contains(&rating.value) {
            errors.push(format!(
                "rating: must be within [0, 5], got {}",
                rating.value
            ));
        }
        check_confidence(&mut errors, "rating", rating.confidence);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a brand-site record at the boundary.
pub fn validate_site(s: &BrandSite) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if s.id.trim().is_empty() {
        errors.push("id: must not be empty".to_string());
    }
    if !s.lat.is_finite() || !(-90.0..=90.0).contains(&s.lat) {
        errors.push(format!("lat: must be within [-90, 90], got {}", s.lat));
    }
    if !s.lon.is_finite() || !(-180.0..=180.0).contains(&s.lon) {
        errors.push(format!("lon: must be within [-180, 180], got {}", s.lon));
    }
    if !s.attractiveness.is_finite() || s.attractiveness < 0.0 {
        errors.push(format!(
            "attractiveness: must be non-negative, got {}",
            s.attractiveness
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
