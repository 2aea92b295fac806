use crate::config::Config;

use super::config::WEIGHT_SUM_TOLERANCE;

/// Validate the active configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// Validation never repairs anything: a weight set that does not sum to 1.0
/// is rejected with a pointer at `normalize()`, not silently rescaled.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let weights = &config.scoring.weights;
    let named = [
        ("nse", weights.nse),
        ("foot_traffic", weights.foot_traffic),
        ("own_brand_distance", weights.own_brand_distance),
        ("competitor_distance", weights.competitor_distance),
        ("competitor_density", weights.competitor_density),
        ("rent", weights.rent),
        ("rating", weights.rating),
    ];
    for (name, weight) in named {
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            errors.push(format!(
                "scoring.weights.{}: must be within [0, 1], got {}",
                name, weight
            ));
        }
    }
    let sum = weights.sum();
    if sum.is_finite() && (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        errors.push(format!(
            "scoring.weights: must sum to 1.0 (got {:.6}); call normalize() or fix the values",
            sum
        ));
    }

    let thresholds = &config.scoring.thresholds;
    if !thresholds.evaluate.is_finite() || !(0.0..=100.0).contains(&thresholds.evaluate) {
        errors.push(format!(
            "scoring.thresholds.evaluate: must be within [0, 100], got {}",
            thresholds.evaluate
        ));
    }
    if !thresholds.viable.is_finite() || !(0.0..=100.0).contains(&thresholds.viable) {
        errors.push(format!(
            "scoring.thresholds.viable: must be within [0, 100], got {}",
            thresholds.viable
        ));
    }
    if thresholds.viable <= thresholds.evaluate {
        errors.push(format!(
            "scoring.thresholds: viable ({}) must be above evaluate ({})",
            thresholds.viable, thresholds.evaluate
        ));
    }

    let business = &config.business;
    if !business.average_ticket.is_finite() || business.average_ticket <= 0.0 {
        errors.push(format!(
            "business.average_ticket: must be positive, got {}",
            business.average_ticket
        ));
    }
    if !business.base_investment.is_finite() || business.base_investment <= 0.0 {
        errors.push(format!(
            "business.base_investment: must be positive, got {}",
            business.base_investment
        ));
    }
    if !business.operating_margin.is_finite()
        || !(0.0..1.0).contains(&business.operating_margin)
    {
        errors.push(format!(
            "business.operating_margin: must be within [0, 1), got {}",
            business.operating_margin
        ));
    }
    if !business.daily_customer_target.is_finite() || business.daily_customer_target <= 0.0 {
        errors.push(format!(
            "business.daily_customer_target: must be positive, got {}",
            business.daily_customer_target
        ));
    }

    if !config.huff.lambda.is_finite() || config.huff.lambda <= 0.0 {
        errors.push(format!(
            "huff.lambda: must be positive, got {}",
            config.huff.lambda
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
