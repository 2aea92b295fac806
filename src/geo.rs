//! Shared geometry helpers. Both the scoring tooling and the cannibalization
//! model measure distance the same way; keeping one haversine here avoids the
//! two drifting apart.

/// Mean Earth radius in kilometers (WGS84 sphere approximation).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two lat/lon points, in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance in km from `(lat, lon)` to the nearest of `points`, or None when
/// `points` is empty.
pub fn nearest_distance_km(lat: f64, lon: f64, points: &[(f64, f64)]) -> Option<f64> {
    points
        .iter()
        .map(|&(plat, plon)| haversine_km(lat, lon, plat, plon))
        .min_by(f64::total_cmp)
}
