use serde::{Deserialize, Serialize};

fn default_confidence() -> f64 {
    50.0
}

fn default_source() -> String {
    "unspecified".to_string()
}

/// A fact supplied by an external data collaborator, carrying its own
/// provenance. Immutable once constructed — evaluators read, never write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDatum<T> {
    pub value: T,
    /// Trust in this value, 0-100.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Where the value came from, e.g. "foot-traffic-provider", "field-survey"
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub verified: bool,
}

impl<T> ConfidenceDatum<T> {
    pub fn new(value: T, confidence: f64, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            source: source.into(),
            verified: false,
        }
    }

    /// A field-verified fact: full confidence.
    pub fn verified(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence: 100.0,
            source: source.into(),
            verified: true,
        }
    }

    /// A placeholder the analyst has not confirmed yet.
    pub fn assumed(value: T) -> Self {
        Self {
            value,
            confidence: default_confidence(),
            source: "assumed".to_string(),
            verified: false,
        }
    }
}

/// Socioeconomic tier of the trade area, ordered D < C < C+ < B < A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NseTier {
    D,
    C,
    #[serde(rename = "C+")]
    CPlus,
    B,
    A,
}

impl NseTier {
    pub fn label(&self) -> &'static str {
        match self {
            NseTier::A => "A",
            NseTier::B => "B",
            NseTier::CPlus => "C+",
            NseTier::C => "C",
            NseTier::D => "D",
        }
    }
}

/// Radius (km) used when counting nearby competitors.
pub const COMPETITOR_RADIUS_KM: f64 = 2.0;

/// A normalized candidate location record, produced by the upstream data
/// pipeline. Soft or estimated fields arrive wrapped in [`ConfidenceDatum`];
/// distances and counts come from the mapping layer and are taken as exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLocation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub nse: ConfidenceDatum<NseTier>,
    /// Normalized foot-traffic index, 0-100.
    pub foot_traffic: ConfidenceDatum<f64>,
    /// Distance to the nearest own-brand site, km.
    pub own_brand_distance_km: f64,
    /// Distance to the nearest primary competitor, km.
    pub competitor_distance_km: f64,
    /// Competitors within [`COMPETITOR_RADIUS_KM`].
    pub competitors_within_radius: u32,
    /// Asking rent per month, if known.
    #[serde(default)]
    pub monthly_rent: Option<ConfidenceDatum<f64>>,
    /// Place rating 0-5, if the location already operates as retail.
    #[serde(default)]
    pub rating: Option<ConfidenceDatum<f64>>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

impl CandidateLocation {
    /// Display name, falling back to the id when no name was provided.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// An operating brand site, used by the cannibalization model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSite {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Relative pull of the site (floor area, seating, drive-thru...).
    pub attractiveness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nse_tier_ordering() {
        assert!(NseTier::A > NseTier::B);
        assert!(NseTier::B > NseTier::CPlus);
        assert!(NseTier::CPlus > NseTier::C);
        assert!(NseTier::C > NseTier::D);
    }

    #[test]
    fn test_nse_tier_serde_names() {
        let tier: NseTier = serde_json::from_str("\"C+\"").unwrap();
        assert_eq!(tier, NseTier::CPlus);
        assert_eq!(serde_json::to_string(&NseTier::CPlus).unwrap(), "\"C+\"");
    }

    #[test]
    fn test_confidence_datum_constructors() {
        let d = ConfidenceDatum::new(85.0, 90.0, "betime");
        assert_eq!(d.confidence, 90.0);
        assert!(!d.verified);

        let v = ConfidenceDatum::verified(NseTier::A, "field-survey");
        assert_eq!(v.confidence, 100.0);
        assert!(v.verified);

        let a = ConfidenceDatum::assumed(3.5);
        assert_eq!(a.confidence, 50.0);
        assert_eq!(a.source, "assumed");
    }

    #[test]
    fn test_confidence_datum_deserialize_defaults() {
        let d: ConfidenceDatum<f64> = serde_json::from_str(r#"{"value": 42.0}"#).unwrap();
        assert_eq!(d.value, 42.0);
        assert_eq!(d.confidence, 50.0);
        assert_eq!(d.source, "unspecified");
        assert!(!d.verified);
    }

    #[test]
    fn test_candidate_deserialize_minimal() {
        let json = r#"{
            "id": "polanco-01",
            "lat": 19.4326,
            "lon": -99.1332,
            "nse": { "value": "A", "confidence": 95, "source": "government-census" },
            "foot_traffic": { "value": 85, "confidence": 90, "source": "betime" },
            "own_brand_distance_km": 9.0,
            "competitor_distance_km": 3.0,
            "competitors_within_radius": 0
        }"#;
        let c: CandidateLocation = serde_json::from_str(json).unwrap();
        assert_eq!(c.display_name(), "polanco-01");
        assert_eq!(c.nse.value, NseTier::A);
        assert!(c.monthly_rent.is_none());
        assert!(c.rating.is_none());
    }
}
