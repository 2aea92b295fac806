//! Batch evaluation and ordering. Scoring one candidate never touches
//! another, and the config is read-only for the whole run, so the batch
//! fans out across the thread pool with no locking.

use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;

use crate::config::Config;
use crate::locations::CandidateLocation;
use crate::scoring::{strategy_for, ScoringResult, Strategy};

/// A candidate with its scoring outcome, in rank order after [`rank`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: CandidateLocation,
    pub result: ScoringResult,
}

/// Rank a batch with the strategy named in the config.
pub fn rank(candidates: Vec<CandidateLocation>, config: &Config) -> Vec<RankedCandidate> {
    rank_with(candidates, config, strategy_for(config.scoring.strategy))
}

/// Rank a batch with an explicit strategy. Evaluation is parallel; the sort
/// is a stable total order: score descending, then global confidence
/// descending, then own-brand distance descending (farther from existing
/// sites wins a tie), then id ascending so identical twins still order
/// deterministically.
pub fn rank_with(
    candidates: Vec<CandidateLocation>,
    config: &Config,
    strategy: &dyn Strategy,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_par_iter()
        .map(|candidate| {
            let result = strategy.evaluate(&candidate, config);
            RankedCandidate { candidate, result }
        })
        .collect();

    ranked.sort_by(compare);
    ranked
}

fn compare(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.result
        .score
        .total_cmp(&a.result.score)
        .then_with(|| {
            let ca = a.result.confidence.unwrap_or(0.0);
            let cb = b.result.confidence.unwrap_or(0.0);
            cb.total_cmp(&ca)
        })
        .then_with(|| {
            b.candidate
                .own_brand_distance_km
                .total_cmp(&a.candidate.own_brand_distance_km)
        })
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::{ConfidenceDatum, NseTier};

    fn candidate(id: &str, nse: NseTier, traffic: f64, own_km: f64) -> CandidateLocation {
        CandidateLocation {
            id: id.to_string(),
            name: String::new(),
            lat: 19.43,
            lon: -99.13,
            nse: ConfidenceDatum::new(nse, 90.0, "census"),
            foot_traffic: ConfidenceDatum::new(traffic, 85.0, "provider"),
            own_brand_distance_km: own_km,
            competitor_distance_km: 2.5,
            competitors_within_radius: 1,
            monthly_rent: None,
            rating: None,
            review_count: None,
        }
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let config = Config::default();
        let ranked = rank(
            vec![
                candidate("weak", NseTier::C, 20.0, 3.0),
                candidate("strong", NseTier::A, 90.0, 9.0),
                candidate("middling", NseTier::B, 55.0, 5.0),
            ],
            &config,
        );
        assert_eq!(ranked[0].candidate.id, "strong");
        assert_eq!(ranked[1].candidate.id, "middling");
        assert_eq!(ranked[2].candidate.id, "weak");
        assert!(ranked[0].result.score >= ranked[1].result.score);
    }

    #[test]
    fn test_tie_broken_by_confidence_then_distance() {
        let config = Config::default();
        // Same factor outcomes, different input confidence
        let mut low_conf = candidate("low-conf", NseTier::A, 90.0, 9.0);
        low_conf.foot_traffic.confidence = 55.0;
        let high_conf = candidate("high-conf", NseTier::A, 90.0, 9.0);

        let ranked = rank(vec![low_conf, high_conf], &config);
        assert_eq!(ranked[0].candidate.id, "high-conf");
        assert_eq!(
            ranked[0].result.score, ranked[1].result.score,
            "tie-break test needs equal scores"
        );
    }

    #[test]
    fn test_tie_broken_by_own_brand_distance() {
        let config = Config::default();
        // 9 km and 12 km land in the same distance bucket: same score, same
        // confidence, so the farther site must come first.
        let near = candidate("near", NseTier::A, 90.0, 9.0);
        let far = candidate("far", NseTier::A, 90.0, 12.0);
        let ranked = rank(vec![near, far], &config);
        assert_eq!(ranked[0].result.score, ranked[1].result.score);
        assert_eq!(ranked[0].candidate.id, "far");
    }

    #[test]
    fn test_full_tie_falls_back_to_id() {
        let config = Config::default();
        let ranked = rank(
            vec![
                candidate("zeta", NseTier::B, 60.0, 5.0),
                candidate("alpha", NseTier::B, 60.0, 5.0),
            ],
            &config,
        );
        assert_eq!(ranked[0].candidate.id, "alpha");
    }

    #[test]
    fn test_rank_deterministic_across_runs() {
        let config = Config::default();
        let batch: Vec<CandidateLocation> = (0..40)
            .map(|i| {
                candidate(
                    &format!("site-{:02}", i),
                    if i % 2 == 0 { NseTier::B } else { NseTier::CPlus },
                    (i as f64 * 7.0) % 100.0,
                    (i as f64 * 0.7) % 12.0,
                )
            })
            .collect();
        let first = rank(batch.clone(), &config);
        let second = rank(batch, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_batch() {
        let config = Config::default();
        assert!(rank(Vec::new(), &config).is_empty());
    }
}
