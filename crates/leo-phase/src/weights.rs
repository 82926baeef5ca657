//! Adaptive weighting helpers that replace the fixed 0.6/0.4 mean-anomaly
//! / RAAN blend and the fixed excellent/good/acceptable/poor thresholds
//! with values derived from the data actually observed.

use crate::{MEAN_ANOMALY_BINS, RAAN_BINS};

/// Per-bin occupancy below this average sample count is too sparse to
/// trust a bin-count statistic; the blend falls back toward an even
/// split as occupancy drops below it.
const FULL_CONFIDENCE_OCCUPANCY: f64 = 5.0;

/// `(ma_weight, raan_weight)`, always summing to 1.0. RAAN uses fewer
/// bins than mean-anomaly (8 vs 12), so at equal constellation size its
/// bin-count statistic has more samples per bin and is the more reliable
/// signal; the blend shifts toward it as `constellation_size` grows, and
/// collapses to an even 0.5/0.5 split when occupancy is too sparse to
/// trust either.
pub fn orbital_diversity_weights(constellation_size: usize) -> (f64, f64) {
    if constellation_size == 0 {
        return (0.5, 0.5);
    }
    let n = constellation_size as f64;
    let ma_occupancy = n / MEAN_ANOMALY_BINS as f64;
    let raan_occupancy = n / RAAN_BINS as f64;
    let min_occupancy = ma_occupancy.min(raan_occupancy);
    let confidence = (min_occupancy / FULL_CONFIDENCE_OCCUPANCY).clamp(0.0, 1.0);

    let ma_share = ma_occupancy.sqrt() / (ma_occupancy.sqrt() + raan_occupancy.sqrt());
    let ma_weight = 0.5 * (1.0 - confidence) + ma_share * confidence;
    (ma_weight, 1.0 - ma_weight)
}

pub struct DiversityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
    pub poor: f64,
}

impl Default for DiversityThresholds {
    fn default() -> Self {
        Self { excellent: 0.85, good: 0.70, acceptable: 0.55, poor: 0.40 }
    }
}

/// Derive rating thresholds from the spread of the scores actually being
/// rated, falling back to the default bands when there isn't enough
/// spread to say anything (e.g. a single-satellite constellation).
pub fn adaptive_quality_thresholds(scores: &[f64]) -> DiversityThresholds {
    if scores.len() < 2 {
        return DiversityThresholds::default();
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let default = DiversityThresholds::default();
    let excellent = (mean + std_dev).clamp(0.75, 0.95);
    let good = (mean).clamp(0.55, 0.85).min(excellent - 0.05).max(default.acceptable);
    let acceptable = (mean - 0.5 * std_dev).clamp(0.35, 0.70).min(good - 0.05);
    let poor = (mean - std_dev).clamp(0.15, 0.55).min(acceptable - 0.05);

    DiversityThresholds { excellent, good, acceptable, poor }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiversityRating {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

pub fn rate_diversity_score(score: f64, thresholds: &DiversityThresholds) -> DiversityRating {
    if score >= thresholds.excellent {
        DiversityRating::Excellent
    } else if score >= thresholds.good {
        DiversityRating::Good
    } else if score >= thresholds.acceptable {
        DiversityRating::Acceptable
    } else {
        DiversityRating::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        for size in [0, 1, 8, 40, 500] {
            let (ma, raan) = orbital_diversity_weights(size);
            assert!((ma + raan - 1.0).abs() < 1e-9, "size={size}");
        }
    }

    #[test]
    fn sparse_constellation_is_even_split() {
        let (ma, raan) = orbital_diversity_weights(1);
        assert!((ma - 0.5).abs() < 1e-6);
        assert!((raan - 0.5).abs() < 1e-6);
    }

    #[test]
    fn large_constellation_favors_raan_fewer_bins() {
        let (ma, raan) = orbital_diversity_weights(500);
        assert!(raan > ma);
    }

    #[test]
    fn thresholds_stay_ordered() {
        let t = adaptive_quality_thresholds(&[0.9, 0.95, 0.2, 0.6]);
        assert!(t.excellent > t.good);
        assert!(t.good > t.acceptable);
        assert!(t.acceptable > t.poor);
    }

    #[test]
    fn single_score_falls_back_to_default() {
        let t = adaptive_quality_thresholds(&[0.5]);
        assert_eq!(t.excellent, 0.85);
    }
}
