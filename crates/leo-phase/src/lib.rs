//! Orbital phase analyzer (C6): mean-anomaly and RAAN distribution
//! analysis, adaptive diversity scoring. Pure functions over orbital
//! elements, no I/O.

pub mod weights;

pub use weights::{adaptive_quality_thresholds, orbital_diversity_weights, rate_diversity_score, DiversityRating, DiversityThresholds};

use leo_core::model::{OrbitalElements, Satellite};
use serde::{Deserialize, Serialize};

pub const MEAN_ANOMALY_BINS: usize = 12;
pub const RAAN_BINS: usize = 8;
const DEGREES_PER_CIRCLE: f64 = 360.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinDistribution {
    pub bin_counts: Vec<usize>,
    pub bins: Vec<Vec<String>>,
    pub uniformity_score: f64,
}

fn bin_index(value_deg: f64, bin_count: usize) -> usize {
    let bin_size = DEGREES_PER_CIRCLE / bin_count as f64;
    let normalized = value_deg.rem_euclid(DEGREES_PER_CIRCLE);
    ((normalized / bin_size) as usize).min(bin_count - 1)
}

fn bin_distribution(
    elements: &[(&str, f64)],
    bin_count: usize,
) -> BinDistribution {
    let mut bins: Vec<Vec<String>> = vec![Vec::new(); bin_count];
    for (id, value) in elements {
        bins[bin_index(*value, bin_count)].push((*id).to_string());
    }
    let bin_counts: Vec<usize> = bins.iter().map(Vec::len).collect();
    let max = *bin_counts.iter().max().unwrap_or(&0);
    let min = *bin_counts.iter().min().unwrap_or(&0);
    let uniformity_score = if max == 0 {
        1.0
    } else {
        1.0 - (max - min) as f64 / max as f64
    };
    BinDistribution { bin_counts, bins, uniformity_score }
}

/// Mean-anomaly distribution over 12 bins of 30 degrees.
pub fn mean_anomaly_distribution(elements: &[(&str, &OrbitalElements)]) -> BinDistribution {
    let values: Vec<(&str, f64)> = elements.iter().map(|(id, e)| (*id, e.mean_anomaly_deg)).collect();
    bin_distribution(&values, MEAN_ANOMALY_BINS)
}

/// RAAN distribution over 8 bins of 45 degrees.
pub fn raan_distribution(elements: &[(&str, &OrbitalElements)]) -> BinDistribution {
    let values: Vec<(&str, f64)> = elements.iter().map(|(id, e)| (*id, e.raan_deg)).collect();
    bin_distribution(&values, RAAN_BINS)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDiversityReport {
    pub mean_anomaly: BinDistribution,
    pub raan: BinDistribution,
    pub ma_weight: f64,
    pub raan_weight: f64,
    pub diversity_score: f64,
    pub rating: DiversityRating,
}

/// Full C6 contract for one constellation's worth of satellites.
pub fn analyze_constellation_phase(satellites: &[&Satellite]) -> PhaseDiversityReport {
    let elements: Vec<(&str, &OrbitalElements)> =
        satellites.iter().map(|s| (s.id.as_str(), &s.orbital_elements)).collect();

    let ma = mean_anomaly_distribution(&elements);
    let raan = raan_distribution(&elements);
    let (ma_weight, raan_weight) = orbital_diversity_weights(satellites.len());
    let diversity_score = ma.uniformity_score * ma_weight + raan.uniformity_score * raan_weight;
    let thresholds = adaptive_quality_thresholds(&[ma.uniformity_score, raan.uniformity_score, diversity_score]);
    let rating = rate_diversity_score(diversity_score, &thresholds);

    PhaseDiversityReport {
        mean_anomaly: ma,
        raan,
        ma_weight,
        raan_weight,
        diversity_score,
        rating,
    }
}
