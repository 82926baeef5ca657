//! Layered elevation filtering (C2). For each threshold and each
//! constellation, keep samples where `is_visible && elevation_deg >=
//! threshold`. Never synthesizes samples — inputs are authoritative.

use leo_core::model::{PositionSample, Satellite};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimum qualifying samples for a satellite to survive a given threshold.
pub const MIN_QUALIFYING_SAMPLES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationStats {
    pub satellite_id: String,
    pub threshold_deg: f64,
    pub min_elevation_deg: f64,
    pub max_elevation_deg: f64,
    pub avg_elevation_deg: f64,
    pub filtered_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredSatellite {
    pub satellite_id: String,
    pub threshold_deg: f64,
    pub samples: Vec<PositionSample>,
    pub stats: ElevationStats,
}

/// Filter one satellite's time-series at one threshold. Returns `None` if
/// fewer than [`MIN_QUALIFYING_SAMPLES`] samples qualify.
pub fn filter_satellite(satellite: &Satellite, threshold_deg: f64) -> Option<FilteredSatellite> {
    let samples: Vec<PositionSample> = satellite
        .position_timeseries
        .iter()
        .filter(|s| s.relative.is_visible && s.relative.elevation_deg >= threshold_deg)
        .copied()
        .collect();

    if samples.len() < MIN_QUALIFYING_SAMPLES {
        return None;
    }

    let elevations: Vec<f64> = samples.iter().map(|s| s.relative.elevation_deg).collect();
    let min = elevations.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = elevations.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let avg = elevations.iter().sum::<f64>() / elevations.len() as f64;

    Some(FilteredSatellite {
        satellite_id: satellite.id.clone(),
        threshold_deg,
        stats: ElevationStats {
            satellite_id: satellite.id.clone(),
            threshold_deg,
            min_elevation_deg: min,
            max_elevation_deg: max,
            avg_elevation_deg: avg,
            filtered_count: samples.len(),
        },
        samples,
    })
}

/// Filter every satellite in a constellation at a single threshold, fanned
/// out over a bounded worker pool (rayon's global pool, matching
/// `sx9-foundation-math`'s use of rayon for CPU-bound fan-out).
pub fn filter_constellation(
    satellites: &[Satellite],
    threshold_deg: f64,
) -> Vec<FilteredSatellite> {
    satellites
        .par_iter()
        .filter_map(|sat| filter_satellite(sat, threshold_deg))
        .collect()
}

/// Filter every satellite across every configured threshold.
pub fn filter_all_thresholds(
    satellites: &[Satellite],
    thresholds_deg: &[f64],
) -> Vec<(f64, Vec<FilteredSatellite>)> {
    thresholds_deg
        .iter()
        .map(|&threshold| (threshold, filter_constellation(satellites, threshold)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use leo_core::model::{Constellation, Eci, Geographic, ObserverRelative, OrbitalElements, VelocityEci};

    fn sample(ts_ms: i64, el: f64, visible: bool) -> PositionSample {
        PositionSample {
            timestamp: DateTime::from_timestamp_millis(ts_ms).unwrap(),
            eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
            velocity_eci: VelocityEci { vx_km_s: 0.0, vy_km_s: 0.0, vz_km_s: 0.0 },
            geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km: 550.0 },
            relative: ObserverRelative {
                elevation_deg: el,
                azimuth_deg: 0.0,
                range_km: 1000.0,
                is_visible: visible,
            },
        }
    }

    fn satellite(id: &str, samples: Vec<PositionSample>) -> Satellite {
        Satellite {
            id: id.to_string(),
            norad_id: None,
            constellation: Constellation::Starlink,
            orbital_elements: OrbitalElements {
                semi_major_axis_km: 6921.0,
                eccentricity: 0.0,
                inclination_deg: 53.0,
                raan_deg: 0.0,
                arg_perigee_deg: 0.0,
                mean_anomaly_deg: 0.0,
                mean_motion_rev_per_day: 15.0,
                epoch: DateTime::from_timestamp_millis(0).unwrap(),
            },
            position_timeseries: samples,
        }
    }

    #[test]
    fn elevation_exactly_at_threshold_is_included() {
        let sat = satellite("S1", vec![sample(0, 10.0, true), sample(1, 10.0, true), sample(2, 10.0, true)]);
        let result = filter_satellite(&sat, 10.0).unwrap();
        assert_eq!(result.samples.len(), 3);
    }

    #[test]
    fn below_min_qualifying_count_is_dropped() {
        let sat = satellite("S2", vec![sample(0, 20.0, true), sample(1, 20.0, true)]);
        assert!(filter_satellite(&sat, 10.0).is_none());
    }

    #[test]
    fn invisible_samples_are_excluded_even_above_threshold() {
        let sat = satellite(
            "S3",
            vec![sample(0, 30.0, false), sample(1, 30.0, true), sample(2, 30.0, true), sample(3, 30.0, true)],
        );
        let result = filter_satellite(&sat, 10.0).unwrap();
        assert_eq!(result.samples.len(), 3);
    }

    #[test]
    fn never_synthesizes_samples() {
        let sat = satellite("S4", vec![sample(0, 5.0, true), sample(1, 12.0, true), sample(2, 20.0, true)]);
        let result = filter_satellite(&sat, 10.0).unwrap();
        // Only the two samples >= 10 deg survive; none invented.
        assert_eq!(result.samples.len(), 2);
        assert!(result.samples.iter().all(|s| s.relative.elevation_deg >= 10.0));
    }
}
