//! Grid-sample coverage verification (`spec.md` §4.9): 30-second samples
//! over a 2-hour window, Starlink visible-count >= 10 and OneWeb
//! visible-count >= 3 at >= 95% of sample points, max gap <= 2 minutes.

use chrono::{DateTime, Duration, Utc};
use leo_core::ids::SatelliteId;
use leo_core::model::{PoolConfiguration, PositionSample, Satellite};
use std::collections::HashMap;

pub const SAMPLE_COUNT: usize = 240;
pub const SAMPLE_INTERVAL_SECONDS: i64 = 30;
pub const STARLINK_MIN_VISIBLE: usize = 10;
pub const ONEWEB_MIN_VISIBLE: usize = 3;
pub const MAX_GAP_MINUTES: f64 = 2.0;
pub const MIN_PASS_RATE: f64 = 0.95;

/// Nearest position sample to `t`; real sample cadence need not land
/// exactly on the grid.
fn nearest_sample(satellite: &Satellite, t: DateTime<Utc>) -> Option<&PositionSample> {
    satellite
        .position_timeseries
        .iter()
        .min_by_key(|s| (s.timestamp - t).num_milliseconds().abs())
}

fn is_visible_at(sample: &PositionSample, elevation_override_deg: Option<f64>) -> bool {
    match elevation_override_deg {
        Some(threshold) => sample.relative.elevation_deg >= threshold,
        None => sample.relative.is_visible,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridSample {
    pub timestamp: DateTime<Utc>,
    pub starlink_visible: usize,
    pub oneweb_visible: usize,
}

/// Sample the pool's visible-count across the grid. `elevation_override_deg`
/// re-derives visibility against a given elevation mask instead of the
/// stored flag, used by the "widen elevation threshold" remediation step.
pub fn sample_grid(
    satellites: &HashMap<SatelliteId, &Satellite>,
    pool: &PoolConfiguration,
    window_start: DateTime<Utc>,
    elevation_override_deg: Option<f64>,
) -> Vec<GridSample> {
    (0..SAMPLE_COUNT)
        .map(|i| {
            let t = window_start + Duration::seconds(i as i64 * SAMPLE_INTERVAL_SECONDS);
            let starlink_visible = pool
                .starlink_set
                .iter()
                .filter_map(|id| satellites.get(id))
                .filter_map(|sat| nearest_sample(sat, t))
                .filter(|s| is_visible_at(s, elevation_override_deg))
                .count();
            let oneweb_visible = pool
                .oneweb_set
                .iter()
                .filter_map(|id| satellites.get(id))
                .filter_map(|sat| nearest_sample(sat, t))
                .filter(|s| is_visible_at(s, elevation_override_deg))
                .count();
            GridSample { timestamp: t, starlink_visible, oneweb_visible }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageMetrics {
    pub starlink_pass_rate: f64,
    pub oneweb_pass_rate: f64,
    pub max_gap_minutes: f64,
}

pub fn evaluate_grid(samples: &[GridSample]) -> CoverageMetrics {
    if samples.is_empty() {
        return CoverageMetrics { starlink_pass_rate: 0.0, oneweb_pass_rate: 0.0, max_gap_minutes: f64::INFINITY };
    }
    let n = samples.len() as f64;
    let starlink_pass_rate = samples.iter().filter(|s| s.starlink_visible >= STARLINK_MIN_VISIBLE).count() as f64 / n;
    let oneweb_pass_rate = samples.iter().filter(|s| s.oneweb_visible >= ONEWEB_MIN_VISIBLE).count() as f64 / n;

    let mut max_gap_minutes = 0.0_f64;
    let mut current_gap_start: Option<DateTime<Utc>> = None;
    for sample in samples {
        let has_coverage = sample.starlink_visible >= STARLINK_MIN_VISIBLE || sample.oneweb_visible >= ONEWEB_MIN_VISIBLE;
        if has_coverage {
            if let Some(start) = current_gap_start.take() {
                let gap_minutes = (sample.timestamp - start).num_milliseconds() as f64 / 60_000.0;
                max_gap_minutes = max_gap_minutes.max(gap_minutes);
            }
        } else if current_gap_start.is_none() {
            current_gap_start = Some(sample.timestamp);
        }
    }
    if let Some(start) = current_gap_start {
        let last = samples.last().unwrap().timestamp;
        max_gap_minutes = max_gap_minutes.max((last - start).num_milliseconds() as f64 / 60_000.0);
    }

    CoverageMetrics { starlink_pass_rate, oneweb_pass_rate, max_gap_minutes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::model::{Constellation, Eci, Geographic, ObserverRelative, OrbitalElements, VelocityEci};
    use uuid::Uuid;

    fn sat(id: &str, visible_from_idx: usize) -> Satellite {
        let samples = (0..SAMPLE_COUNT)
            .map(|i| PositionSample {
                timestamp: DateTime::from_timestamp(i as i64 * SAMPLE_INTERVAL_SECONDS, 0).unwrap(),
                eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
                velocity_eci: VelocityEci { vx_km_s: 0.0, vy_km_s: 0.0, vz_km_s: 0.0 },
                geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km: 550.0 },
                relative: ObserverRelative {
                    elevation_deg: if i >= visible_from_idx { 20.0 } else { -5.0 },
                    azimuth_deg: 0.0,
                    range_km: 1000.0,
                    is_visible: i >= visible_from_idx,
                },
            })
            .collect();
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
    fn all_visible_passes_at_full_rate() {
        let satellites: Vec<Satellite> = (0..10).map(|i| sat(&format!("S{i}"), 0)).collect();
        let map: HashMap<SatelliteId, &Satellite> =
            (0..10).map(|i| (SatelliteId(i), &satellites[i as usize])).collect();
        let pool = PoolConfiguration {
            configuration_id: Uuid::nil(),
            starlink_set: (0..10).map(SatelliteId).collect(),
            oneweb_set: vec![],
            coverage_rate: 0.0,
            avg_signal_quality: 0.0,
            est_handover_frequency: 0.0,
            resource_utilization: 0.0,
            fitness_score: 0.0,
        };
        let window_start = DateTime::from_timestamp(0, 0).unwrap();
        let samples = sample_grid(&map, &pool, window_start, None);
        let metrics = evaluate_grid(&samples);
        assert_eq!(metrics.starlink_pass_rate, 1.0);
        assert_eq!(metrics.max_gap_minutes, 0.0);
    }

    #[test]
    fn late_visibility_onset_produces_a_gap() {
        let satellites: Vec<Satellite> = (0..10).map(|i| sat(&format!("S{i}"), 20)).collect();
        let map: HashMap<SatelliteId, &Satellite> =
            (0..10).map(|i| (SatelliteId(i), &satellites[i as usize])).collect();
        let pool = PoolConfiguration {
            configuration_id: Uuid::nil(),
            starlink_set: (0..10).map(SatelliteId).collect(),
            oneweb_set: vec![],
            coverage_rate: 0.0,
            avg_signal_quality: 0.0,
            est_handover_frequency: 0.0,
            resource_utilization: 0.0,
            fitness_score: 0.0,
        };
        let window_start = DateTime::from_timestamp(0, 0).unwrap();
        let samples = sample_grid(&map, &pool, window_start, None);
        let metrics = evaluate_grid(&samples);
        assert!(metrics.max_gap_minutes > 2.0);
        assert!(metrics.starlink_pass_rate < 1.0);
    }
}
