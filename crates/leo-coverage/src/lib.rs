//! Coverage guarantee engine (C9, `spec.md` §4.9): grid-sample
//! verification of a `PoolConfiguration`, escalating through a
//! three-step remediation ladder when the raw configuration falls
//! short.

pub mod grid;
pub mod remediation;

pub use grid::{evaluate_grid, sample_grid, CoverageMetrics, GridSample};
pub use remediation::{guarantee_coverage, GuaranteeReport, GuaranteeStatus, RemediationStep};

use chrono::{DateTime, Utc};
use leo_core::ids::SatelliteId;
use leo_core::model::{PoolConfiguration, Satellite};
use std::collections::HashMap;
use tracing::info;

/// Run the full C9 contract: sample the grid, and if the raw pool
/// doesn't clear the bar, work through the remediation ladder.
pub fn ensure_coverage(
    satellites: &HashMap<SatelliteId, &Satellite>,
    pool: &PoolConfiguration,
    backup_pool: &[SatelliteId],
    window_start: DateTime<Utc>,
    elevation_threshold_deg: f64,
) -> GuaranteeReport {
    let report = remediation::guarantee_coverage(satellites, pool, backup_pool, window_start, elevation_threshold_deg);
    info!(
        status = ?report.status,
        steps = report.steps_applied.len(),
        starlink_pass_rate = report.metrics.starlink_pass_rate,
        oneweb_pass_rate = report.metrics.oneweb_pass_rate,
        "coverage guarantee evaluated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::model::{
        Constellation, Eci, Geographic, ObserverRelative, OrbitalElements, PositionSample, VelocityEci,
    };
    use uuid::Uuid;

    fn sat(id: &str, constellation: Constellation, always_visible: bool) -> Satellite {
        let samples = (0..grid::SAMPLE_COUNT)
            .map(|i| PositionSample {
                timestamp: DateTime::from_timestamp(i as i64 * grid::SAMPLE_INTERVAL_SECONDS, 0).unwrap(),
                eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
                velocity_eci: VelocityEci { vx_km_s: 0.0, vy_km_s: 0.0, vz_km_s: 0.0 },
                geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km: 550.0 },
                relative: ObserverRelative {
                    elevation_deg: if always_visible { 30.0 } else { -5.0 },
                    azimuth_deg: (i as f64 * 1.5) % 360.0,
                    range_km: 1000.0,
                    is_visible: always_visible,
                },
            })
            .collect();
        Satellite {
            id: id.to_string(),
            norad_id: None,
            constellation,
            orbital_elements: OrbitalElements {
                semi_major_axis_km: 6921.0,
                eccentricity: 0.0,
                inclination_deg: 53.0,
                raan_deg: (id.as_bytes()[1] as f64) * 10.0,
                arg_perigee_deg: 0.0,
                mean_anomaly_deg: (id.as_bytes()[1] as f64) * 15.0,
                mean_motion_rev_per_day: 15.0,
                epoch: DateTime::from_timestamp_millis(0).unwrap(),
            },
            position_timeseries: samples,
        }
    }

    #[test]
    fn fully_visible_pool_is_guaranteed_without_remediation() {
        let starlink: Vec<Satellite> = (0..10).map(|i| sat(&format!("S{i}"), Constellation::Starlink, true)).collect();
        let oneweb: Vec<Satellite> = (0..3).map(|i| sat(&format!("O{i}"), Constellation::OneWeb, true)).collect();

        let mut map: HashMap<SatelliteId, &Satellite> = HashMap::new();
        for (i, s) in starlink.iter().enumerate() {
            map.insert(SatelliteId(i as u32), s);
        }
        for (i, s) in oneweb.iter().enumerate() {
            map.insert(SatelliteId(100 + i as u32), s);
        }

        let pool = PoolConfiguration {
            configuration_id: Uuid::nil(),
            starlink_set: (0..10).map(SatelliteId).collect(),
            oneweb_set: (0..3).map(|i| SatelliteId(100 + i)).collect(),
            coverage_rate: 0.0,
            avg_signal_quality: 0.0,
            est_handover_frequency: 0.0,
            resource_utilization: 0.0,
            fitness_score: 0.0,
        };

        let window_start = DateTime::from_timestamp(0, 0).unwrap();
        let report = ensure_coverage(&map, &pool, &[], window_start, 10.0);
        assert_eq!(report.status, GuaranteeStatus::Guaranteed);
        assert!(report.steps_applied.is_empty());
    }

    #[test]
    fn unreachable_pool_needs_adjustment_with_no_backups_available() {
        let starlink: Vec<Satellite> = (0..10).map(|i| sat(&format!("S{i}"), Constellation::Starlink, false)).collect();
        let oneweb: Vec<Satellite> = (0..3).map(|i| sat(&format!("O{i}"), Constellation::OneWeb, false)).collect();

        let mut map: HashMap<SatelliteId, &Satellite> = HashMap::new();
        for (i, s) in starlink.iter().enumerate() {
            map.insert(SatelliteId(i as u32), s);
        }
        for (i, s) in oneweb.iter().enumerate() {
            map.insert(SatelliteId(100 + i as u32), s);
        }

        let pool = PoolConfiguration {
            configuration_id: Uuid::nil(),
            starlink_set: (0..10).map(SatelliteId).collect(),
            oneweb_set: (0..3).map(|i| SatelliteId(100 + i)).collect(),
            coverage_rate: 0.0,
            avg_signal_quality: 0.0,
            est_handover_frequency: 0.0,
            resource_utilization: 0.0,
            fitness_score: 0.0,
        };

        let window_start = DateTime::from_timestamp(0, 0).unwrap();
        let report = ensure_coverage(&map, &pool, &[], window_start, 10.0);
        assert_eq!(report.status, GuaranteeStatus::NeedsAdjustment);
        assert_eq!(report.steps_applied, vec![RemediationStep::WidenElevationThreshold]);
    }
}
