//! Core entities shared across every pipeline stage.

use crate::ids::SatelliteId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Constellation a satellite belongs to. Closed enum, no string tags in hot
/// paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constellation {
    Starlink,
    OneWeb,
    Other,
}

impl Constellation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constellation::Starlink => "starlink",
            Constellation::OneWeb => "oneweb",
            Constellation::Other => "other",
        }
    }
}

/// Classical orbital elements at a reference epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub mean_motion_rev_per_day: f64,
    pub epoch: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eci {
    pub x_km: f64,
    pub y_km: f64,
    pub z_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityEci {
    pub vx_km_s: f64,
    pub vy_km_s: f64,
    pub vz_km_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geographic {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_km: f64,
}

/// Position relative to the configured ground observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverRelative {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    pub is_visible: bool,
}

/// A single propagated position, millisecond-precision UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub timestamp: DateTime<Utc>,
    pub eci: Eci,
    pub velocity_eci: VelocityEci,
    pub geographic: Geographic,
    pub relative: ObserverRelative,
}

/// Immutable (within a pipeline run) satellite record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Satellite {
    pub id: String,
    pub norad_id: Option<u32>,
    pub constellation: Constellation,
    pub orbital_elements: OrbitalElements,
    pub position_timeseries: Vec<PositionSample>,
}

impl Satellite {
    /// `I-1`: timestamps are monotonically non-decreasing;
    /// `elevation_deg ∈ [-90, 90]`; `is_visible ⇒ elevation_deg ≥ 0`.
    pub fn validate_invariants(&self) -> Result<(), String> {
        let mut prev: Option<DateTime<Utc>> = None;
        for (i, sample) in self.position_timeseries.iter().enumerate() {
            if let Some(p) = prev {
                if sample.timestamp < p {
                    return Err(format!(
                        "{}: sample {i} timestamp {} precedes previous {}",
                        self.id, sample.timestamp, p
                    ));
                }
            }
            prev = Some(sample.timestamp);
            let el = sample.relative.elevation_deg;
            if !(-90.0..=90.0).contains(&el) {
                return Err(format!("{}: sample {i} elevation {el} out of range", self.id));
            }
            if sample.relative.is_visible && el < 0.0 {
                return Err(format!(
                    "{}: sample {i} marked visible with negative elevation {el}",
                    self.id
                ));
            }
        }
        Ok(())
    }
}

/// Derived coverage interval for a single satellite above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageWindow {
    pub satellite: SatelliteId,
    pub aos_time: DateTime<Utc>,
    pub los_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub avg_rsrp_dbm: f64,
    pub quality_score: f64,
}

impl CoverageWindow {
    /// `I-2`: `aos_time < los_time`; `max_elevation_deg ≥ min_threshold`.
    pub fn validate_invariants(&self, min_threshold_deg: f64) -> Result<(), String> {
        if self.aos_time >= self.los_time {
            return Err(format!(
                "coverage window aos {} >= los {}",
                self.aos_time, self.los_time
            ));
        }
        if self.max_elevation_deg < min_threshold_deg {
            return Err(format!(
                "coverage window max elevation {} below threshold {}",
                self.max_elevation_deg, min_threshold_deg
            ));
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> f64 {
        (self.los_time - self.aos_time).num_milliseconds() as f64 / 60_000.0
    }
}

/// 3GPP TS 38.331 §5.5.4 measurement event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HandoverEventKind {
    A4,
    A5,
    D2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoverDecision {
    Hold,
    Trigger,
    Evaluate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoverEvent {
    pub kind: HandoverEventKind,
    pub serving_sat: SatelliteId,
    pub neighbor_sat: SatelliteId,
    pub timestamp: DateTime<Utc>,
    pub trigger_rsrp_dbm: f64,
    pub serving_rsrp_dbm: f64,
    pub neighbor_rsrp_dbm: f64,
    pub elevation_deg: f64,
    pub decision: HandoverDecision,
    /// e.g. "3GPP TS 38.331 §5.5.4.5 (A4)"
    pub citation: &'static str,
}

impl HandoverEvent {
    /// `I-3`: `trigger_rsrp_dbm ∈ [-140, -44]`.
    pub fn validate_invariants(&self) -> Result<(), String> {
        if !(-140.0..=-44.0).contains(&self.trigger_rsrp_dbm) {
            return Err(format!(
                "handover event trigger rsrp {} out of 3GPP TS 36.133 range",
                self.trigger_rsrp_dbm
            ));
        }
        Ok(())
    }
}

/// Stage 6 input: a satellite scored and ready for pool selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteCandidate {
    pub satellite: SatelliteId,
    pub constellation: Constellation,
    pub coverage_score: f64,
    pub signal_quality_score: f64,
    pub stability_score: f64,
    pub resource_cost: f64,
    pub predicted_handovers: u32,
    pub coverage_windows: Vec<CoverageWindow>,
}

/// Stage 6 output: the frozen, accepted pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfiguration {
    pub configuration_id: uuid::Uuid,
    pub starlink_set: Vec<SatelliteId>,
    pub oneweb_set: Vec<SatelliteId>,
    pub coverage_rate: f64,
    pub avg_signal_quality: f64,
    pub est_handover_frequency: f64,
    pub resource_utilization: f64,
    pub fitness_score: f64,
}

impl PoolConfiguration {
    /// `I-4`: `|starlink_set| ∈ [10,15]`, `|oneweb_set| ∈ [3,6]`, no overlap.
    pub fn validate_invariants(&self) -> Result<(), String> {
        if !(10..=15).contains(&self.starlink_set.len()) {
            return Err(format!(
                "starlink_set cardinality {} out of [10,15]",
                self.starlink_set.len()
            ));
        }
        if !(3..=6).contains(&self.oneweb_set.len()) {
            return Err(format!(
                "oneweb_set cardinality {} out of [3,6]",
                self.oneweb_set.len()
            ));
        }
        let overlap = self
            .starlink_set
            .iter()
            .any(|id| self.oneweb_set.contains(id));
        if overlap {
            return Err("starlink_set and oneweb_set share a satellite id".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Partial,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub passed: bool,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub category: String,
    pub checks: Vec<ValidationCheck>,
    pub pass_rate: f64,
    pub status: ValidationStatus,
}

impl ValidationResult {
    pub fn from_checks(category: impl Into<String>, checks: Vec<ValidationCheck>) -> Self {
        let category = category.into();
        if checks.is_empty() {
            return Self {
                category,
                checks,
                pass_rate: 0.0,
                status: ValidationStatus::Skipped,
            };
        }
        let passed = checks.iter().filter(|c| c.passed).count();
        let pass_rate = passed as f64 / checks.len() as f64;
        let status = if passed == checks.len() {
            ValidationStatus::Pass
        } else if passed == 0 {
            ValidationStatus::Fail
        } else {
            ValidationStatus::Partial
        };
        Self {
            category,
            checks,
            pass_rate,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn satellite(samples: Vec<PositionSample>) -> Satellite {
        Satellite {
            id: "STARLINK-1".into(),
            norad_id: Some(1),
            constellation: Constellation::Starlink,
            orbital_elements: OrbitalElements {
                semi_major_axis_km: 6921.0,
                eccentricity: 0.0001,
                inclination_deg: 53.0,
                raan_deg: 10.0,
                arg_perigee_deg: 0.0,
                mean_anomaly_deg: 0.0,
                mean_motion_rev_per_day: 15.0,
                epoch: DateTime::from_timestamp_millis(0).unwrap(),
            },
            position_timeseries: samples,
        }
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        let sat = satellite(vec![sample(1000, 10.0, true), sample(500, 10.0, true)]);
        assert!(sat.validate_invariants().is_err());
    }

    #[test]
    fn rejects_visible_with_negative_elevation() {
        let sat = satellite(vec![sample(0, -5.0, true)]);
        assert!(sat.validate_invariants().is_err());
    }

    #[test]
    fn accepts_well_formed_series() {
        let sat = satellite(vec![sample(0, 10.0, true), sample(1000, 12.0, true)]);
        assert!(sat.validate_invariants().is_ok());
    }

    #[test]
    fn pool_configuration_rejects_bad_cardinality() {
        let cfg = PoolConfiguration {
            configuration_id: uuid::Uuid::nil(),
            starlink_set: (0..9).map(SatelliteId).collect(),
            oneweb_set: vec![SatelliteId(100), SatelliteId(101), SatelliteId(102)],
            coverage_rate: 0.96,
            avg_signal_quality: 0.8,
            est_handover_frequency: 1.0,
            resource_utilization: 0.5,
            fitness_score: 0.9,
        };
        assert!(cfg.validate_invariants().is_err());
    }

    #[test]
    fn pool_configuration_rejects_overlap() {
        let shared = SatelliteId(5);
        let mut starlink: Vec<_> = (0..10).map(SatelliteId).collect();
        starlink.push(shared);
        let cfg = PoolConfiguration {
            configuration_id: uuid::Uuid::nil(),
            starlink_set: starlink,
            oneweb_set: vec![shared, SatelliteId(200), SatelliteId(201)],
            coverage_rate: 0.96,
            avg_signal_quality: 0.8,
            est_handover_frequency: 1.0,
            resource_utilization: 0.5,
            fitness_score: 0.9,
        };
        assert!(cfg.validate_invariants().is_err());
    }
}
