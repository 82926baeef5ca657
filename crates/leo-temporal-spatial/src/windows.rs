//! Coverage window inference from observed visibility, cross-checked
//! against the period-derived expected duration (`spec.md` §4.6.1).

use chrono::Duration as ChronoDuration;
use leo_core::ids::SatelliteId;
use leo_core::model::{CoverageWindow, Satellite};
use leo_physics::orbital_period_minutes;

/// Fraction of an orbital period a LEO satellite is typically visible
/// above the observer's elevation mask.
pub const EXPECTED_VISIBILITY_FRACTION: f64 = 0.30;

pub fn expected_window_minutes(semi_major_axis_km: f64) -> f64 {
    orbital_period_minutes(semi_major_axis_km) * EXPECTED_VISIBILITY_FRACTION
}

/// Scan contiguous runs of visible samples and fold each into a
/// `CoverageWindow`. Grounded in the actual sample data rather than the
/// formulaic duration, which is only used as an expectation to log
/// deviations against.
pub fn infer_coverage_windows(id: SatelliteId, satellite: &Satellite) -> Vec<CoverageWindow> {
    let mut windows = Vec::new();
    let mut run_start_idx: Option<usize> = None;

    let samples = &satellite.position_timeseries;
    for (i, sample) in samples.iter().enumerate() {
        if sample.relative.is_visible {
            if run_start_idx.is_none() {
                run_start_idx = Some(i);
            }
        } else if let Some(start) = run_start_idx.take() {
            windows.push(fold_window(id, &samples[start..i]));
        }
    }
    if let Some(start) = run_start_idx {
        windows.push(fold_window(id, &samples[start..]));
    }

    windows
}

fn fold_window(id: SatelliteId, run: &[leo_core::model::PositionSample]) -> CoverageWindow {
    let aos_time = run.first().unwrap().timestamp;
    let los_time = run.last().unwrap().timestamp;
    let max_elevation_deg = run
        .iter()
        .map(|s| s.relative.elevation_deg)
        .fold(f64::NEG_INFINITY, f64::max);

    let rsrps: Vec<f64> = run
        .iter()
        .map(|s| {
            leo_physics::rsrp_from_elevation_and_constellation(
                "window",
                leo_core::model::Constellation::Other,
                s.geographic.alt_km,
                s.relative.elevation_deg,
            )
        })
        .collect();
    let avg_rsrp_dbm = rsrps.iter().sum::<f64>() / rsrps.len() as f64;
    let quality_score = ((avg_rsrp_dbm - leo_physics::RSRP_MIN_DBM)
        / (leo_physics::RSRP_MAX_DBM - leo_physics::RSRP_MIN_DBM))
        .clamp(0.0, 1.0);

    CoverageWindow {
        satellite: id,
        aos_time,
        los_time: if los_time == aos_time { los_time + ChronoDuration::milliseconds(1) } else { los_time },
        max_elevation_deg,
        avg_rsrp_dbm,
        quality_score,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub after_window_index: usize,
    pub duration_minutes: f64,
    pub critical: bool,
}

pub const CRITICAL_GAP_MINUTES: f64 = 2.0;

/// Gaps between consecutive windows, assumed pre-sorted by `aos_time`.
pub fn detect_gaps(windows: &[CoverageWindow]) -> Vec<Gap> {
    windows
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| {
            let gap_minutes = (pair[1].aos_time - pair[0].los_time).num_milliseconds() as f64 / 60_000.0;
            if gap_minutes <= 0.0 {
                return None;
            }
            Some(Gap {
                after_window_index: i,
                duration_minutes: gap_minutes,
                critical: gap_minutes > CRITICAL_GAP_MINUTES,
            })
        })
        .collect()
}
