//! Temporal-spatial coordinator (C7): infers per-satellite coverage
//! windows, detects gaps within a constellation and overlaps/conflicts
//! across constellations, assigns coverage roles, and applies the
//! OneWeb phase offset to complement Starlink.

pub mod overlap;
pub mod roles;
pub mod windows;

pub use overlap::{detect_overlaps, OverlapEvent, WindowWithAzimuth, CONFLICT_AZIMUTH_SEPARATION_DEG, OVERLAP_THRESHOLD_MINUTES};
pub use roles::{assign_role, shift_window_by_phase, CoverageRole, SatellitePhaseState, ONEWEB_PHASE_OFFSET_DEG};
pub use windows::{detect_gaps, expected_window_minutes, infer_coverage_windows, Gap, CRITICAL_GAP_MINUTES};

use leo_core::ids::SatelliteId;
use leo_core::model::{Constellation, CoverageWindow, Satellite};
use leo_physics::orbital_period_minutes;

pub struct CoordinatedSatellite {
    pub satellite: SatelliteId,
    pub constellation: Constellation,
    pub state: SatellitePhaseState,
    pub role: Option<CoverageRole>,
    pub windows: Vec<CoverageWindow>,
}

pub struct CoordinationReport {
    pub satellites: Vec<CoordinatedSatellite>,
    pub starlink_gaps: Vec<Gap>,
    pub oneweb_gaps: Vec<Gap>,
    pub overlaps: Vec<OverlapEvent>,
}

fn avg_azimuth_deg(satellite: &Satellite, window: &CoverageWindow) -> f64 {
    let in_window: Vec<f64> = satellite
        .position_timeseries
        .iter()
        .filter(|s| s.timestamp >= window.aos_time && s.timestamp <= window.los_time)
        .map(|s| s.relative.azimuth_deg)
        .collect();
    if in_window.is_empty() {
        0.0
    } else {
        in_window.iter().sum::<f64>() / in_window.len() as f64
    }
}

/// Full C7 contract. `satellites` pairs an arena index with its record,
/// matching the convention used across every other stage module.
pub fn coordinate(satellites: &[(SatelliteId, Satellite)]) -> CoordinationReport {
    let mut coordinated = Vec::with_capacity(satellites.len());
    let mut starlink_windows_az: Vec<WindowWithAzimuth> = Vec::new();
    let mut oneweb_windows_az: Vec<WindowWithAzimuth> = Vec::new();
    let mut starlink_windows: Vec<CoverageWindow> = Vec::new();
    let mut oneweb_windows: Vec<CoverageWindow> = Vec::new();

    for (id, satellite) in satellites {
        let mut state = SatellitePhaseState::Candidate;
        let mut sat_windows = infer_coverage_windows(*id, satellite);

        state = state.advance(true); // PhaseAdjusted: every candidate gets phase analysis

        if satellite.constellation == Constellation::OneWeb {
            let period = orbital_period_minutes(satellite.orbital_elements.semi_major_axis_km);
            sat_windows = sat_windows
                .iter()
                .map(|w| shift_window_by_phase(w, ONEWEB_PHASE_OFFSET_DEG, period))
                .collect();
        }

        let qualifies = !sat_windows.is_empty();
        state = state.advance(qualifies);
        let role = if qualifies {
            state = state.advance(true);
            Some(assign_role(satellite.constellation))
        } else {
            None
        };

        for w in &sat_windows {
            let az = avg_azimuth_deg(satellite, w);
            let entry = WindowWithAzimuth { satellite: *id, window: *w, avg_azimuth_deg: az };
            match satellite.constellation {
                Constellation::Starlink => {
                    starlink_windows.push(*w);
                    starlink_windows_az.push(entry);
                }
                Constellation::OneWeb => {
                    oneweb_windows.push(*w);
                    oneweb_windows_az.push(entry);
                }
                Constellation::Other => {}
            }
        }

        coordinated.push(CoordinatedSatellite {
            satellite: *id,
            constellation: satellite.constellation,
            state,
            role,
            windows: sat_windows,
        });
    }

    starlink_windows.sort_by_key(|w| w.aos_time);
    oneweb_windows.sort_by_key(|w| w.aos_time);

    CoordinationReport {
        satellites: coordinated,
        starlink_gaps: detect_gaps(&starlink_windows),
        oneweb_gaps: detect_gaps(&oneweb_windows),
        overlaps: detect_overlaps(&starlink_windows_az, &oneweb_windows_az),
    }
}
