//! Role assignment, phase-offset complementarity, and the per-satellite
//! coordination state machine (`spec.md` §4.6.4-5).

use chrono::Duration as ChronoDuration;
use leo_core::model::{Constellation, CoverageWindow};

/// Mean-anomaly offset applied to OneWeb windows to complement Starlink
/// coverage, in degrees.
pub const ONEWEB_PHASE_OFFSET_DEG: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageRole {
    pub responsibility: f64,
    pub elevation_band_deg: (f64, f64),
}

pub fn assign_role(constellation: Constellation) -> CoverageRole {
    match constellation {
        Constellation::Starlink => CoverageRole { responsibility: 0.70, elevation_band_deg: (5.0, 20.0) },
        Constellation::OneWeb => CoverageRole { responsibility: 0.30, elevation_band_deg: (20.0, 90.0) },
        Constellation::Other => CoverageRole { responsibility: 0.0, elevation_band_deg: (0.0, 90.0) },
    }
}

/// Shift a window's AOS/LOS by the time-equivalent of a mean-anomaly
/// phase offset at the given orbital period.
pub fn shift_window_by_phase(window: &CoverageWindow, phase_offset_deg: f64, period_minutes: f64) -> CoverageWindow {
    let shift_minutes = phase_offset_deg / 360.0 * period_minutes;
    let shift = ChronoDuration::milliseconds((shift_minutes * 60_000.0) as i64);
    CoverageWindow {
        aos_time: window.aos_time + shift,
        los_time: window.los_time + shift,
        ..*window
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SatellitePhaseState {
    Candidate,
    PhaseAdjusted,
    RoleAssigned,
    Integrated,
    Rejected,
}

impl SatellitePhaseState {
    pub fn advance(self, qualifies_for_role: bool) -> Self {
        match self {
            SatellitePhaseState::Candidate => SatellitePhaseState::PhaseAdjusted,
            SatellitePhaseState::PhaseAdjusted => {
                if qualifies_for_role {
                    SatellitePhaseState::RoleAssigned
                } else {
                    SatellitePhaseState::Rejected
                }
            }
            SatellitePhaseState::RoleAssigned => SatellitePhaseState::Integrated,
            terminal => terminal,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SatellitePhaseState::Integrated | SatellitePhaseState::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use leo_core::ids::SatelliteId;

    #[test]
    fn starlink_gets_primary_role() {
        let role = assign_role(Constellation::Starlink);
        assert_eq!(role.responsibility, 0.70);
        assert_eq!(role.elevation_band_deg, (5.0, 20.0));
    }

    #[test]
    fn oneweb_gets_gap_filler_role() {
        let role = assign_role(Constellation::OneWeb);
        assert_eq!(role.responsibility, 0.30);
    }

    #[test]
    fn phase_shift_preserves_window_duration() {
        let window = CoverageWindow {
            satellite: SatelliteId(0),
            aos_time: DateTime::from_timestamp_millis(0).unwrap(),
            los_time: DateTime::from_timestamp_millis(60_000).unwrap(),
            max_elevation_deg: 10.0,
            avg_rsrp_dbm: -90.0,
            quality_score: 0.5,
        };
        let shifted = shift_window_by_phase(&window, ONEWEB_PHASE_OFFSET_DEG, 96.0);
        let original_duration = window.los_time - window.aos_time;
        let shifted_duration = shifted.los_time - shifted.aos_time;
        assert_eq!(original_duration, shifted_duration);
        assert!(shifted.aos_time > window.aos_time);
    }

    #[test]
    fn state_machine_reaches_rejected_when_role_unqualified() {
        let state = SatellitePhaseState::Candidate.advance(true).advance(false);
        assert_eq!(state, SatellitePhaseState::Rejected);
        assert!(state.is_terminal());
    }

    #[test]
    fn state_machine_reaches_integrated_when_qualified() {
        let state = SatellitePhaseState::Candidate.advance(true).advance(true).advance(true);
        assert_eq!(state, SatellitePhaseState::Integrated);
    }
}
