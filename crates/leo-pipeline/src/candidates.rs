//! Bridges C7's coordination report and C3's handover events into the
//! `SatelliteCandidate` list C8 optimizes over. Every field is derived
//! from real upstream output, not a placeholder score.

use leo_core::ids::SatelliteId;
use leo_core::model::{HandoverDecision, HandoverEvent, SatelliteCandidate};
use leo_physics::constants::{RSRP_MAX_DBM, RSRP_MIN_DBM};
use leo_temporal_spatial::{CoordinationReport, SatellitePhaseState};
use std::collections::HashMap;

/// Windows-per-satellite count that maps to full stability confidence.
const STABILITY_FULL_CONFIDENCE_WINDOWS: f64 = 5.0;

fn normalize_rsrp(rsrp_dbm: f64) -> f64 {
    ((rsrp_dbm - RSRP_MIN_DBM) / (RSRP_MAX_DBM - RSRP_MIN_DBM)).clamp(0.0, 1.0)
}

pub fn build_candidates(
    coordination: &CoordinationReport,
    handover_events: &[HandoverEvent],
) -> Vec<SatelliteCandidate> {
    let mut handover_counts: HashMap<SatelliteId, u32> = HashMap::new();
    for event in handover_events {
        if event.decision == HandoverDecision::Trigger {
            *handover_counts.entry(event.serving_sat).or_insert(0) += 1;
        }
    }

    coordination
        .satellites
        .iter()
        .filter(|sat| sat.state == SatellitePhaseState::Integrated)
        .map(|sat| {
            let windows = &sat.windows;
            let coverage_score = if windows.is_empty() {
                0.0
            } else {
                windows.iter().map(|w| w.quality_score).sum::<f64>() / windows.len() as f64
            };
            let signal_quality_score = if windows.is_empty() {
                0.0
            } else {
                windows.iter().map(|w| normalize_rsrp(w.avg_rsrp_dbm)).sum::<f64>() / windows.len() as f64
            };
            let stability_score = (windows.len() as f64 / STABILITY_FULL_CONFIDENCE_WINDOWS).min(1.0);
            let predicted_handovers = *handover_counts.get(&sat.satellite).unwrap_or(&0);
            let resource_cost = (predicted_handovers as f64 / 10.0).clamp(0.0, 1.0);

            SatelliteCandidate {
                satellite: sat.satellite,
                constellation: sat.constellation,
                coverage_score,
                signal_quality_score,
                stability_score,
                resource_cost,
                predicted_handovers,
                coverage_windows: windows.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::model::{Constellation, CoverageWindow};
    use leo_temporal_spatial::CoordinatedSatellite;

    fn window(quality: f64, rsrp: f64) -> CoverageWindow {
        CoverageWindow {
            satellite: SatelliteId(0),
            aos_time: chrono::DateTime::from_timestamp(0, 0).unwrap(),
            los_time: chrono::DateTime::from_timestamp(300, 0).unwrap(),
            max_elevation_deg: 45.0,
            avg_rsrp_dbm: rsrp,
            quality_score: quality,
        }
    }

    #[test]
    fn only_integrated_satellites_become_candidates() {
        let report = CoordinationReport {
            satellites: vec![
                CoordinatedSatellite {
                    satellite: SatelliteId(0),
                    constellation: Constellation::Starlink,
                    state: SatellitePhaseState::Integrated,
                    role: None,
                    windows: vec![window(0.8, -90.0)],
                },
                CoordinatedSatellite {
                    satellite: SatelliteId(1),
                    constellation: Constellation::Starlink,
                    state: SatellitePhaseState::Rejected,
                    role: None,
                    windows: vec![],
                },
            ],
            starlink_gaps: vec![],
            oneweb_gaps: vec![],
            overlaps: vec![],
        };
        let candidates = build_candidates(&report, &[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].satellite, SatelliteId(0));
        assert!(candidates[0].coverage_score > 0.0);
    }
}
