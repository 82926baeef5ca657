//! Inter-constellation spatial overlap and conflict detection
//! (`spec.md` §4.6.3).

use leo_core::ids::SatelliteId;
use leo_core::model::CoverageWindow;

pub const OVERLAP_THRESHOLD_MINUTES: f64 = 5.0;
pub const CONFLICT_AZIMUTH_SEPARATION_DEG: f64 = 15.0;

/// A coverage window paired with the mean azimuth the observer sees the
/// satellite at during that window — azimuth isn't carried on
/// `CoverageWindow` itself since it isn't a per-window invariant, only a
/// derived statistic needed for conflict detection.
pub struct WindowWithAzimuth {
    pub satellite: SatelliteId,
    pub window: CoverageWindow,
    pub avg_azimuth_deg: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct OverlapEvent {
    pub starlink_satellite: SatelliteId,
    pub oneweb_satellite: SatelliteId,
    pub overlap_minutes: f64,
    pub azimuth_separation_deg: f64,
    pub is_overlap: bool,
    pub is_conflict: bool,
}

fn azimuth_separation_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    diff.min(360.0 - diff)
}

pub fn detect_overlaps(
    starlink: &[WindowWithAzimuth],
    oneweb: &[WindowWithAzimuth],
) -> Vec<OverlapEvent> {
    let mut events = Vec::new();
    for s in starlink {
        for o in oneweb {
            let overlap_start = s.window.aos_time.max(o.window.aos_time);
            let overlap_end = s.window.los_time.min(o.window.los_time);
            if overlap_end <= overlap_start {
                continue;
            }
            let overlap_minutes = (overlap_end - overlap_start).num_milliseconds() as f64 / 60_000.0;
            let azimuth_separation_deg = azimuth_separation_deg(s.avg_azimuth_deg, o.avg_azimuth_deg);
            events.push(OverlapEvent {
                starlink_satellite: s.satellite,
                oneweb_satellite: o.satellite,
                overlap_minutes,
                azimuth_separation_deg,
                is_overlap: overlap_minutes > OVERLAP_THRESHOLD_MINUTES,
                is_conflict: azimuth_separation_deg < CONFLICT_AZIMUTH_SEPARATION_DEG,
            });
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn window(aos_ms: i64, los_ms: i64) -> CoverageWindow {
        CoverageWindow {
            satellite: SatelliteId(0),
            aos_time: DateTime::from_timestamp_millis(aos_ms).unwrap(),
            los_time: DateTime::from_timestamp_millis(los_ms).unwrap(),
            max_elevation_deg: 20.0,
            avg_rsrp_dbm: -90.0,
            quality_score: 0.6,
        }
    }

    #[test]
    fn overlap_over_five_minutes_flagged() {
        let s = WindowWithAzimuth { satellite: SatelliteId(0), window: window(0, 600_000), avg_azimuth_deg: 10.0 };
        let o = WindowWithAzimuth { satellite: SatelliteId(1), window: window(0, 600_000), avg_azimuth_deg: 200.0 };
        let events = detect_overlaps(&[s], &[o]);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_overlap);
        assert!(!events[0].is_conflict);
    }

    #[test]
    fn close_azimuth_flags_conflict() {
        let s = WindowWithAzimuth { satellite: SatelliteId(0), window: window(0, 600_000), avg_azimuth_deg: 10.0 };
        let o = WindowWithAzimuth { satellite: SatelliteId(1), window: window(0, 600_000), avg_azimuth_deg: 20.0 };
        let events = detect_overlaps(&[s], &[o]);
        assert!(events[0].is_conflict);
    }

    #[test]
    fn azimuth_separation_wraps_at_360() {
        assert!((azimuth_separation_deg(5.0, 355.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn non_overlapping_windows_produce_no_event() {
        let s = WindowWithAzimuth { satellite: SatelliteId(0), window: window(0, 100), avg_azimuth_deg: 10.0 };
        let o = WindowWithAzimuth { satellite: SatelliteId(1), window: window(200, 300), avg_azimuth_deg: 10.0 };
        assert!(detect_overlaps(&[s], &[o]).is_empty());
    }
}
