//! 3GPP TS 38.331 §5.5.4 A4/A5/D2 handover event synthesis (C3).
//!
//! For every ordered pair of visible satellites and every aligned sample
//! index (every 10th position, bounding complexity per `spec.md` §4.3),
//! derive RSRP for both legs from real elevation and apply the trigger
//! conditions. Events are capped at 5 per pair and sorted deterministically
//! by `(serving_id, neighbor_id, timestamp)` so downstream hashes are
//! reproducible.

use leo_core::ids::SatelliteId;
use leo_core::model::{HandoverDecision, HandoverEvent, HandoverEventKind, Satellite};
use leo_physics::rsrp_from_elevation_and_constellation;

/// Sample stride bounding pairwise complexity, per `spec.md` §4.3.
pub const SAMPLE_STRIDE: usize = 10;

/// Maximum synthesized events per (serving, neighbor) pair.
pub const MAX_EVENTS_PER_PAIR: usize = 5;

/// `spec.md` §4.3: altitude-compensation term added to the A4 base
/// threshold, clamped to `[0, 5]` dB. Higher altitude (more atmosphere to
/// traverse at a given elevation) relaxes the threshold slightly.
fn altitude_compensation_db(altitude_km: f64) -> f64 {
    ((altitude_km - 300.0) / 1700.0 * 5.0).clamp(0.0, 5.0)
}

/// Elevation-compensation term for the A5 threshold1, clamped to `[0, 5]`
/// dB — higher elevation (cleaner path) relaxes the serving threshold.
fn elevation_compensation_db(elevation_deg: f64) -> f64 {
    (elevation_deg / 90.0 * 5.0).clamp(0.0, 5.0)
}

/// Distance-derived adjustment to the D2 3 dB base threshold, clamped to
/// `[0, 3]` dB as the range differential grows.
fn distance_threshold_adjustment_db(range_diff_km: f64) -> f64 {
    (range_diff_km / 500.0).clamp(0.0, 3.0)
}

fn a4_event(
    serving: SatelliteId,
    neighbor: SatelliteId,
    serving_sat: &Satellite,
    neighbor_sat: &Satellite,
    idx_serving: usize,
    idx_neighbor: usize,
) -> Option<HandoverEvent> {
    let s = &serving_sat.position_timeseries[idx_serving];
    let n = &neighbor_sat.position_timeseries[idx_neighbor];
    if !s.relative.is_visible || !n.relative.is_visible {
        return None;
    }
    let serving_rsrp = rsrp_from_elevation_and_constellation(
        &serving_sat.id,
        serving_sat.constellation,
        s.geographic.alt_km,
        s.relative.elevation_deg,
    );
    let neighbor_rsrp = rsrp_from_elevation_and_constellation(
        &neighbor_sat.id,
        neighbor_sat.constellation,
        n.geographic.alt_km,
        n.relative.elevation_deg,
    );
    let threshold = -95.0 + altitude_compensation_db(n.geographic.alt_km);
    if neighbor_rsrp > threshold {
        Some(HandoverEvent {
            kind: HandoverEventKind::A4,
            serving_sat: serving,
            neighbor_sat: neighbor,
            timestamp: s.timestamp,
            trigger_rsrp_dbm: neighbor_rsrp,
            serving_rsrp_dbm: serving_rsrp,
            neighbor_rsrp_dbm: neighbor_rsrp,
            elevation_deg: n.relative.elevation_deg,
            decision: HandoverDecision::Evaluate,
            citation: "3GPP TS 38.331 §5.5.4.5 (A4)",
        })
    } else {
        None
    }
}

fn a5_event(
    serving: SatelliteId,
    neighbor: SatelliteId,
    serving_sat: &Satellite,
    neighbor_sat: &Satellite,
    idx_serving: usize,
    idx_neighbor: usize,
) -> Option<HandoverEvent> {
    let s = &serving_sat.position_timeseries[idx_serving];
    let n = &neighbor_sat.position_timeseries[idx_neighbor];
    if !s.relative.is_visible || !n.relative.is_visible {
        return None;
    }
    let serving_rsrp = rsrp_from_elevation_and_constellation(
        &serving_sat.id,
        serving_sat.constellation,
        s.geographic.alt_km,
        s.relative.elevation_deg,
    );
    let neighbor_rsrp = rsrp_from_elevation_and_constellation(
        &neighbor_sat.id,
        neighbor_sat.constellation,
        n.geographic.alt_km,
        n.relative.elevation_deg,
    );
    let threshold1 = -105.0 + elevation_compensation_db(s.relative.elevation_deg);
    let threshold2 = threshold1 + 5.0;
    if serving_rsrp < threshold1 && neighbor_rsrp > threshold2 {
        Some(HandoverEvent {
            kind: HandoverEventKind::A5,
            serving_sat: serving,
            neighbor_sat: neighbor,
            timestamp: s.timestamp,
            trigger_rsrp_dbm: threshold1,
            serving_rsrp_dbm: serving_rsrp,
            neighbor_rsrp_dbm: neighbor_rsrp,
            elevation_deg: n.relative.elevation_deg,
            decision: HandoverDecision::Trigger,
            citation: "3GPP TS 38.331 §5.5.4.6 (A5)",
        })
    } else {
        None
    }
}

fn d2_event(
    serving: SatelliteId,
    neighbor: SatelliteId,
    serving_sat: &Satellite,
    neighbor_sat: &Satellite,
    idx_serving: usize,
    idx_neighbor: usize,
) -> Option<HandoverEvent> {
    let s = &serving_sat.position_timeseries[idx_serving];
    let n = &neighbor_sat.position_timeseries[idx_neighbor];
    if !s.relative.is_visible || !n.relative.is_visible {
        return None;
    }
    let serving_rsrp = rsrp_from_elevation_and_constellation(
        &serving_sat.id,
        serving_sat.constellation,
        s.geographic.alt_km,
        s.relative.elevation_deg,
    );
    let neighbor_rsrp = rsrp_from_elevation_and_constellation(
        &neighbor_sat.id,
        neighbor_sat.constellation,
        n.geographic.alt_km,
        n.relative.elevation_deg,
    );
    let range_diff = (n.relative.range_km - s.relative.range_km).abs();
    let threshold = 3.0 + distance_threshold_adjustment_db(range_diff);
    let diff = (neighbor_rsrp - serving_rsrp).abs();
    if diff > threshold {
        Some(HandoverEvent {
            kind: HandoverEventKind::D2,
            serving_sat: serving,
            neighbor_sat: neighbor,
            timestamp: s.timestamp,
            trigger_rsrp_dbm: neighbor_rsrp.max(serving_rsrp),
            serving_rsrp_dbm: serving_rsrp,
            neighbor_rsrp_dbm: neighbor_rsrp,
            elevation_deg: n.relative.elevation_deg,
            decision: HandoverDecision::Evaluate,
            citation: "3GPP TS 38.331 §5.5.4.15a (D2)",
        })
    } else {
        None
    }
}

/// Synthesize events for one ordered (serving, neighbor) pair, aligned by
/// sample index and strided per [`SAMPLE_STRIDE`]. `serving_sat` and
/// `neighbor_sat` must share the same sample cadence (Stage 4's output
/// guarantee); mismatched lengths truncate to the shorter series.
pub fn synthesize_pair(
    serving: SatelliteId,
    neighbor: SatelliteId,
    serving_sat: &Satellite,
    neighbor_sat: &Satellite,
) -> Vec<HandoverEvent> {
    let n = serving_sat
        .position_timeseries
        .len()
        .min(neighbor_sat.position_timeseries.len());
    let mut events = Vec::new();

    let mut idx = 0;
    while idx < n && events.len() < MAX_EVENTS_PER_PAIR {
        if let Some(e) = a4_event(serving, neighbor, serving_sat, neighbor_sat, idx, idx) {
            events.push(e);
        }
        if events.len() < MAX_EVENTS_PER_PAIR {
            if let Some(e) = a5_event(serving, neighbor, serving_sat, neighbor_sat, idx, idx) {
                events.push(e);
            }
        }
        if events.len() < MAX_EVENTS_PER_PAIR {
            if let Some(e) = d2_event(serving, neighbor, serving_sat, neighbor_sat, idx, idx) {
                events.push(e);
            }
        }
        idx += SAMPLE_STRIDE;
    }

    events.truncate(MAX_EVENTS_PER_PAIR);
    events
}

/// Synthesize events across every ordered pair of visible satellites in
/// `satellites`, returning them sorted by `(serving_id, neighbor_id,
/// timestamp)` for reproducible downstream hashing.
pub fn synthesize_all(satellites: &[(SatelliteId, Satellite)]) -> Vec<HandoverEvent> {
    let visible: Vec<_> = satellites
        .iter()
        .filter(|(_, sat)| sat.position_timeseries.iter().any(|s| s.relative.is_visible))
        .collect();

    let mut events = Vec::new();
    for (serving_id, serving_sat) in &visible {
        for (neighbor_id, neighbor_sat) in &visible {
            if serving_id == neighbor_id {
                continue;
            }
            events.extend(synthesize_pair(*serving_id, *neighbor_id, serving_sat, neighbor_sat));
        }
    }

    events.sort_by(|a, b| {
        (a.serving_sat, a.neighbor_sat, a.timestamp).cmp(&(b.serving_sat, b.neighbor_sat, b.timestamp))
    });
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use leo_core::model::{Constellation, Eci, Geographic, ObserverRelative, OrbitalElements, VelocityEci};

    fn sample(ts_ms: i64, el: f64, range_km: f64, alt_km: f64) -> leo_core::model::PositionSample {
        leo_core::model::PositionSample {
            timestamp: DateTime::from_timestamp_millis(ts_ms).unwrap(),
            eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
            velocity_eci: VelocityEci { vx_km_s: 0.0, vy_km_s: 0.0, vz_km_s: 0.0 },
            geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km },
            relative: ObserverRelative {
                elevation_deg: el,
                azimuth_deg: 0.0,
                range_km,
                is_visible: el >= 0.0,
            },
        }
    }

    fn satellite(id: &str, constellation: Constellation, samples: Vec<leo_core::model::PositionSample>) -> Satellite {
        Satellite {
            id: id.to_string(),
            norad_id: None,
            constellation,
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
    fn events_capped_at_five_per_pair() {
        let samples: Vec<_> = (0..200)
            .map(|i| sample(i * 1000, 60.0, 800.0, 550.0))
            .collect();
        let serving = satellite("STARLINK-1", Constellation::Starlink, samples.clone());
        let neighbor = satellite("STARLINK-2", Constellation::Starlink, samples);
        let events = synthesize_pair(SatelliteId(0), SatelliteId(1), &serving, &neighbor);
        assert!(events.len() <= MAX_EVENTS_PER_PAIR);
    }

    #[test]
    fn all_events_pass_3gpp_rsrp_range() {
        let samples: Vec<_> = (0..50).map(|i| sample(i * 1000, 20.0, 1200.0, 550.0)).collect();
        let serving = satellite("STARLINK-1", Constellation::Starlink, samples.clone());
        let neighbor = satellite("STARLINK-2", Constellation::Starlink, samples);
        let events = synthesize_pair(SatelliteId(0), SatelliteId(1), &serving, &neighbor);
        for e in &events {
            assert!(e.validate_invariants().is_ok());
        }
    }

    #[test]
    fn deterministic_ordering() {
        let samples: Vec<_> = (0..50).map(|i| sample(i * 1000, 45.0, 900.0, 550.0)).collect();
        let sats = vec![
            (SatelliteId(0), satellite("STARLINK-1", Constellation::Starlink, samples.clone())),
            (SatelliteId(1), satellite("STARLINK-2", Constellation::Starlink, samples)),
        ];
        let a = synthesize_all(&sats);
        let b = synthesize_all(&sats);
        let a_keys: Vec<_> = a.iter().map(|e| (e.serving_sat, e.neighbor_sat, e.timestamp)).collect();
        let b_keys: Vec<_> = b.iter().map(|e| (e.serving_sat, e.neighbor_sat, e.timestamp)).collect();
        assert_eq!(a_keys, b_keys);
        let mut sorted = a_keys.clone();
        sorted.sort();
        assert_eq!(a_keys, sorted);
    }
}
