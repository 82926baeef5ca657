//! State vector assembly (`spec.md` §4.10): serving satellite (6 fields)
//! + 3 candidates x 4 fields + 2 environment fields = dim 20.

use leo_core::ids::SatelliteId;
use leo_core::model::{Constellation, PositionSample};
use leo_physics::link_budget::doppler_shift_hz;

pub const STATE_DIM: usize = 20;
const CANDIDATE_SLOTS: usize = 3;

/// Noise floor assumed for the user terminal, used only to derive an SNR
/// proxy from RSRP; not part of the upstream link-budget model.
const NOISE_FLOOR_DBM: f64 = -100.0;

fn snr_db(rsrp_dbm: f64) -> f64 {
    rsrp_dbm - NOISE_FLOOR_DBM
}

#[derive(Debug, Clone, Copy)]
pub struct ServingSatelliteObservation {
    pub rsrp_dbm: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub velocity_km_s: f64,
    pub carrier_freq_hz: f64,
    pub time_to_los_s: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct CandidateObservation {
    pub satellite: SatelliteId,
    pub rsrp_dbm: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
    pub predicted_handover_cost: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct EnvironmentObservation {
    pub network_load: f64,
    pub weather_attenuation: f64,
}

/// One flattened state vector plus the candidate identities it was built
/// from (needed later to interpret `ACTION_HANDOVER_CAND*`).
#[derive(Debug, Clone)]
pub struct StateVector {
    pub vector: [f64; STATE_DIM],
    pub candidate_ids: [Option<SatelliteId>; CANDIDATE_SLOTS],
}

pub fn serving_observation(
    satellite_id: &str,
    constellation: Constellation,
    sample: &PositionSample,
    altitude_km: f64,
    time_to_los_s: f64,
) -> ServingSatelliteObservation {
    let entry = leo_physics::constants::eirp_table(constellation);
    let rsrp_dbm = leo_physics::link_budget::rsrp_from_elevation_and_constellation(
        satellite_id,
        constellation,
        altitude_km,
        sample.relative.elevation_deg,
    );
    let velocity_km_s = (sample.velocity_eci.vx_km_s.powi(2)
        + sample.velocity_eci.vy_km_s.powi(2)
        + sample.velocity_eci.vz_km_s.powi(2))
    .sqrt();
    ServingSatelliteObservation {
        rsrp_dbm,
        elevation_deg: sample.relative.elevation_deg,
        range_km: sample.relative.range_km,
        velocity_km_s,
        carrier_freq_hz: entry.frequency_hz,
        time_to_los_s,
    }
}

/// Assemble the 20-dim state vector. `candidates` is truncated/padded to
/// exactly three slots; missing slots are zero-filled.
pub fn build_state(
    serving: &ServingSatelliteObservation,
    candidates: &[CandidateObservation],
    environment: &EnvironmentObservation,
) -> StateVector {
    let doppler_hz = doppler_shift_hz(serving.velocity_km_s, serving.carrier_freq_hz);
    let snr = snr_db(serving.rsrp_dbm);

    let mut vector = [0.0_f64; STATE_DIM];
    vector[0] = serving.rsrp_dbm;
    vector[1] = serving.elevation_deg;
    vector[2] = serving.range_km;
    vector[3] = doppler_hz;
    vector[4] = snr;
    vector[5] = serving.time_to_los_s;

    let mut candidate_ids = [None; CANDIDATE_SLOTS];
    for (slot, candidate) in candidates.iter().take(CANDIDATE_SLOTS).enumerate() {
        let base = 6 + slot * 4;
        vector[base] = candidate.rsrp_dbm;
        vector[base + 1] = candidate.elevation_deg;
        vector[base + 2] = candidate.range_km;
        vector[base + 3] = candidate.predicted_handover_cost;
        candidate_ids[slot] = Some(candidate.satellite);
    }

    vector[18] = environment.network_load;
    vector[19] = environment.weather_attenuation;

    StateVector { vector, candidate_ids }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_vector_has_twenty_dims() {
        let serving = ServingSatelliteObservation {
            rsrp_dbm: -90.0,
            elevation_deg: 45.0,
            range_km: 800.0,
            velocity_km_s: 7.5,
            carrier_freq_hz: 20.2e9,
            time_to_los_s: 300.0,
        };
        let state = build_state(&serving, &[], &EnvironmentObservation { network_load: 0.4, weather_attenuation: 0.1 });
        assert_eq!(state.vector.len(), STATE_DIM);
        assert_eq!(state.vector[0], -90.0);
        assert_eq!(state.vector[18], 0.4);
        assert_eq!(state.vector[19], 0.1);
    }

    #[test]
    fn missing_candidates_are_zero_filled() {
        let serving = ServingSatelliteObservation {
            rsrp_dbm: -90.0,
            elevation_deg: 45.0,
            range_km: 800.0,
            velocity_km_s: 7.5,
            carrier_freq_hz: 20.2e9,
            time_to_los_s: 300.0,
        };
        let candidates = vec![CandidateObservation {
            satellite: SatelliteId(1),
            rsrp_dbm: -95.0,
            elevation_deg: 20.0,
            range_km: 1200.0,
            predicted_handover_cost: 0.3,
        }];
        let state = build_state(&serving, &candidates, &EnvironmentObservation { network_load: 0.2, weather_attenuation: 0.0 });
        assert_eq!(state.vector[6], -95.0);
        assert_eq!(state.vector[10], 0.0);
        assert!(state.candidate_ids[0].is_some());
        assert!(state.candidate_ids[1].is_none());
    }
}
