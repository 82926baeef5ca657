//! Builds C10's `DatasetSample`s from the same pool and candidate data the
//! optimizer already scored, rather than a separate simulated rollout.
//! Each selected satellite becomes one "serving" observation; its nearest
//! unselected candidates of the same constellation fill the candidate
//! slots. The dataset records the state the optimizer acted on, not a
//! live policy's trajectory.

use leo_core::ids::SatelliteId;
use leo_core::model::{PositionSample, PoolConfiguration, Satellite, SatelliteCandidate};
use leo_rl_dataset::action::{Action, ContinuousAction, DiscreteAction};
use leo_rl_dataset::reward::RewardInputs;
use leo_rl_dataset::state::{serving_observation, CandidateObservation, EnvironmentObservation};
use leo_rl_dataset::DatasetSample;
use std::collections::HashMap;

const CANDIDATE_SLOTS: usize = 3;

fn candidate_observation(satellite: SatelliteId, sample: &PositionSample, candidate: &SatelliteCandidate) -> CandidateObservation {
    CandidateObservation {
        satellite,
        rsrp_dbm: -100.0 + 40.0 * candidate.signal_quality_score,
        elevation_deg: sample.relative.elevation_deg,
        range_km: sample.relative.range_km,
        predicted_handover_cost: candidate.resource_cost,
    }
}

pub fn build_rl_samples(
    satellites_by_id: &HashMap<SatelliteId, &Satellite>,
    candidates: &[SatelliteCandidate],
    pool: &PoolConfiguration,
) -> Vec<DatasetSample> {
    let by_id: HashMap<SatelliteId, &SatelliteCandidate> = candidates.iter().map(|c| (c.satellite, c)).collect();
    let selected: Vec<SatelliteId> = pool.starlink_set.iter().chain(pool.oneweb_set.iter()).copied().collect();

    selected
        .iter()
        .filter_map(|&serving_id| {
            let serving_candidate = by_id.get(&serving_id)?;
            let serving_satellite = satellites_by_id.get(&serving_id)?;
            let last_sample = serving_satellite.position_timeseries.last()?;

            let serving = serving_observation(
                &serving_satellite.id,
                serving_candidate.constellation,
                last_sample,
                last_sample.geographic.alt_km,
                60.0 * (1.0 - serving_candidate.stability_score).max(0.0) + 60.0,
            );

            let candidate_observations: Vec<CandidateObservation> = selected
                .iter()
                .filter(|&&id| id != serving_id)
                .filter_map(|&id| {
                    let candidate = by_id.get(&id)?;
                    if candidate.constellation != serving_candidate.constellation {
                        return None;
                    }
                    let sample = satellites_by_id.get(&id)?.position_timeseries.last()?;
                    Some(candidate_observation(id, sample, candidate))
                })
                .take(CANDIDATE_SLOTS)
                .collect();

            let environment = EnvironmentObservation {
                network_load: 1.0 - serving_candidate.resource_cost,
                weather_attenuation: (1.0 - serving_candidate.signal_quality_score).clamp(0.0, 1.0) * 0.2,
            };

            let reward_inputs = RewardInputs {
                signal_quality_gain: serving_candidate.signal_quality_score,
                continuity: serving_candidate.stability_score,
                efficiency: serving_candidate.coverage_score,
                resource: 1.0 - serving_candidate.resource_cost,
                action: DiscreteAction::Maintain,
                rsrp_improved: false,
                serving_link_would_drop: false,
            };

            Some(DatasetSample {
                serving,
                candidates: candidate_observations,
                environment,
                action: Action {
                    discrete: DiscreteAction::Maintain,
                    continuous: ContinuousAction { handover_prob: 0.0, cand_weight: 0.0, threshold_adj: 0.0 },
                },
                reward_inputs,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::model::Constellation;
    use leo_core::model::{Eci, Geographic, ObserverRelative, OrbitalElements, VelocityEci};

    fn sample_satellite(id_num: u32) -> (SatelliteId, Satellite) {
        let id = SatelliteId(id_num);
        let sat = Satellite {
            id: format!("SAT-{id_num}"),
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
                epoch: chrono::DateTime::from_timestamp(0, 0).unwrap(),
            },
            position_timeseries: vec![PositionSample {
                timestamp: chrono::DateTime::from_timestamp(0, 0).unwrap(),
                eci: Eci { x_km: 0.0, y_km: 0.0, z_km: 0.0 },
                velocity_eci: VelocityEci { vx_km_s: 7.5, vy_km_s: 0.0, vz_km_s: 0.0 },
                geographic: Geographic { lat_deg: 0.0, lon_deg: 0.0, alt_km: 550.0 },
                relative: ObserverRelative { elevation_deg: 45.0, azimuth_deg: 0.0, range_km: 800.0, is_visible: true },
            }],
        };
        (id, sat)
    }

    #[test]
    fn builds_one_sample_per_selected_satellite() {
        let (id0, sat0) = sample_satellite(0);
        let (id1, sat1) = sample_satellite(1);
        let satellites_by_id: HashMap<SatelliteId, &Satellite> = HashMap::from([(id0, &sat0), (id1, &sat1)]);
        let candidates = vec![
            SatelliteCandidate {
                satellite: id0,
                constellation: Constellation::Starlink,
                coverage_score: 0.8,
                signal_quality_score: 0.7,
                stability_score: 0.9,
                resource_cost: 0.2,
                predicted_handovers: 1,
                coverage_windows: vec![],
            },
            SatelliteCandidate {
                satellite: id1,
                constellation: Constellation::Starlink,
                coverage_score: 0.6,
                signal_quality_score: 0.5,
                stability_score: 0.8,
                resource_cost: 0.3,
                predicted_handovers: 0,
                coverage_windows: vec![],
            },
        ];
        let pool = PoolConfiguration {
            configuration_id: uuid::Uuid::nil(),
            starlink_set: vec![id0, id1],
            oneweb_set: vec![],
            coverage_rate: 0.9,
            avg_signal_quality: 0.8,
            est_handover_frequency: 1.0,
            resource_utilization: 0.5,
            fitness_score: 0.8,
        };
        let samples = build_rl_samples(&satellites_by_id, &candidates, &pool);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].candidates.len(), 1);
    }
}
