//! RL dataset builder (C10, `spec.md` §4.10). Produces training artifacts
//! only — no training happens here.

pub mod action;
pub mod reward;
pub mod state;
pub mod writer;

pub use action::{Action, ContinuousAction, DiscreteAction};
pub use reward::{compute_reward, RewardInputs};
pub use state::{build_state, CandidateObservation, EnvironmentObservation, ServingSatelliteObservation};
pub use writer::{write_dataset, DatasetConfig, Transition};

use std::path::Path;
use tracing::info;

/// One fully-formed training sample: state, the action taken, and its
/// reward.
pub struct DatasetSample {
    pub serving: ServingSatelliteObservation,
    pub candidates: Vec<CandidateObservation>,
    pub environment: EnvironmentObservation,
    pub action: Action,
    pub reward_inputs: RewardInputs,
}

/// Fold raw samples into transitions and emit the dataset artifacts.
pub async fn build_dataset(output_dir: &Path, samples: &[DatasetSample]) -> DatasetConfig {
    let transitions: Vec<Transition> = samples
        .iter()
        .map(|sample| {
            let state = build_state(&sample.serving, &sample.candidates, &sample.environment);
            let reward = compute_reward(&sample.reward_inputs);
            Transition { state: state.vector, action: sample.action, reward }
        })
        .collect();

    info!(count = transitions.len(), "built RL transitions");
    write_dataset(output_dir, &transitions).await
}
