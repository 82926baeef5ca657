//! Emits a binary tensor file (sequences, rewards, actions) plus a JSON
//! config describing its layout. The binary emission is best-effort: if
//! the output directory can't be created or written to, it is skipped
//! and only the JSON config (with `tensor_path: None`) is produced.

use crate::action::{Action, CONTINUOUS_ACTION_DIM};
use crate::state::STATE_DIM;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: [f64; STATE_DIM],
    pub action: Action,
    pub reward: f64,
}

#[derive(Debug, Serialize)]
pub struct DatasetConfig {
    pub state_dim: usize,
    pub discrete_actions: usize,
    pub continuous_action_dim: usize,
    pub transition_count: usize,
    pub tensor_path: Option<PathBuf>,
}

/// Little-endian `f64` layout: for each transition, `state_dim` state
/// values, then the discrete action index as `f64`, then
/// `continuous_action_dim` continuous values, then the scalar reward.
fn encode_transitions(transitions: &[Transition]) -> Vec<u8> {
    let stride = STATE_DIM + 1 + CONTINUOUS_ACTION_DIM + 1;
    let mut buf = Vec::with_capacity(transitions.len() * stride * 8);
    for t in transitions {
        for v in t.state {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&(t.action.discrete.index() as f64).to_le_bytes());
        buf.extend_from_slice(&t.action.continuous.handover_prob.to_le_bytes());
        buf.extend_from_slice(&t.action.continuous.cand_weight.to_le_bytes());
        buf.extend_from_slice(&t.action.continuous.threshold_adj.to_le_bytes());
        buf.extend_from_slice(&t.reward.to_le_bytes());
    }
    buf
}

/// Write the tensor binary and JSON config under `output_dir`. Returns the
/// config regardless of whether the binary write succeeded.
pub async fn write_dataset(output_dir: &Path, transitions: &[Transition]) -> DatasetConfig {
    let tensor_path = output_dir.join("rl_transitions.bin");

    let write_result: std::io::Result<()> = async {
        fs::create_dir_all(output_dir).await?;
        let bytes = encode_transitions(transitions);
        let mut file = fs::File::create(&tensor_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        Ok(())
    }
    .await;

    let tensor_path = match write_result {
        Ok(()) => Some(tensor_path),
        Err(e) => {
            warn!(error = %e, "RL tensor writer unavailable, emitting config only");
            None
        }
    };

    DatasetConfig {
        state_dim: STATE_DIM,
        discrete_actions: 5,
        continuous_action_dim: CONTINUOUS_ACTION_DIM,
        transition_count: transitions.len(),
        tensor_path,
    }
}
