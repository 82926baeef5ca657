//! Reward shaping (`spec.md` §4.10): weighted blend of signal-quality
//! gain, continuity, efficiency and resource terms, plus penalties and
//! bonuses for unnecessary or missed handovers.

use crate::action::DiscreteAction;

pub const WEIGHT_SIGNAL_QUALITY_GAIN: f64 = 0.4;
pub const WEIGHT_CONTINUITY: f64 = 0.3;
pub const WEIGHT_EFFICIENCY: f64 = 0.2;
pub const WEIGHT_RESOURCE: f64 = 0.1;

/// Penalty applied when a handover fires but post-handover RSRP did not
/// improve — the handover bought nothing.
const UNNECESSARY_HANDOVER_PENALTY: f64 = -0.2;

/// Bonus applied when the agent held and the serving link would have
/// dropped below the visibility floor without a handover.
const MISSED_HANDOVER_PENALTY: f64 = -0.5;

#[derive(Debug, Clone, Copy)]
pub struct RewardInputs {
    pub signal_quality_gain: f64,
    pub continuity: f64,
    pub efficiency: f64,
    pub resource: f64,
    pub action: DiscreteAction,
    pub rsrp_improved: bool,
    pub serving_link_would_drop: bool,
}

pub fn compute_reward(inputs: &RewardInputs) -> f64 {
    let base = WEIGHT_SIGNAL_QUALITY_GAIN * inputs.signal_quality_gain
        + WEIGHT_CONTINUITY * inputs.continuity
        + WEIGHT_EFFICIENCY * inputs.efficiency
        + WEIGHT_RESOURCE * inputs.resource;

    let is_handover = inputs.action.candidate_slot().is_some() || inputs.action == DiscreteAction::EmergencyScan;

    let penalty = if is_handover && !inputs.rsrp_improved {
        UNNECESSARY_HANDOVER_PENALTY
    } else if !is_handover && inputs.serving_link_would_drop {
        MISSED_HANDOVER_PENALTY
    } else {
        0.0
    };

    base + penalty
}
