//! Action space (`spec.md` §4.10): 5 discrete actions plus a 3-dim
//! continuous component.

pub const CONTINUOUS_ACTION_DIM: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiscreteAction {
    Maintain,
    HandoverCand1,
    HandoverCand2,
    HandoverCand3,
    EmergencyScan,
}

impl DiscreteAction {
    pub const ALL: [DiscreteAction; 5] = [
        DiscreteAction::Maintain,
        DiscreteAction::HandoverCand1,
        DiscreteAction::HandoverCand2,
        DiscreteAction::HandoverCand3,
        DiscreteAction::EmergencyScan,
    ];

    pub fn index(&self) -> usize {
        match self {
            DiscreteAction::Maintain => 0,
            DiscreteAction::HandoverCand1 => 1,
            DiscreteAction::HandoverCand2 => 2,
            DiscreteAction::HandoverCand3 => 3,
            DiscreteAction::EmergencyScan => 4,
        }
    }

    /// Candidate slot (0-indexed) this action hands over to, if any.
    pub fn candidate_slot(&self) -> Option<usize> {
        match self {
            DiscreteAction::HandoverCand1 => Some(0),
            DiscreteAction::HandoverCand2 => Some(1),
            DiscreteAction::HandoverCand3 => Some(2),
            _ => None,
        }
    }
}

/// `handover_prob` in [0,1], `cand_weight` a scalar preference over the
/// candidate pool, `threshold_adj` a signed elevation-threshold nudge.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ContinuousAction {
    pub handover_prob: f64,
    pub cand_weight: f64,
    pub threshold_adj: f64,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Action {
    pub discrete: DiscreteAction,
    pub continuous: ContinuousAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_action_set_has_five_members() {
        assert_eq!(DiscreteAction::ALL.len(), 5);
    }

    #[test]
    fn handover_actions_map_to_candidate_slots() {
        assert_eq!(DiscreteAction::HandoverCand1.candidate_slot(), Some(0));
        assert_eq!(DiscreteAction::Maintain.candidate_slot(), None);
        assert_eq!(DiscreteAction::EmergencyScan.candidate_slot(), None);
    }
}
