//! Objective weighting and fitness evaluation (`spec.md` §4.8).
//!
//! Fitness is computed directly from the scored `SatelliteCandidate`
//! fields produced upstream (coverage/signal/stability/resource), not the
//! placeholder satellite-count heuristics of the python original — those
//! existed there only because that stage didn't carry real per-candidate
//! scores through to the optimizer.

use leo_core::model::SatelliteCandidate;

pub const WEIGHT_COVERAGE_CONTINUITY: f64 = 0.40;
pub const WEIGHT_CONSTELLATION_EFFICIENCY: f64 = 0.25;
pub const WEIGHT_HANDOVER_OPTIMALITY: f64 = 0.20;
pub const WEIGHT_RESOURCE_BALANCE: f64 = 0.15;

/// Handover counts above this are treated as maximally costly for
/// normalization purposes; `spec.md` §4.9 bounds the sampled window to
/// two hours, so this is a generous upper bound on plausible handovers
/// in that window.
const HANDOVER_NORMALIZATION_CAP: f64 = 20.0;

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ObjectiveScores {
    pub coverage_continuity: f64,
    pub constellation_efficiency: f64,
    pub handover_optimality: f64,
    pub resource_balance: f64,
    pub fitness: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Evaluate the four weighted objectives over the candidates selected by
/// an individual (both constellations combined).
pub fn evaluate(selected: &[&SatelliteCandidate]) -> ObjectiveScores {
    let coverage_continuity = mean(&selected.iter().map(|c| c.coverage_score).collect::<Vec<_>>());
    let constellation_efficiency = mean(
        &selected
            .iter()
            .map(|c| 0.5 * c.signal_quality_score + 0.5 * c.stability_score)
            .collect::<Vec<_>>(),
    );
    let avg_handovers = mean(&selected.iter().map(|c| c.predicted_handovers as f64).collect::<Vec<_>>());
    let handover_optimality = (avg_handovers / HANDOVER_NORMALIZATION_CAP).clamp(0.0, 1.0);
    let resource_balance = 1.0 - mean(&selected.iter().map(|c| c.resource_cost).collect::<Vec<_>>()).clamp(0.0, 1.0);

    let fitness = WEIGHT_COVERAGE_CONTINUITY * coverage_continuity
        + WEIGHT_CONSTELLATION_EFFICIENCY * constellation_efficiency
        + WEIGHT_HANDOVER_OPTIMALITY * (1.0 - handover_optimality)
        + WEIGHT_RESOURCE_BALANCE * resource_balance;

    ObjectiveScores {
        coverage_continuity,
        constellation_efficiency,
        handover_optimality,
        resource_balance,
        fitness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::ids::SatelliteId;
    use leo_core::model::Constellation;

    fn candidate(coverage: f64, signal: f64, stability: f64, handovers: u32, cost: f64) -> SatelliteCandidate {
        SatelliteCandidate {
            satellite: SatelliteId(0),
            constellation: Constellation::Starlink,
            coverage_score: coverage,
            signal_quality_score: signal,
            stability_score: stability,
            resource_cost: cost,
            predicted_handovers: handovers,
            coverage_windows: vec![],
        }
    }

    #[test]
    fn higher_coverage_increases_fitness() {
        let low = candidate(0.2, 0.5, 0.5, 5, 0.5);
        let high = candidate(0.9, 0.5, 0.5, 5, 0.5);
        let low_score = evaluate(&[&low]);
        let high_score = evaluate(&[&high]);
        assert!(high_score.fitness > low_score.fitness);
    }

    #[test]
    fn more_handovers_decreases_fitness() {
        let few = candidate(0.5, 0.5, 0.5, 2, 0.5);
        let many = candidate(0.5, 0.5, 0.5, 18, 0.5);
        assert!(evaluate(&[&few]).fitness > evaluate(&[&many]).fitness);
    }

    #[test]
    fn empty_selection_is_zero() {
        let scores = evaluate(&[]);
        assert_eq!(scores.fitness, 0.0);
    }
}
