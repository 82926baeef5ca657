//! Runtime gatekeeper (C12, `spec.md` §4.12). A zero-tolerance pre-flight
//! gate: any failing check aborts the run immediately, the orchestrator
//! must not catch and continue.

use leo_core::model::Constellation;
use leo_core::{Error, Result};
use tracing::error;

/// Known-good concrete planner/optimizer implementations. Anything else
/// (placeholder/shortcut implementations like "random_selection",
/// "fixed_percentage", "simplified_orbital") is rejected.
pub const ALLOWED_PLANNER_TYPES: &[&str] =
    &["genetic_algorithm", "simulated_annealing", "particle_swarm"];

/// Class-name substrings that mark a stand-in component masquerading as
/// the real thing.
const FORBIDDEN_CLASS_NAME_SUBSTRINGS: &[&str] =
    &["mock_satellites", "estimated_visibility", "arbitrary_coverage"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredSubcomponent {
    OrbitalPhaseAnalysis,
    PoolOptimizer,
    TrajectoryPrediction,
}

impl RequiredSubcomponent {
    fn label(&self) -> &'static str {
        match self {
            RequiredSubcomponent::OrbitalPhaseAnalysis => "orbital_phase_analysis",
            RequiredSubcomponent::PoolOptimizer => "pool_optimizer",
            RequiredSubcomponent::TrajectoryPrediction => "trajectory_prediction",
        }
    }
}

pub const REQUIRED_SUBCOMPONENTS: &[RequiredSubcomponent] = &[
    RequiredSubcomponent::OrbitalPhaseAnalysis,
    RequiredSubcomponent::PoolOptimizer,
    RequiredSubcomponent::TrajectoryPrediction,
];

/// A subcomponent as reported by whatever assembled the pipeline: its
/// class/type name, and whether it is actually wired into the run (as
/// opposed to merely instantiated and unused).
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    pub kind: RequiredSubcomponent,
    pub class_name: String,
    pub wired: bool,
}

/// Everything the gate needs to know about the upstream state before a
/// single stage runs.
pub struct GateInput<'a> {
    pub planner_type: &'a str,
    pub satellite_constellations: &'a [Constellation],
    pub components: &'a [ComponentDescriptor],
}

fn check_planner_type(planner_type: &str) -> Result<()> {
    if ALLOWED_PLANNER_TYPES.contains(&planner_type) {
        Ok(())
    } else {
        Err(Error::ZeroToleranceFailure(format!(
            "錯誤動態池規劃器: planner/optimizer type '{planner_type}' is not in the allowlist {ALLOWED_PLANNER_TYPES:?}"
        )))
    }
}

fn check_constellation_presence(constellations: &[Constellation]) -> Result<()> {
    let starlink_count = constellations.iter().filter(|c| **c == Constellation::Starlink).count();
    let oneweb_count = constellations.iter().filter(|c| **c == Constellation::OneWeb).count();
    if starlink_count > 0 && oneweb_count > 0 {
        Ok(())
    } else {
        Err(Error::ZeroToleranceFailure(format!(
            "upstream data must contain both constellations, found starlink={starlink_count} oneweb={oneweb_count}"
        )))
    }
}

fn check_subcomponents_wired(components: &[ComponentDescriptor]) -> Result<()> {
    for required in REQUIRED_SUBCOMPONENTS {
        let present = components.iter().any(|c| c.kind == *required && c.wired);
        if !present {
            return Err(Error::ZeroToleranceFailure(format!(
                "required subcomponent '{}' is missing or not wired",
                required.label()
            )));
        }
    }
    Ok(())
}

fn check_forbidden_class_names(components: &[ComponentDescriptor]) -> Result<()> {
    for component in components {
        let lowercased = component.class_name.to_ascii_lowercase();
        if let Some(hit) = FORBIDDEN_CLASS_NAME_SUBSTRINGS.iter().find(|s| lowercased.contains(*s)) {
            return Err(Error::ZeroToleranceFailure(format!(
                "component '{}' has forbidden class name pattern '{hit}'",
                component.class_name
            )));
        }
    }
    Ok(())
}

/// Run every gate check in order, failing hard on the first violation.
pub fn run_gate(input: &GateInput) -> Result<()> {
    check_planner_type(input.planner_type)
        .and_then(|_| check_constellation_presence(input.satellite_constellations))
        .and_then(|_| check_subcomponents_wired(input.components))
        .and_then(|_| check_forbidden_class_names(input.components))
        .inspect_err(|e| error!(error = %e, "gatekeeper rejected the run"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wired_components() -> Vec<ComponentDescriptor> {
        vec![
            ComponentDescriptor { kind: RequiredSubcomponent::OrbitalPhaseAnalysis, class_name: "PhaseDiversityAnalyzer".into(), wired: true },
            ComponentDescriptor { kind: RequiredSubcomponent::PoolOptimizer, class_name: "MultiObjectivePoolOptimizer".into(), wired: true },
            ComponentDescriptor { kind: RequiredSubcomponent::TrajectoryPrediction, class_name: "KeplerianTrajectoryPredictor".into(), wired: true },
        ]
    }

    fn good_input<'a>(components: &'a [ComponentDescriptor], constellations: &'a [Constellation]) -> GateInput<'a> {
        GateInput { planner_type: "genetic_algorithm", satellite_constellations: constellations, components }
    }

    #[test]
    fn passes_with_a_fully_compliant_setup() {
        let components = wired_components();
        let constellations = [Constellation::Starlink, Constellation::OneWeb];
        assert!(run_gate(&good_input(&components, &constellations)).is_ok());
    }

    #[test]
    fn rejects_disallowed_planner_type() {
        let components = wired_components();
        let constellations = [Constellation::Starlink, Constellation::OneWeb];
        let input = GateInput { planner_type: "random_selection", satellite_constellations: &constellations, components: &components };
        assert!(matches!(run_gate(&input), Err(Error::ZeroToleranceFailure(_))));
    }

    #[test]
    fn rejects_missing_oneweb_satellites() {
        let components = wired_components();
        let constellations = [Constellation::Starlink, Constellation::Starlink];
        assert!(run_gate(&good_input(&components, &constellations)).is_err());
    }

    #[test]
    fn rejects_unwired_subcomponent() {
        let mut components = wired_components();
        components[1].wired = false;
        let constellations = [Constellation::Starlink, Constellation::OneWeb];
        assert!(run_gate(&good_input(&components, &constellations)).is_err());
    }

    #[test]
    fn rejects_forbidden_class_name() {
        let mut components = wired_components();
        components[0].class_name = "MockSatellitesPhaseStub".into();
        let constellations = [Constellation::Starlink, Constellation::OneWeb];
        assert!(matches!(run_gate(&good_input(&components, &constellations)), Err(Error::ZeroToleranceFailure(_))));
    }
}
