//! Particle swarm optimization (`spec.md` §4.8): 30 particles, 100
//! iterations, w=0.7, c1=c2=1.5 — verbatim from
//! `dynamic_pool_optimizer_engine.py` lines 373-379. Continuous
//! positions in `[0,1]^N` decode to a selection via sorted-probability
//! plus a constraint-respecting top-k.

use crate::individual::{Individual, ONEWEB_MAX, ONEWEB_MIN, STARLINK_MAX, STARLINK_MIN};
use crate::objectives::evaluate;
use leo_core::ids::SatelliteId;
use leo_core::model::SatelliteCandidate;
use rand::Rng;
use std::collections::HashMap;

pub const PARTICLE_COUNT: usize = 30;
pub const ITERATIONS: usize = 100;
pub const INERTIA_WEIGHT: f64 = 0.7;
pub const COGNITIVE_WEIGHT: f64 = 1.5;
pub const SOCIAL_WEIGHT: f64 = 1.5;

/// Selection-probability cutoff a particle's continuous gene must clear
/// before its satellite is even considered for inclusion.
const SELECTION_THRESHOLD: f64 = 0.5;

pub struct PsoResult {
    pub best: Individual,
    pub fitness: f64,
}

fn decode_list(position: &[f64], pool: &[SatelliteId], min: usize, max: usize) -> Vec<SatelliteId> {
    let mut scored: Vec<(SatelliteId, f64)> = pool.iter().cloned().zip(position.iter().cloned()).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let above_threshold = scored.iter().filter(|(_, p)| *p > SELECTION_THRESHOLD).count();
    let count = above_threshold.clamp(min, max.min(pool.len()));
    scored.into_iter().take(count).map(|(id, _)| id).collect()
}

fn decode(position: &[f64], starlink_pool: &[SatelliteId], oneweb_pool: &[SatelliteId]) -> Individual {
    let (starlink_part, oneweb_part) = position.split_at(starlink_pool.len());
    Individual {
        starlink: decode_list(starlink_part, starlink_pool, STARLINK_MIN, STARLINK_MAX),
        oneweb: decode_list(oneweb_part, oneweb_pool, ONEWEB_MIN, ONEWEB_MAX),
    }
}

fn fitness_of(individual: &Individual, candidates_by_id: &HashMap<SatelliteId, &SatelliteCandidate>) -> f64 {
    let selected: Vec<&SatelliteCandidate> = individual
        .all()
        .iter()
        .filter_map(|id| candidates_by_id.get(id).copied())
        .collect();
    evaluate(&selected).fitness
}

struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    best_fitness: f64,
}

pub fn run(
    candidates: &[SatelliteCandidate],
    starlink_pool: &[SatelliteId],
    oneweb_pool: &[SatelliteId],
    rng: &mut impl Rng,
) -> Option<PsoResult> {
    if starlink_pool.len() < STARLINK_MIN || oneweb_pool.len() < ONEWEB_MIN {
        return None;
    }
    let candidates_by_id: HashMap<SatelliteId, &SatelliteCandidate> =
        candidates.iter().map(|c| (c.satellite, c)).collect();
    let dims = starlink_pool.len() + oneweb_pool.len();

    let mut particles: Vec<Particle> = (0..PARTICLE_COUNT)
        .map(|_| {
            let position: Vec<f64> = (0..dims).map(|_| rng.gen::<f64>()).collect();
            let fitness = fitness_of(&decode(&position, starlink_pool, oneweb_pool), &candidates_by_id);
            Particle {
                velocity: vec![0.0; dims],
                best_position: position.clone(),
                best_fitness: fitness,
                position,
            }
        })
        .collect();

    let mut global_best_position = particles
        .iter()
        .max_by(|a, b| a.best_fitness.partial_cmp(&b.best_fitness).unwrap())
        .unwrap()
        .best_position
        .clone();
    let mut global_best_fitness = particles.iter().map(|p| p.best_fitness).fold(f64::MIN, f64::max);

    for _ in 0..ITERATIONS {
        for particle in &mut particles {
            for d in 0..dims {
                let r1 = rng.gen::<f64>();
                let r2 = rng.gen::<f64>();
                particle.velocity[d] = INERTIA_WEIGHT * particle.velocity[d]
                    + COGNITIVE_WEIGHT * r1 * (particle.best_position[d] - particle.position[d])
                    + SOCIAL_WEIGHT * r2 * (global_best_position[d] - particle.position[d]);
                particle.position[d] = (particle.position[d] + particle.velocity[d]).clamp(0.0, 1.0);
            }

            let individual = decode(&particle.position, starlink_pool, oneweb_pool);
            let fitness = fitness_of(&individual, &candidates_by_id);
            if fitness > particle.best_fitness {
                particle.best_fitness = fitness;
                particle.best_position = particle.position.clone();
            }
            if fitness > global_best_fitness {
                global_best_fitness = fitness;
                global_best_position = particle.position.clone();
            }
        }
    }

    let best = decode(&global_best_position, starlink_pool, oneweb_pool);
    Some(PsoResult { best, fitness: global_best_fitness })
}

#[cfg(test)]
mod tests {
    use super::*;
    use leo_core::model::Constellation;
    use rand::SeedableRng;

    fn candidate(id: u32, constellation: Constellation) -> SatelliteCandidate {
        SatelliteCandidate {
            satellite: SatelliteId(id),
            constellation,
            coverage_score: 0.65,
            signal_quality_score: 0.65,
            stability_score: 0.65,
            resource_cost: 0.35,
            predicted_handovers: 5,
            coverage_windows: vec![],
        }
    }

    #[test]
    fn converges_to_feasible_result() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        let starlink: Vec<SatelliteCandidate> = (0..20).map(|i| candidate(i, Constellation::Starlink)).collect();
        let oneweb: Vec<SatelliteCandidate> = (100..110).map(|i| candidate(i, Constellation::OneWeb)).collect();
        let mut all = starlink.clone();
        all.extend(oneweb.clone());
        let starlink_ids: Vec<SatelliteId> = starlink.iter().map(|c| c.satellite).collect();
        let oneweb_ids: Vec<SatelliteId> = oneweb.iter().map(|c| c.satellite).collect();

        let result = run(&all, &starlink_ids, &oneweb_ids, &mut rng).unwrap();
        assert!(result.best.is_feasible());
    }

    #[test]
    fn decode_respects_cardinality_bounds() {
        let starlink_ids: Vec<SatelliteId> = (0..20).map(SatelliteId).collect();
        let position = vec![0.9; 20];
        let list = decode_list(&position, &starlink_ids, STARLINK_MIN, STARLINK_MAX);
        assert!(list.len() <= STARLINK_MAX);
        assert!(list.len() >= STARLINK_MIN);
    }
}
