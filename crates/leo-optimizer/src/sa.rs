//! Simulated annealing (`spec.md` §4.8): T0=100, cooling=0.95, Tmin=0.01,
//! max_iter=1000 — verbatim from `dynamic_pool_optimizer_engine.py`
//! lines 255-260. Neighbor operators add/remove/replace, each repaired
//! back into the feasible quantity range.

use crate::individual::{Individual, ONEWEB_MAX, ONEWEB_MIN, STARLINK_MAX, STARLINK_MIN};
use crate::objectives::evaluate;
use leo_core::ids::SatelliteId;
use leo_core::model::SatelliteCandidate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const INITIAL_TEMPERATURE: f64 = 100.0;
pub const COOLING_RATE: f64 = 0.95;
pub const MIN_TEMPERATURE: f64 = 0.01;
pub const MAX_ITERATIONS: usize = 1000;

pub struct SaResult {
    pub best: Individual,
    pub fitness: f64,
}

fn fitness_of(individual: &Individual, candidates_by_id: &HashMap<SatelliteId, &SatelliteCandidate>) -> f64 {
    let selected: Vec<&SatelliteCandidate> = individual
        .all()
        .iter()
        .filter_map(|id| candidates_by_id.get(id).copied())
        .collect();
    evaluate(&selected).fitness
}

enum NeighborOp {
    Add,
    Remove,
    Replace,
}

fn generate_neighbor(
    current: &Individual,
    starlink_pool: &[SatelliteId],
    oneweb_pool: &[SatelliteId],
    rng: &mut impl Rng,
) -> Individual {
    let mut neighbor = current.clone();
    let op = [NeighborOp::Add, NeighborOp::Remove, NeighborOp::Replace]
        .into_iter()
        .nth(rng.gen_range(0..3))
        .unwrap();
    let touch_starlink = rng.gen_bool(0.5);
    let (list, pool, min, max) = if touch_starlink {
        (&mut neighbor.starlink, starlink_pool, STARLINK_MIN, STARLINK_MAX)
    } else {
        (&mut neighbor.oneweb, oneweb_pool, ONEWEB_MIN, ONEWEB_MAX)
    };

    match op {
        NeighborOp::Add if list.len() < max => {
            if let Some(candidate) = pool.iter().filter(|id| !list.contains(id)).collect::<Vec<_>>().choose(rng) {
                list.push(**candidate);
            }
        }
        NeighborOp::Remove if list.len() > min => {
            let idx = rng.gen_range(0..list.len());
            list.remove(idx);
        }
        NeighborOp::Replace if !list.is_empty() => {
            let idx = rng.gen_range(0..list.len());
            if let Some(candidate) = pool.iter().filter(|id| !list.contains(id)).collect::<Vec<_>>().choose(rng) {
                list[idx] = **candidate;
            }
        }
        _ => {}
    }

    neighbor
}

pub fn run(
    candidates: &[SatelliteCandidate],
    starlink_pool: &[SatelliteId],
    oneweb_pool: &[SatelliteId],
    rng: &mut impl Rng,
) -> Option<SaResult> {
    let candidates_by_id: HashMap<SatelliteId, &SatelliteCandidate> =
        candidates.iter().map(|c| (c.satellite, c)).collect();

    let mut current = Individual::random(starlink_pool, oneweb_pool, rng)?;
    let mut current_fitness = fitness_of(&current, &candidates_by_id);

    let mut best = current.clone();
    let mut best_fitness = current_fitness;

    let mut temperature = INITIAL_TEMPERATURE;
    let mut iteration = 0;

    while temperature > MIN_TEMPERATURE && iteration < MAX_ITERATIONS {
        let neighbor = generate_neighbor(&current, starlink_pool, oneweb_pool, rng);
        if !neighbor.is_feasible() {
            iteration += 1;
            temperature *= COOLING_RATE;
            continue;
        }
        let neighbor_fitness = fitness_of(&neighbor, &candidates_by_id);

        // Maximizing fitness: accept improvements always, accept
        // regressions with Metropolis probability exp(delta / T).
        let delta = neighbor_fitness - current_fitness;
        if delta > 0.0 || rng.gen::<f64>() < (delta / temperature).exp() {
            current = neighbor;
            current_fitness = neighbor_fitness;
            if current_fitness > best_fitness {
                best = current.clone();
                best_fitness = current_fitness;
            }
        }

        temperature *= COOLING_RATE;
        iteration += 1;
    }

    Some(SaResult { best, fitness: best_fitness })
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
            coverage_score: 0.6,
            signal_quality_score: 0.6,
            stability_score: 0.6,
            resource_cost: 0.4,
            predicted_handovers: 6,
            coverage_windows: vec![],
        }
    }

    #[test]
    fn converges_to_feasible_result() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
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
    fn neighbor_stays_within_one_touched_list() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        let starlink_ids: Vec<SatelliteId> = (0..20).map(SatelliteId).collect();
        let oneweb_ids: Vec<SatelliteId> = (100..110).map(SatelliteId).collect();
        let current = Individual::random(&starlink_ids, &oneweb_ids, &mut rng).unwrap();
        let neighbor = generate_neighbor(&current, &starlink_ids, &oneweb_ids, &mut rng);
        let starlink_changed = neighbor.starlink != current.starlink;
        let oneweb_changed = neighbor.oneweb != current.oneweb;
        assert!(!(starlink_changed && oneweb_changed));
    }
}
