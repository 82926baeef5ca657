//! Genetic algorithm (`spec.md` §4.8): population 50, generations 100,
//! mutation 0.1, crossover 0.8, tournament-3 selection, single-point
//! crossover with dedup, random-replace mutation — verbatim from
//! `dynamic_pool_optimizer_engine.py` lines 82-87.

use crate::individual::Individual;
use crate::objectives::evaluate;
use leo_core::ids::SatelliteId;
use leo_core::model::SatelliteCandidate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

pub const POPULATION_SIZE: usize = 50;
pub const GENERATIONS: usize = 100;
pub const MUTATION_RATE: f64 = 0.1;
pub const CROSSOVER_RATE: f64 = 0.8;
pub const TOURNAMENT_SIZE: usize = 3;

pub struct GaResult {
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

fn tournament_select(population: &[Individual], fitness: &[f64], rng: &mut impl Rng) -> Vec<Individual> {
    (0..population.len())
        .map(|_| {
            let indices: Vec<usize> = (0..population.len())
                .collect::<Vec<_>>()
                .choose_multiple(rng, TOURNAMENT_SIZE.min(population.len()))
                .cloned()
                .collect();
            let winner = indices
                .into_iter()
                .max_by(|&a, &b| fitness[a].partial_cmp(&fitness[b]).unwrap())
                .unwrap();
            population[winner].clone()
        })
        .collect()
}

pub fn run(
    candidates: &[SatelliteCandidate],
    starlink_pool: &[SatelliteId],
    oneweb_pool: &[SatelliteId],
    rng: &mut impl Rng,
) -> Option<GaResult> {
    let candidates_by_id: HashMap<SatelliteId, &SatelliteCandidate> =
        candidates.iter().map(|c| (c.satellite, c)).collect();

    let mut population: Vec<Individual> = (0..POPULATION_SIZE)
        .filter_map(|_| Individual::random(starlink_pool, oneweb_pool, rng))
        .collect();
    if population.is_empty() {
        return None;
    }

    let mut best: Option<(Individual, f64)> = None;

    for _generation in 0..GENERATIONS {
        let fitness: Vec<f64> = population.iter().map(|ind| fitness_of(ind, &candidates_by_id)).collect();

        let (max_idx, &max_fitness) = fitness
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        if best.as_ref().map(|(_, f)| max_fitness > *f).unwrap_or(true) {
            best = Some((population[max_idx].clone(), max_fitness));
        }

        let selected = tournament_select(&population, &fitness, rng);

        let mut offspring = Vec::with_capacity(selected.len());
        let mut i = 0;
        while i < selected.len() {
            let parent1 = &selected[i];
            let parent2 = if i + 1 < selected.len() { &selected[i + 1] } else { &selected[0] };
            if rng.gen::<f64>() < CROSSOVER_RATE {
                let (c1, c2) = Individual::crossover(parent1, parent2, rng);
                offspring.push(c1);
                offspring.push(c2);
            } else {
                offspring.push(parent1.clone());
                offspring.push(parent2.clone());
            }
            i += 2;
        }
        offspring.truncate(population.len());

        for ind in &mut offspring {
            ind.mutate(starlink_pool, oneweb_pool, MUTATION_RATE, rng);
        }

        population = offspring;
    }

    best.map(|(individual, fitness)| GaResult { best: individual, fitness })
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
            coverage_score: 0.7,
            signal_quality_score: 0.7,
            stability_score: 0.7,
            resource_cost: 0.3,
            predicted_handovers: 4,
            coverage_windows: vec![],
        }
    }

    #[test]
    fn converges_to_a_feasible_result() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let starlink: Vec<SatelliteCandidate> = (0..20).map(|i| candidate(i, Constellation::Starlink)).collect();
        let oneweb: Vec<SatelliteCandidate> = (100..110).map(|i| candidate(i, Constellation::OneWeb)).collect();
        let mut all = starlink.clone();
        all.extend(oneweb.clone());
        let starlink_ids: Vec<SatelliteId> = starlink.iter().map(|c| c.satellite).collect();
        let oneweb_ids: Vec<SatelliteId> = oneweb.iter().map(|c| c.satellite).collect();

        let result = run(&all, &starlink_ids, &oneweb_ids, &mut rng).unwrap();
        assert!(result.best.is_feasible());
        assert!(result.fitness > 0.0);
    }

    #[test]
    fn insufficient_candidates_returns_none() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let sparse_starlink: Vec<SatelliteId> = (0..5).map(SatelliteId).collect();
        let oneweb: Vec<SatelliteId> = (100..105).map(SatelliteId).collect();
        assert!(run(&[], &sparse_starlink, &oneweb, &mut rng).is_none());
    }
}
