//! Multi-objective pool optimizer (C8). GA, SA and PSO each search for a
//! feasible `PoolConfiguration` concurrently; the highest-fitness
//! feasible result wins, ties broken by `coverage_continuity`
//! (`spec.md` §4.8).

pub mod ga;
pub mod individual;
pub mod objectives;
pub mod pso;
pub mod sa;

pub use individual::Individual;
pub use objectives::ObjectiveScores;

use leo_core::ids::SatelliteId;
use leo_core::model::{Constellation, PoolConfiguration, SatelliteCandidate};
use leo_core::{Error, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    GeneticAlgorithm,
    SimulatedAnnealing,
    ParticleSwarm,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::GeneticAlgorithm => "genetic_algorithm",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::ParticleSwarm => "particle_swarm",
        }
    }
}

struct AlgorithmOutcome {
    algorithm: Algorithm,
    individual: Individual,
    fitness: f64,
}

fn run_one(
    algorithm: Algorithm,
    candidates: Vec<SatelliteCandidate>,
    starlink_pool: Vec<SatelliteId>,
    oneweb_pool: Vec<SatelliteId>,
    seed: u64,
) -> Option<AlgorithmOutcome> {
    let mut rng = StdRng::seed_from_u64(seed);
    match algorithm {
        Algorithm::GeneticAlgorithm => ga::run(&candidates, &starlink_pool, &oneweb_pool, &mut rng)
            .map(|r| AlgorithmOutcome { algorithm, individual: r.best, fitness: r.fitness }),
        Algorithm::SimulatedAnnealing => sa::run(&candidates, &starlink_pool, &oneweb_pool, &mut rng)
            .map(|r| AlgorithmOutcome { algorithm, individual: r.best, fitness: r.fitness }),
        Algorithm::ParticleSwarm => pso::run(&candidates, &starlink_pool, &oneweb_pool, &mut rng)
            .map(|r| AlgorithmOutcome { algorithm, individual: r.best, fitness: r.fitness }),
    }
}

/// Run GA, SA and PSO concurrently on worker threads (each is CPU-bound
/// and synchronous) and select the winner. Returns the configuration
/// alongside the algorithm that produced it, so callers (the gatekeeper
/// re-check in particular) can observe which planner actually ran rather
/// than assuming one ahead of time.
pub async fn optimize(candidates: &[SatelliteCandidate], rng_seed: u64) -> Result<(PoolConfiguration, Algorithm)> {
    let starlink_pool: Vec<SatelliteId> = candidates
        .iter()
        .filter(|c| c.constellation == Constellation::Starlink)
        .map(|c| c.satellite)
        .collect();
    let oneweb_pool: Vec<SatelliteId> = candidates
        .iter()
        .filter(|c| c.constellation == Constellation::OneWeb)
        .map(|c| c.satellite)
        .collect();

    let algorithms = [Algorithm::GeneticAlgorithm, Algorithm::SimulatedAnnealing, Algorithm::ParticleSwarm];
    let mut handles = Vec::with_capacity(algorithms.len());
    for (i, algorithm) in algorithms.into_iter().enumerate() {
        let candidates = candidates.to_vec();
        let starlink_pool = starlink_pool.clone();
        let oneweb_pool = oneweb_pool.clone();
        let seed = rng_seed.wrapping_add(i as u64);
        handles.push(tokio::task::spawn_blocking(move || {
            run_one(algorithm, candidates, starlink_pool, oneweb_pool, seed)
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(Some(outcome)) => outcomes.push(outcome),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "optimizer worker panicked"),
        }
    }

    let winner = outcomes
        .into_iter()
        .max_by(|a, b| {
            a.fitness
                .partial_cmp(&b.fitness)
                .unwrap()
                .then_with(|| coverage_continuity(a, candidates).partial_cmp(&coverage_continuity(b, candidates)).unwrap())
        })
        .ok_or_else(|| Error::NoFeasibleConfiguration("GA/SA/PSO all failed to produce a feasible pool".to_string()))?;

    info!(algorithm = winner.algorithm.as_str(), fitness = winner.fitness, "pool optimizer selected winner");

    let algorithm = winner.algorithm;
    let config = build_configuration(&winner, candidates, rng_seed)?;
    Ok((config, algorithm))
}

/// Derive the pool's id from the selected satellite ids and the run seed
/// instead of drawing fresh randomness, so identical input and seed always
/// produce byte-identical output (`spec.md` §8 invariant 6).
fn deterministic_configuration_id(selected_ids: &[SatelliteId], rng_seed: u64) -> uuid::Uuid {
    let mut sorted: Vec<u32> = selected_ids.iter().map(|id| id.0).collect();
    sorted.sort_unstable();
    let key = format!("{rng_seed}:{sorted:?}");
    let hi = leo_core::detseed::seed_from_id(&key);
    let lo = leo_core::detseed::seed_from_id(&format!("{key}:lo"));
    uuid::Uuid::from_u64_pair(hi, lo)
}

fn coverage_continuity(outcome: &AlgorithmOutcome, candidates: &[SatelliteCandidate]) -> f64 {
    let by_id: std::collections::HashMap<SatelliteId, &SatelliteCandidate> =
        candidates.iter().map(|c| (c.satellite, c)).collect();
    let selected: Vec<&SatelliteCandidate> =
        outcome.individual.all().iter().filter_map(|id| by_id.get(id).copied()).collect();
    objectives::evaluate(&selected).coverage_continuity
}

fn build_configuration(outcome: &AlgorithmOutcome, candidates: &[SatelliteCandidate], rng_seed: u64) -> Result<PoolConfiguration> {
    let by_id: std::collections::HashMap<SatelliteId, &SatelliteCandidate> =
        candidates.iter().map(|c| (c.satellite, c)).collect();
    let selected: Vec<&SatelliteCandidate> =
        outcome.individual.all().iter().filter_map(|id| by_id.get(id).copied()).collect();
    let scores = objectives::evaluate(&selected);

    let avg_resource_cost = if selected.is_empty() {
        0.0
    } else {
        selected.iter().map(|c| c.resource_cost).sum::<f64>() / selected.len() as f64
    };

    let config = PoolConfiguration {
        configuration_id: deterministic_configuration_id(&outcome.individual.all(), rng_seed),
        starlink_set: outcome.individual.starlink.clone(),
        oneweb_set: outcome.individual.oneweb.clone(),
        coverage_rate: scores.coverage_continuity,
        avg_signal_quality: selected.iter().map(|c| c.signal_quality_score).sum::<f64>()
            / selected.len().max(1) as f64,
        est_handover_frequency: selected.iter().map(|c| c.predicted_handovers as f64).sum::<f64>()
            / selected.len().max(1) as f64,
        resource_utilization: 1.0 - avg_resource_cost,
        fitness_score: scores.fitness,
    };
    config
        .validate_invariants()
        .map_err(|e| Error::NoFeasibleConfiguration(format!("winning configuration failed invariant check: {e}")))?;
    Ok(config)
}
