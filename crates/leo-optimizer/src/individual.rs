//! Candidate set representation shared by GA/SA/PSO, and the hard
//! quantity constraints every individual must respect (`spec.md` §4.8).

use leo_core::ids::SatelliteId;
use rand::seq::SliceRandom;
use rand::Rng;

pub const STARLINK_MIN: usize = 10;
pub const STARLINK_MAX: usize = 15;
pub const ONEWEB_MIN: usize = 3;
pub const ONEWEB_MAX: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    pub starlink: Vec<SatelliteId>,
    pub oneweb: Vec<SatelliteId>,
}

impl Individual {
    pub fn is_feasible(&self) -> bool {
        (STARLINK_MIN..=STARLINK_MAX).contains(&self.starlink.len())
            && (ONEWEB_MIN..=ONEWEB_MAX).contains(&self.oneweb.len())
    }

    pub fn all(&self) -> Vec<SatelliteId> {
        self.starlink.iter().chain(self.oneweb.iter()).cloned().collect()
    }

    /// Random feasible individual drawn from the available pools.
    pub fn random(
        starlink_pool: &[SatelliteId],
        oneweb_pool: &[SatelliteId],
        rng: &mut impl Rng,
    ) -> Option<Self> {
        if starlink_pool.len() < STARLINK_MIN || oneweb_pool.len() < ONEWEB_MIN {
            return None;
        }
        let starlink_count = rng.gen_range(STARLINK_MIN..=STARLINK_MAX.min(starlink_pool.len()));
        let oneweb_count = rng.gen_range(ONEWEB_MIN..=ONEWEB_MAX.min(oneweb_pool.len()));
        let starlink = starlink_pool.choose_multiple(rng, starlink_count).cloned().collect();
        let oneweb = oneweb_pool.choose_multiple(rng, oneweb_count).cloned().collect();
        Some(Individual { starlink, oneweb })
    }

    /// Single-point crossover per constellation list, followed by
    /// dedup-and-truncate back to a feasible length. Mirrors the
    /// original's list-concat-then-dedup approach but applied within
    /// each constellation so the constraint split survives crossover.
    pub fn crossover(a: &Individual, b: &Individual, rng: &mut impl Rng) -> (Individual, Individual) {
        let (sl1, sl2) = crossover_list(&a.starlink, &b.starlink, rng);
        let (ow1, ow2) = crossover_list(&a.oneweb, &b.oneweb, rng);
        (
            Individual { starlink: sl1, oneweb: ow1 },
            Individual { starlink: sl2, oneweb: ow2 },
        )
    }

    /// Random-replace mutation, repaired back into the feasible range.
    pub fn mutate(
        &mut self,
        starlink_pool: &[SatelliteId],
        oneweb_pool: &[SatelliteId],
        mutation_rate: f64,
        rng: &mut impl Rng,
    ) {
        if rng.gen::<f64>() < mutation_rate && !self.starlink.is_empty() {
            replace_one(&mut self.starlink, starlink_pool, rng);
        }
        if rng.gen::<f64>() < mutation_rate && !self.oneweb.is_empty() {
            replace_one(&mut self.oneweb, oneweb_pool, rng);
        }
        repair(&mut self.starlink, starlink_pool, STARLINK_MIN, STARLINK_MAX, rng);
        repair(&mut self.oneweb, oneweb_pool, ONEWEB_MIN, ONEWEB_MAX, rng);
    }
}

fn crossover_list(a: &[SatelliteId], b: &[SatelliteId], rng: &mut impl Rng) -> (Vec<SatelliteId>, Vec<SatelliteId>) {
    let max_point = a.len().min(b.len());
    if max_point < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let point = rng.gen_range(1..max_point);
    let mut child1: Vec<SatelliteId> = a[..point].iter().chain(b[point..].iter()).cloned().collect();
    let mut child2: Vec<SatelliteId> = b[..point].iter().chain(a[point..].iter()).cloned().collect();
    dedup_preserve_order(&mut child1);
    dedup_preserve_order(&mut child2);
    (child1, child2)
}

fn dedup_preserve_order(list: &mut Vec<SatelliteId>) {
    let mut seen = std::collections::HashSet::new();
    list.retain(|id| seen.insert(*id));
}

fn replace_one(list: &mut [SatelliteId], pool: &[SatelliteId], rng: &mut impl Rng) {
    if pool.is_empty() {
        return;
    }
    let idx = rng.gen_range(0..list.len());
    if let Some(candidate) = pool.choose(rng) {
        if !list.contains(candidate) {
            list[idx] = *candidate;
        }
    }
}

/// Bring `list` back within `[min, max]` by adding from `pool` or
/// trimming, used after mutation/crossover may have pushed it out of
/// range.
fn repair(list: &mut Vec<SatelliteId>, pool: &[SatelliteId], min: usize, max: usize, rng: &mut impl Rng) {
    dedup_preserve_order(list);
    while list.len() < min {
        let remaining: Vec<SatelliteId> = pool.iter().filter(|id| !list.contains(id)).cloned().collect();
        match remaining.choose(rng) {
            Some(id) => list.push(*id),
            None => break,
        }
    }
    if list.len() > max {
        list.truncate(max);
    }
}
