//! Deterministic pseudo-randomness. Every place the original system drew a
//! call to `random.random()` — shadow fading, phase offsets, backup
//! activation order — is replaced by a pure function of an id and fixed
//! constants, so identical input always produces identical output
//! (`spec.md` §8 invariant 7, Design Note §9).

use sha2::{Digest, Sha256};

/// Map an arbitrary string id to a stable `u64` seed.
pub fn seed_from_id(id: &str) -> u64 {
    let digest = Sha256::digest(id.as_bytes());
    u64::from_le_bytes(digest[0..8].try_into().unwrap())
}

/// Map a seed to a value uniformly distributed in `[0, 1)`.
pub fn unit_interval(seed: u64) -> f64 {
    (seed >> 11) as f64 / (1u64 << 53) as f64
}

/// Deterministic trigonometric term in `[-amplitude, amplitude]`, used for
/// the RSRP multipath/shadow-fading component. Pure function of `id` alone.
pub fn bounded_term(id: &str, amplitude: f64) -> f64 {
    let seed = seed_from_id(id);
    let phase = unit_interval(seed) * std::f64::consts::TAU;
    amplitude * phase.sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_id() {
        let a = bounded_term("STARLINK-12345", 6.0);
        let b = bounded_term("STARLINK-12345", 6.0);
        assert_eq!(a, b);
    }

    #[test]
    fn bounded_range() {
        for id in ["STARLINK-1", "ONEWEB-999", "STARLINK-42"] {
            let v = bounded_term(id, 6.0);
            assert!((-6.0..=6.0).contains(&v));
        }
    }

    #[test]
    fn differs_across_ids() {
        let a = bounded_term("STARLINK-1", 6.0);
        let b = bounded_term("STARLINK-2", 6.0);
        assert_ne!(a, b);
    }
}
