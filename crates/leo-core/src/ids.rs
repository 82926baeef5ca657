//! Arena index types. Satellites, samples, windows, and events are addressed
//! by integer index into flat typed arrays rather than through nested maps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index into the satellite arena for a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SatelliteId(pub u32);

impl fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sat#{}", self.0)
    }
}

/// Index into a satellite's `position_timeseries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SampleIndex(pub u32);

/// Bitset over the satellite arena, used for candidate sets and pool
/// selections instead of `HashSet<SatelliteId>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatelliteBitset {
    words: Vec<u64>,
}

impl SatelliteBitset {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            words: vec![0u64; n.div_ceil(64)],
        }
    }

    pub fn insert(&mut self, id: SatelliteId) {
        let (word, bit) = Self::locate(id);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u64 << bit;
    }

    pub fn remove(&mut self, id: SatelliteId) {
        let (word, bit) = Self::locate(id);
        if word < self.words.len() {
            self.words[word] &= !(1u64 << bit);
        }
    }

    pub fn contains(&self, id: SatelliteId) -> bool {
        let (word, bit) = Self::locate(id);
        self.words.get(word).is_some_and(|w| w & (1u64 << bit) != 0)
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SatelliteId> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            (0..64).filter_map(move |bit| {
                if w & (1u64 << bit) != 0 {
                    Some(SatelliteId((wi * 64 + bit) as u32))
                } else {
                    None
                }
            })
        })
    }

    fn locate(id: SatelliteId) -> (usize, u32) {
        ((id.0 / 64) as usize, id.0 % 64)
    }
}

impl FromIterator<SatelliteId> for SatelliteBitset {
    fn from_iter<T: IntoIterator<Item = SatelliteId>>(iter: T) -> Self {
        let mut set = SatelliteBitset::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitset_roundtrip() {
        let mut set = SatelliteBitset::with_capacity(200);
        set.insert(SatelliteId(3));
        set.insert(SatelliteId(130));
        assert!(set.contains(SatelliteId(3)));
        assert!(set.contains(SatelliteId(130)));
        assert!(!set.contains(SatelliteId(4)));
        assert_eq!(set.len(), 2);
        set.remove(SatelliteId(3));
        assert_eq!(set.len(), 1);
        let collected: Vec<_> = set.iter().collect();
        assert_eq!(collected, vec![SatelliteId(130)]);
    }
}
