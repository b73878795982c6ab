//! Construction-time configuration for [`ChainedHashMap`].

use crate::chained_hash_map::ChainedHashMap;
use crate::error::MapError;
use crate::key_hash::HashStrategy;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MapConfig {
    pub capacity: usize,
    pub hash_strategy: HashStrategy,
}

impl MapConfig {
    pub const DEFAULT_CAPACITY: usize = 8;

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_hash_strategy(mut self, hash_strategy: HashStrategy) -> Self {
        self.hash_strategy = hash_strategy;
        self
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            hash_strategy: HashStrategy::Default,
        }
    }
}

impl<V> ChainedHashMap<V, HashStrategy> {
    pub fn from_config(config: &MapConfig) -> Result<Self, MapError> {
        Self::with_hasher(config.capacity, config.hash_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_hash::{Djb2, KeyHasher};

    #[test]
    fn defaults() {
        let cfg = MapConfig::default();
        assert_eq!(cfg.capacity, 8);
        assert_eq!(cfg.hash_strategy, HashStrategy::Default);
        let m: ChainedHashMap<i32> = ChainedHashMap::from_config(&cfg).unwrap();
        assert_eq!(m.capacity(), 8);
    }

    /// Invariant: the configured strategy drives bucket placement.
    #[test]
    fn djb2_strategy_from_config() {
        let cfg = MapConfig::default()
            .with_capacity(5)
            .with_hash_strategy("djb2".parse().unwrap());
        let m: ChainedHashMap<i32> = ChainedHashMap::from_config(&cfg).unwrap();
        assert_eq!(*m.hasher(), HashStrategy::Djb2);
        assert_eq!(m.bucket_index("line_1"), (Djb2.hash_key("line_1") % 5) as usize);
    }

    #[test]
    fn zero_capacity_config_rejected() {
        let cfg = MapConfig::default().with_capacity(0);
        assert_eq!(
            ChainedHashMap::<i32>::from_config(&cfg).err(),
            Some(MapError::InvalidCapacity)
        );
    }
}
