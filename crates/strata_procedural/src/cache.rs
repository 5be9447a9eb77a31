//! # Chunk Cache
//!
//! In-memory map from chunk coordinate to materialized chunk.
//!
//! `WorldStore` is generic over [`ChunkCache`] so a bounded variant can be
//! dropped in later; the only implementation today never evicts.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::chunk::{Chunk, ChunkCoord};

/// Storage for materialized chunks.
pub trait ChunkCache {
    /// Gets the cached chunk at `coord`.
    fn get(&self, coord: ChunkCoord) -> Option<&Chunk>;

    /// Returns true if `coord` is cached.
    fn contains(&self, coord: ChunkCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Returns the cached chunk, or builds, inserts and returns it.
    ///
    /// Nothing is inserted if `build` fails.
    ///
    /// # Errors
    ///
    /// Propagates the error from `build`.
    fn get_or_try_insert_with<E, F>(&mut self, coord: ChunkCoord, build: F) -> Result<&Chunk, E>
    where
        F: FnOnce() -> Result<Chunk, E>;

    /// Number of cached chunks.
    fn len(&self) -> usize;

    /// Returns true if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Growth-only cache: chunks stay resident for the process lifetime.
#[derive(Clone, Debug, Default)]
pub struct UnboundedCache {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl UnboundedCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates the cached coordinates in arbitrary order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }
}

impl ChunkCache for UnboundedCache {
    fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    fn get_or_try_insert_with<E, F>(&mut self, coord: ChunkCoord, build: F) -> Result<&Chunk, E>
    where
        F: FnOnce() -> Result<Chunk, E>,
    {
        match self.chunks.entry(coord) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(build()?)),
        }
    }

    fn len(&self) -> usize {
        self.chunks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{PerlinNoise, WorldSeed};

    #[test]
    fn test_builds_once() {
        let noise = PerlinNoise::new(WorldSeed::new(1));
        let mut cache = UnboundedCache::new();
        let coord = ChunkCoord::new(4, -4);
        let mut builds = 0;

        for _ in 0..3 {
            let chunk = cache
                .get_or_try_insert_with(coord, || {
                    builds += 1;
                    Ok::<_, ()>(Chunk::generate(coord, &noise))
                })
                .unwrap();
            assert_eq!(chunk.coord(), coord);
        }

        assert_eq!(builds, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(coord));
        assert_eq!(cache.coords().collect::<Vec<_>>(), vec![coord]);
    }

    #[test]
    fn test_failed_build_inserts_nothing() {
        let mut cache = UnboundedCache::new();
        let coord = ChunkCoord::new(0, 1);

        let result = cache.get_or_try_insert_with(coord, || Err("boom"));

        assert_eq!(result.err(), Some("boom"));
        assert!(cache.is_empty());
        assert!(cache.get(coord).is_none());
    }
}
