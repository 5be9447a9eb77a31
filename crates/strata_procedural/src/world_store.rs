//! # World Store
//!
//! Maps world coordinates to chunks and owns every chunk that has been
//! materialized this session.
//!
//! ## Lookup Order
//!
//! 1. In-memory cache
//! 2. Durable storage (decode the persisted 256 bytes)
//! 3. Synthesis from noise, persisted *before* it is cached
//!
//! Once a chunk is on disk it is never synthesized again, and a cached chunk
//! always has its bytes on disk. A failed write leaves the cache untouched.
//!
//! The store is single-threaded: it is owned by one caller and passed by
//! `&mut` to whatever needs chunks.

use crate::cache::{ChunkCache, UnboundedCache};
use crate::chunk::{decompose, Chunk, ChunkCoord, Tile};
use crate::error::{WorldError, WorldResult};
use crate::noise::{PerlinNoise, WorldSeed};
use crate::storage::{chunk_key, ChunkStorage};

/// Where a materialized chunk came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChunkSource {
    /// Already resident.
    Cache,
    /// Decoded from durable storage.
    Storage,
    /// Synthesized from noise and persisted.
    Generated,
}

/// Counters for chunk lookups this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Lookups answered from the cache.
    pub cache_hits: u64,
    /// Chunks decoded from storage.
    pub loaded: u64,
    /// Chunks synthesized and persisted (including pregeneration).
    pub generated: u64,
}

/// Lazily materialized, persistent chunk world.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{ChunkCoord, MemoryStorage, WorldSeed, WorldStore};
///
/// let mut world = WorldStore::new(MemoryStorage::new(), WorldSeed::new(12345));
/// let tile = world.tile_at(-1, -1)?;
/// assert!(tile.is_terrain());
/// assert!(world.cached_chunk(ChunkCoord::new(-1, -1)).is_some());
/// # Ok::<(), strata_procedural::WorldError>(())
/// ```
pub struct WorldStore<S, C = UnboundedCache> {
    storage: S,
    noise: PerlinNoise,
    cache: C,
    stats: WorldStats,
}

impl<S: ChunkStorage> WorldStore<S> {
    /// Creates a store over `storage` for the world with `seed`.
    #[must_use]
    pub fn new(storage: S, seed: WorldSeed) -> Self {
        Self::with_cache(storage, seed, UnboundedCache::new())
    }
}

impl<S: ChunkStorage, C: ChunkCache> WorldStore<S, C> {
    /// Creates a store with a caller-supplied cache.
    #[must_use]
    pub fn with_cache(storage: S, seed: WorldSeed, cache: C) -> Self {
        tracing::debug!("Opening world store with seed {}", seed);
        Self {
            storage,
            noise: PerlinNoise::new(seed),
            cache,
            stats: WorldStats::default(),
        }
    }

    /// The world seed.
    #[inline]
    #[must_use]
    pub fn seed(&self) -> WorldSeed {
        self.noise.seed()
    }

    /// The noise field every chunk of this world is synthesized from.
    #[inline]
    #[must_use]
    pub fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    /// Read access to the durable storage.
    #[inline]
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store, returning its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Storage key of the chunk at `coord`.
    ///
    /// Same value as [`chunk_key`]; callers without a store use that.
    #[inline]
    #[must_use]
    pub fn chunk_path_for(&self, coord: ChunkCoord) -> String {
        chunk_key(coord)
    }

    /// Returns the chunk at `coord`, loading or generating it as needed.
    ///
    /// Idempotent: repeated calls return the same chunk and write storage
    /// at most once per coordinate.
    ///
    /// # Errors
    ///
    /// - [`WorldError::CorruptChunkData`] if the persisted bytes are malformed
    /// - [`WorldError::StorageReadFailed`] if storage fails for any reason
    ///   other than the chunk being absent
    /// - [`WorldError::StorageWriteFailed`] if a generated chunk cannot be
    ///   persisted; it is not cached in that case
    pub fn ensure_chunk(&mut self, coord: ChunkCoord) -> WorldResult<&Chunk> {
        let Self {
            storage,
            noise,
            cache,
            stats,
        } = self;

        let mut source = ChunkSource::Cache;
        let chunk = cache.get_or_try_insert_with(coord, || {
            let (chunk, origin) = materialize(storage, noise, coord)?;
            source = origin;
            Ok::<_, WorldError>(chunk)
        })?;

        match source {
            ChunkSource::Cache => stats.cache_hits += 1,
            ChunkSource::Storage => stats.loaded += 1,
            ChunkSource::Generated => stats.generated += 1,
        }

        Ok(chunk)
    }

    /// Returns the tile at a world position.
    ///
    /// # Errors
    ///
    /// Same as [`WorldStore::ensure_chunk`] for the owning chunk.
    pub fn tile_at(&mut self, world_x: i32, world_y: i32) -> WorldResult<Tile> {
        let (coord, local) = decompose(world_x, world_y);
        Ok(self.ensure_chunk(coord)?.tile(local))
    }

    /// Gets a chunk only if it is already cached.
    #[must_use]
    pub fn cached_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.cache.get(coord)
    }

    /// Number of chunks resident in memory.
    #[must_use]
    pub fn cached_chunk_count(&self) -> usize {
        self.cache.len()
    }

    /// Lookup counters for this session.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.stats
    }

    /// Synthesizes and persists `coord` if storage does not hold it yet.
    ///
    /// Skips the cache entirely. Returns true if a chunk was written.
    pub(crate) fn persist_if_absent(&mut self, coord: ChunkCoord) -> WorldResult<bool> {
        let key = chunk_key(coord);
        let stored = self
            .storage
            .exists(&key)
            .map_err(|source| WorldError::StorageReadFailed {
                key: key.clone(),
                source,
            })?;
        if stored {
            return Ok(false);
        }

        let chunk = Chunk::generate(coord, &self.noise);
        persist(&mut self.storage, key, &chunk)?;
        self.stats.generated += 1;
        Ok(true)
    }
}

impl<S, C> std::fmt::Debug for WorldStore<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorldStore")
            .field("seed", &self.noise.seed())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Loads `coord` from storage, or synthesizes and persists it.
fn materialize<S: ChunkStorage>(
    storage: &mut S,
    noise: &PerlinNoise,
    coord: ChunkCoord,
) -> WorldResult<(Chunk, ChunkSource)> {
    let key = chunk_key(coord);

    match storage.read_all(&key) {
        Ok(bytes) => match Chunk::decode(coord, &bytes) {
            Ok(chunk) => {
                tracing::debug!("Loaded chunk {} from storage", coord);
                Ok((chunk, ChunkSource::Storage))
            }
            Err(err) => {
                tracing::warn!("Chunk {} holds {} bytes, refusing to load it", key, bytes.len());
                Err(err)
            }
        },
        Err(err) if err.is_not_found() => {
            let chunk = Chunk::generate(coord, noise);
            persist(storage, key, &chunk)?;
            Ok((chunk, ChunkSource::Generated))
        }
        Err(source) => Err(WorldError::StorageReadFailed { key, source }),
    }
}

fn persist<S: ChunkStorage>(storage: &mut S, key: String, chunk: &Chunk) -> WorldResult<()> {
    storage
        .write_all(&key, &chunk.encode())
        .map_err(|source| WorldError::StorageWriteFailed { key, source })?;
    tracing::debug!("Generated and persisted chunk {}", chunk.coord());
    Ok(())
}
