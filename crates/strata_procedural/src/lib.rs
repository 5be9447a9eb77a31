//! # STRATA Procedural Generation
//!
//! Deterministic, persistent 2D chunk worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same world
//! 2. **Chunked**: World is generated in fixed 16x16 chunks
//! 3. **Lazy**: A chunk is synthesized the first time anything asks for it
//! 4. **Persistent**: Once written, a chunk is loaded, never regenerated
//!
//! ## Core Components
//!
//! - `PerlinNoise`: seeded 3D gradient noise
//! - `Chunk`: 16x16 tile grid with a raw 256-byte disk format
//! - `WorldStore`: cache -> storage -> synthesis lookup
//! - `ChunkStorage`: the durable keyed byte store underneath
//!
//! ## Example
//!
//! ```rust,no_run
//! use strata_procedural::{ChunkCoord, DirectoryStorage, WorldSeed, WorldStore};
//!
//! let storage = DirectoryStorage::open("world")?;
//! let mut world = WorldStore::new(storage, WorldSeed::new(12345));
//!
//! // Generates and writes world/chunk_0_0.dat on first access
//! let tile = world.tile_at(0, 0)?;
//! println!("Tile at origin: {tile}");
//!
//! world.pregenerate(ChunkCoord::new(0, 0), 4, 50, |p| {
//!     println!("{} checked, {} generated", p.checked, p.generated);
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod chunk;
pub mod error;
pub mod noise;
pub mod pregen;
pub mod storage;
pub mod world_store;

pub use cache::{ChunkCache, UnboundedCache};
pub use chunk::{
    decompose, floor_div, true_mod, Chunk, ChunkCoord, LocalCoord, Tile, CHUNK_SIZE,
    TILES_PER_CHUNK,
};
pub use error::{StorageError, WorldError, WorldResult};
pub use noise::{permutation, PerlinNoise, WorldSeed};
pub use pregen::{PregenProgress, PregenReport, DEFAULT_PROGRESS_INTERVAL};
pub use storage::{chunk_key, ChunkStorage, DirectoryStorage, MemoryStorage};
pub use world_store::{WorldStats, WorldStore};
