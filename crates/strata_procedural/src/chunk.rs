//! # Chunk System
//!
//! The world is an infinite grid of fixed-size chunks. Each chunk is a
//! 16x16 grid of single-byte tiles, synthesized once from noise and then
//! loaded from disk on every later visit.
//!
//! ## Chunk Format
//!
//! Exactly 256 raw bytes, one per tile, row-major with `y` as the outer
//! loop: byte index = `y * 16 + x`. No header, no length prefix, no
//! checksum. Each byte is the tile's character code.
//!
//! ## Coordinates
//!
//! World coordinates decompose into (chunk, local) with floored division
//! and a non-negative modulo, so `wx == cx * 16 + lx` with `0 <= lx < 16`
//! holds for negative `wx` too: world `-1` is chunk `-1`, local `15`.

use bytemuck::{Pod, Zeroable};

use crate::error::{WorldError, WorldResult};
use crate::noise::PerlinNoise;

/// Chunk width/height in tiles.
pub const CHUNK_SIZE: usize = 16;

/// Total tiles per chunk (and bytes per encoded chunk).
pub const TILES_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE;

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const CHUNK_SIZE_I32: i32 = CHUNK_SIZE as i32;

#[allow(clippy::cast_possible_wrap)]
const CHUNK_SIZE_I64: i64 = CHUNK_SIZE as i64;

/// Scale from world coordinates into noise space.
pub const NOISE_SCALE: f64 = 0.1;

/// Noise values below this are water.
pub const WATER_THRESHOLD: f64 = -0.2;

/// Noise values below this (and not water) are sand.
pub const SAND_THRESHOLD: f64 = 0.1;

/// Floored integer division for a positive divisor.
///
/// Truncating division rounds toward zero, which puts world `-1` in chunk
/// `0`; this rounds toward negative infinity instead.
#[inline]
#[must_use]
pub const fn floor_div(a: i32, b: i32) -> i32 {
    debug_assert!(b > 0);
    if a >= 0 {
        a / b
    } else {
        ((a + 1) / b) - 1
    }
}

/// Modulo whose result is always in `[0, b)` for a positive divisor.
#[inline]
#[must_use]
pub const fn true_mod(a: i32, b: i32) -> i32 {
    debug_assert!(b > 0);
    ((a % b) + b) % b
}

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not tiles).
    pub x: i32,
    /// Y coordinate (in chunks, not tiles).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the chunk that owns the given world tile.
    #[inline]
    #[must_use]
    pub const fn from_world_pos(world_x: i32, world_y: i32) -> Self {
        Self {
            x: floor_div(world_x, CHUNK_SIZE_I32),
            y: floor_div(world_y, CHUNK_SIZE_I32),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    ///
    /// Widened to `i64`: chunks near the `i32` edge cover tiles outside the
    /// `i32` range.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn world_x(self) -> i64 {
        self.x as i64 * CHUNK_SIZE_I64
    }

    /// Returns the world Y coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn world_y(self) -> i64 {
        self.y as i64 * CHUNK_SIZE_I64
    }

    /// Returns this coordinate shifted by a number of chunks, or `None` if
    /// that leaves the `i32` chunk grid.
    #[inline]
    #[must_use]
    pub const fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Position of a tile inside its chunk; both axes in `[0, 16)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalCoord {
    /// Local X (0-15).
    pub x: usize,
    /// Local Y (0-15).
    pub y: usize,
}

impl LocalCoord {
    /// Creates a local coordinate, or `None` if either axis is out of range.
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Option<Self> {
        if x < CHUNK_SIZE && y < CHUNK_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Returns the local position of a world tile within its chunk.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_world_pos(world_x: i32, world_y: i32) -> Self {
        Self {
            x: true_mod(world_x, CHUNK_SIZE_I32) as usize,
            y: true_mod(world_y, CHUNK_SIZE_I32) as usize,
        }
    }

    /// Row-major index into the tile buffer.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.y * CHUNK_SIZE + self.x
    }
}

/// Splits a world position into its owning chunk and local position.
#[inline]
#[must_use]
pub const fn decompose(world_x: i32, world_y: i32) -> (ChunkCoord, LocalCoord) {
    (
        ChunkCoord::from_world_pos(world_x, world_y),
        LocalCoord::from_world_pos(world_x, world_y),
    )
}

/// A single tile in the world.
///
/// Stored as its character code so a chunk's memory layout *is* its disk
/// format. Bytes read from disk are kept verbatim, including codes other
/// than the three generated ones.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Tile(u8);

impl Tile {
    /// Water.
    pub const WATER: Self = Self(b'~');
    /// Sand / path.
    pub const SAND: Self = Self(b',');
    /// Solid ground.
    pub const GROUND: Self = Self(b'#');

    /// Creates a tile from its raw code.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Returns the tile as a printable character.
    #[inline]
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// Classifies a noise sample.
    ///
    /// `n < -0.2` is water, `-0.2 <= n < 0.1` is sand, everything else is ground.
    #[inline]
    #[must_use]
    pub fn from_noise(n: f64) -> Self {
        if n < WATER_THRESHOLD {
            Self::WATER
        } else if n < SAND_THRESHOLD {
            Self::SAND
        } else {
            Self::GROUND
        }
    }

    /// Returns true for one of the three generated terrain codes.
    #[inline]
    #[must_use]
    pub const fn is_terrain(self) -> bool {
        matches!(self.0, b'~' | b',' | b'#')
    }
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({:?})", self.as_char())
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A chunk of world data.
///
/// Only built by [`Chunk::generate`] or [`Chunk::decode`]; there is no
/// mutation API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    /// Tile data, indexed as `y * 16 + x`.
    tiles: [Tile; TILES_PER_CHUNK],
}

impl Chunk {
    /// Synthesizes the chunk at `coord` from the noise field.
    ///
    /// Every tile is an independent function of its world position.
    #[must_use]
    pub fn generate(coord: ChunkCoord, noise: &PerlinNoise) -> Self {
        let origin_x = coord.world_x();
        let origin_y = coord.world_y();

        let tiles = std::array::from_fn(|index| {
            let (local_x, local_y) = (index % CHUNK_SIZE, index / CHUNK_SIZE);
            #[allow(clippy::cast_possible_wrap)]
            let (world_x, world_y) = (origin_x + local_x as i64, origin_y + local_y as i64);

            // |world| < 2^36, exact in f64
            #[allow(clippy::cast_precision_loss)]
            let n = noise.sample(
                world_x as f64 * NOISE_SCALE,
                world_y as f64 * NOISE_SCALE,
                0.0,
            );
            Tile::from_noise(n)
        });

        Self { coord, tiles }
    }

    /// Decodes a chunk from its on-disk bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CorruptChunkData`] unless `bytes` is exactly
    /// 256 bytes long.
    pub fn decode(coord: ChunkCoord, bytes: &[u8]) -> WorldResult<Self> {
        let raw: [u8; TILES_PER_CHUNK] =
            bytes.try_into().map_err(|_| WorldError::CorruptChunkData {
                coord,
                found: bytes.len(),
            })?;

        Ok(Self {
            coord,
            tiles: bytemuck::cast(raw),
        })
    }

    /// Encodes the chunk into its 256-byte on-disk form.
    #[inline]
    #[must_use]
    pub fn encode(&self) -> [u8; TILES_PER_CHUNK] {
        bytemuck::cast(self.tiles)
    }

    /// Chunk position in the world.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Gets a tile at a local coordinate.
    #[inline]
    #[must_use]
    pub const fn tile(&self, local: LocalCoord) -> Tile {
        self.tiles[local.index()]
    }

    /// Gets a tile at raw local indices, `None` outside `[0, 16)`.
    #[inline]
    #[must_use]
    pub const fn get_tile(&self, x: usize, y: usize) -> Option<Tile> {
        match LocalCoord::new(x, y) {
            Some(local) => Some(self.tile(local)),
            None => None,
        }
    }

    /// All tiles in row-major order.
    #[inline]
    #[must_use]
    pub const fn tiles(&self) -> &[Tile; TILES_PER_CHUNK] {
        &self.tiles
    }

    /// Iterates the chunk's rows, top (`y = 0`) first.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks_exact(CHUNK_SIZE)
    }
}
