//! # Viewport
//!
//! Text rendering of the tiles around the player. Rendering pulls tiles
//! through `WorldStore::tile_at`, so looking at a region materializes it.

use std::fmt::Write as _;

use strata_procedural::{ChunkCache, ChunkStorage, WorldResult, WorldStore};

use crate::player::Player;

/// Glyph drawn on the player's tile.
pub const PLAYER_GLYPH: char = '@';

/// Glyph for positions outside the `i32` world.
pub const VOID_GLYPH: char = ' ';

/// A rectangular window centered on the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Width in tiles.
    pub width: u16,
    /// Height in tiles.
    pub height: u16,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Renders the status header and the visible tiles.
    ///
    /// The top-left tile is `(x - width / 2, y - height / 2)`.
    ///
    /// # Errors
    ///
    /// Propagates chunk materialization failures.
    pub fn render<S, C>(&self, world: &mut WorldStore<S, C>, player: &Player) -> WorldResult<String>
    where
        S: ChunkStorage,
        C: ChunkCache,
    {
        let chunk = player.chunk();
        let mut screen = String::with_capacity((usize::from(self.width) + 1) * (usize::from(self.height) + 2) + 64);

        // Writing into a String cannot fail
        let _ = writeln!(
            screen,
            "Pos: X={} Y={} | Chunk: {},{}",
            player.x, player.y, chunk.x, chunk.y
        );
        screen.push_str(&"-".repeat(usize::from(self.width)));
        screen.push('\n');

        let left = i64::from(player.x) - i64::from(self.width / 2);
        let top = i64::from(player.y) - i64::from(self.height / 2);

        for row in 0..i64::from(self.height) {
            for column in 0..i64::from(self.width) {
                let glyph = match (i32::try_from(left + column), i32::try_from(top + row)) {
                    (Ok(wx), Ok(wy)) if wx == player.x && wy == player.y => PLAYER_GLYPH,
                    (Ok(wx), Ok(wy)) => world.tile_at(wx, wy)?.as_char(),
                    _ => VOID_GLYPH,
                };
                screen.push(glyph);
            }
            screen.push('\n');
        }

        Ok(screen)
    }
}
