//! Player position in absolute world coordinates.

use strata_procedural::ChunkCoord;

/// The explorer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Player {
    /// World X.
    pub x: i32,
    /// World Y.
    pub y: i32,
}

impl Player {
    /// Creates a player at a world position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves by a tile offset, stopping at the edge of the `i32` world.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Jumps to a world position.
    pub fn teleport(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// The chunk the player stands in.
    #[must_use]
    pub const fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from_world_pos(self.x, self.y)
    }
}
