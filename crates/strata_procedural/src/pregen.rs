//! # Bulk Pregeneration
//!
//! Writes every missing chunk in a square around a center chunk, so that a
//! region can be explored (or inspected on disk) without generation stalls.
//!
//! Pregenerated chunks go straight to storage; they are not cached. Chunks
//! already on disk are left alone, so external edits survive.

use crate::cache::ChunkCache;
use crate::chunk::ChunkCoord;
use crate::error::{WorldError, WorldResult};
use crate::storage::ChunkStorage;
use crate::world_store::WorldStore;

/// Default number of checked chunks between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: u32 = 50;

/// Running totals reported while pregenerating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PregenProgress {
    /// Chunks examined so far.
    pub checked: u64,
    /// Chunks synthesized and written so far.
    pub generated: u64,
}

/// Final totals of a pregeneration run.
pub type PregenReport = PregenProgress;

impl<S: ChunkStorage, C: ChunkCache> WorldStore<S, C> {
    /// Persists every missing chunk within `radius` chunks of `center`.
    ///
    /// Visits rows from `center.y - radius` to `center.y + radius`, west to
    /// east within each row. Coordinates beyond the `i32` chunk grid are
    /// skipped and not counted as checked. `on_progress` fires after every
    /// `progress_interval` checked chunks (never, if the interval is zero).
    ///
    /// # Errors
    ///
    /// - [`WorldError::InvalidRadius`] if `radius <= 0`
    /// - Storage failures, as in [`WorldStore::ensure_chunk`]; chunks written
    ///   before the failure stay written
    pub fn pregenerate<F>(
        &mut self,
        center: ChunkCoord,
        radius: i32,
        progress_interval: u32,
        mut on_progress: F,
    ) -> WorldResult<PregenReport>
    where
        F: FnMut(PregenProgress),
    {
        if radius <= 0 {
            return Err(WorldError::InvalidRadius(radius));
        }

        let mut progress = PregenProgress::default();

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                // Off the i32 chunk grid: nothing to generate there
                let Some(coord) = center.checked_offset(dx, dy) else {
                    continue;
                };
                if self.persist_if_absent(coord)? {
                    progress.generated += 1;
                }
                progress.checked += 1;

                if progress_interval > 0 && progress.checked % u64::from(progress_interval) == 0 {
                    tracing::debug!(
                        "Pregeneration: {} chunks checked, {} generated",
                        progress.checked,
                        progress.generated
                    );
                    on_progress(progress);
                }
            }
        }

        tracing::info!(
            "Pregenerated {} new chunks in radius {} around {}",
            progress.generated,
            radius,
            center
        );
        Ok(progress)
    }
}
