//! # Explorer Session
//!
//! Owns the world store and the player, executes commands, and drives the
//! line-based loop. Input and output are generic so the loop can be run
//! against buffers in tests.

use std::io::{BufRead, Write};

use strata_procedural::{ChunkStorage, WorldStore};

use crate::command::{Command, CommandError};
use crate::error::AppResult;
use crate::level::Level;
use crate::player::Player;
use crate::viewport::Viewport;

/// Whether the loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read another command.
    Continue,
    /// Stop and save.
    Quit,
}

/// One explorer session over one world.
#[derive(Debug)]
pub struct Session<S> {
    world: WorldStore<S>,
    player: Player,
    viewport: Viewport,
    progress_interval: u32,
}

impl<S: ChunkStorage> Session<S> {
    /// Starts a session.
    #[must_use]
    pub fn new(world: WorldStore<S>, player: Player, viewport: Viewport, progress_interval: u32) -> Self {
        Self {
            world,
            player,
            viewport,
            progress_interval,
        }
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The world store.
    #[must_use]
    pub fn world(&self) -> &WorldStore<S> {
        &self.world
    }

    /// Current state for the level file.
    #[must_use]
    pub fn level(&self) -> Level {
        Level {
            player_x: self.player.x,
            player_y: self.player.y,
            seed: self.world.seed(),
        }
    }

    /// Renders the current screen.
    ///
    /// # Errors
    ///
    /// Propagates chunk materialization failures.
    pub fn screen(&mut self) -> AppResult<String> {
        Ok(self.viewport.render(&mut self.world, &self.player)?)
    }

    /// Executes one command, writing any feedback to `out`.
    ///
    /// A failed pregeneration is reported to the user, not returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to `out` fails.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> AppResult<Flow> {
        match command {
            Command::Move(direction) => {
                let (dx, dy) = direction.delta();
                self.player.move_by(dx, dy);
            }
            Command::Teleport { x, y } => {
                self.player.teleport(x, y);
                writeln!(out, "Teleported to {x},{y}.")?;
            }
            Command::Generate { radius } => self.generate(radius, out)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn generate<W: Write>(&mut self, radius: i32, out: &mut W) -> AppResult<()> {
        let center = self.player.chunk();
        let mut write_result = Ok(());

        let outcome = self.world.pregenerate(center, radius, self.progress_interval, |progress| {
            if write_result.is_ok() {
                write_result = writeln!(
                    out,
                    "Progress: {} chunks checked, {} generated...",
                    progress.checked, progress.generated
                );
            }
        });
        write_result?;

        match outcome {
            Ok(report) => writeln!(
                out,
                "Done. {} new chunks generated in radius {radius}.",
                report.generated
            )?,
            Err(err) => {
                tracing::warn!("Pregeneration around {} failed: {}", center, err);
                writeln!(out, "Generation failed: {err}")?;
            }
        }
        Ok(())
    }
}

/// Runs the interactive loop until `q` or end of input.
///
/// Each round renders the screen, prompts, reads one line and executes it.
///
/// # Errors
///
/// Returns an error if rendering fails or terminal I/O fails.
pub fn run<S, R, W>(session: &mut Session<S>, input: R, out: &mut W) -> AppResult<()>
where
    S: ChunkStorage,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", session.screen()?)?;
        writeln!(out, "Move with w/a/s/d, 'tp <x> <y>', 'gen <radius>', q to quit.")?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };

        match line.parse::<Command>() {
            Ok(command) => {
                if session.execute(command, out)? == Flow::Quit {
                    return Ok(());
                }
            }
            // Blank lines just redraw
            Err(CommandError::Empty) => {}
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}
