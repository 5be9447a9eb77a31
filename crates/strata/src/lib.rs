//! # STRATA Explorer
//!
//! Terminal front end for a `strata_procedural` world.
//!
//! ## Flow
//!
//! 1. Load `strata.toml` (or defaults)
//! 2. Open the world folder and load `level.dat`, creating a new world with
//!    a random seed if there is none
//! 3. Render, read a command, repeat until `q` or end of input
//! 4. Save the player position back to `level.dat`

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod error;
pub mod level;
pub mod player;
pub mod session;
pub mod viewport;

pub use command::{Command, CommandError, Direction};
pub use config::WorldConfig;
pub use error::{AppError, AppResult};
pub use level::{random_seed, Level, LevelError};
pub use player::Player;
pub use session::{run, Flow, Session};
pub use viewport::{Viewport, PLAYER_GLYPH, VOID_GLYPH};
