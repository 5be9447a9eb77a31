//! STRATA explorer binary.
//!
//! Usage: `strata [config.toml]`

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use strata::{random_seed, run, AppResult, Level, Player, Session, WorldConfig};
use strata_procedural::{DirectoryStorage, WorldStore};

fn main() -> ExitCode {
    match explore() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("strata: {err}");
            ExitCode::FAILURE
        }
    }
}

fn explore() -> AppResult<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(WorldConfig::FILE_NAME), PathBuf::from);
    let config = WorldConfig::load(&config_path)?;

    let storage = DirectoryStorage::open(&config.world_dir)?;
    let level_path = config.level_path();
    let (level, created) = Level::load_or_create(&level_path, random_seed)?;

    if created {
        println!("New world created with seed {}.", level.seed);
    } else {
        println!("Loaded world with seed {}.", level.seed);
    }

    let world = WorldStore::new(storage, level.seed);
    let player = Player::new(level.player_x, level.player_y);
    let mut session = Session::new(world, player, config.viewport(), config.progress_interval);

    let outcome = run(&mut session, io::stdin().lock(), &mut io::stdout().lock());

    // Save the position even if the loop ended on an error
    session.level().save(&level_path)?;
    tracing::info!("Saved level to {}", level_path.display());
    outcome
}
