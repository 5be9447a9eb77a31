//! # Level File
//!
//! `level.dat` holds the player position and the world seed as three
//! decimal lines:
//!
//! ```text
//! <player x>
//! <player y>
//! <seed>
//! ```
//!
//! A value that is missing, not a number, or outside the `i32` range makes
//! the whole file invalid. Nothing is clamped or defaulted.

use std::num::ParseIntError;
use std::path::Path;

use rand::Rng;
use strata_procedural::WorldSeed;
use thiserror::Error;

/// Errors reading or writing the level file.
#[derive(Error, Debug)]
pub enum LevelError {
    /// The file ends before a required line.
    #[error("level file is missing line {line} ({field})")]
    MissingLine {
        /// 1-based line number.
        line: usize,
        /// Which value belongs there.
        field: &'static str,
    },

    /// A line is not an `i32`.
    #[error("level file line {line} ({field}) is not a valid 32-bit integer: {value:?}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Which value belongs there.
        field: &'static str,
        /// The offending text.
        value: String,
        /// Parse failure (including overflow).
        #[source]
        source: ParseIntError,
    },

    /// Reading or writing the file failed.
    #[error("level file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

const FIELDS: [&str; 3] = ["player x", "player y", "seed"];

/// Saved session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Level {
    /// Player world X.
    pub player_x: i32,
    /// Player world Y.
    pub player_y: i32,
    /// World seed.
    pub seed: WorldSeed,
}

impl Level {
    /// File name inside the world folder.
    pub const FILE_NAME: &'static str = "level.dat";

    /// A fresh level: player at the origin.
    #[must_use]
    pub const fn new(seed: WorldSeed) -> Self {
        Self {
            player_x: 0,
            player_y: 0,
            seed,
        }
    }

    /// Parses the three-line text form.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is missing or not an `i32`.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut lines = text.lines();
        let mut values = [0i32; 3];

        for (index, (slot, field)) in values.iter_mut().zip(FIELDS).enumerate() {
            let line = index + 1;
            let raw = lines.next().ok_or(LevelError::MissingLine { line, field })?.trim();
            *slot = raw.parse().map_err(|source| LevelError::InvalidNumber {
                line,
                field,
                value: raw.to_string(),
                source,
            })?;
        }

        let [player_x, player_y, seed] = values;
        Ok(Self {
            player_x,
            player_y,
            seed: WorldSeed::new(seed),
        })
    }

    /// Renders the three-line text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        format!("{}\n{}\n{}\n", self.player_x, self.player_y, self.seed.value())
    }

    /// Loads the level at `path`; `None` if there is no file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Option<Self>, LevelError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the level to `path`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LevelError> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Loads the level at `path`, or creates and saves a new one.
    ///
    /// Returns the level and whether it was just created.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file is invalid or the new one
    /// cannot be written.
    pub fn load_or_create<F>(path: &Path, new_seed: F) -> Result<(Self, bool), LevelError>
    where
        F: FnOnce() -> WorldSeed,
    {
        if let Some(level) = Self::load(path)? {
            return Ok((level, false));
        }

        let level = Self::new(new_seed());
        level.save(path)?;
        tracing::info!("Created new world with seed {}", level.seed);
        Ok((level, true))
    }
}

/// Draws a non-negative seed for a brand-new world.
#[must_use]
pub fn random_seed() -> WorldSeed {
    WorldSeed::new(rand::thread_rng().gen_range(0..i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let level = Level::parse("-17\n42\n12345\n").unwrap();
        assert_eq!(
            level,
            Level {
                player_x: -17,
                player_y: 42,
                seed: WorldSeed::new(12345)
            }
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_crlf() {
        let level = Level::parse(" 5 \r\n-6\r\n7").unwrap();
        assert_eq!((level.player_x, level.player_y, level.seed.value()), (5, -6, 7));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = Level::parse("99999999999\n0\n1\n").unwrap_err();
        assert!(
            matches!(err, LevelError::InvalidNumber { line: 1, field: "player x", .. }),
            "{err}"
        );

        let err = Level::parse("0\n-99999999999\n1\n").unwrap_err();
        assert!(matches!(err, LevelError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_missing_and_garbage_lines() {
        assert!(matches!(
            Level::parse("1\n2\n").unwrap_err(),
            LevelError::MissingLine { line: 3, field: "seed" }
        ));
        assert!(matches!(
            Level::parse("1\nnorth\n3\n").unwrap_err(),
            LevelError::InvalidNumber { line: 2, .. }
        ));
    }

    #[test]
    fn test_extremes_round_trip_through_text() {
        let level = Level {
            player_x: i32::MIN,
            player_y: i32::MAX,
            seed: WorldSeed::new(-1),
        };
        assert_eq!(Level::parse(&level.to_text()).unwrap(), level);
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(Level::FILE_NAME);

        assert!(Level::load(&path).unwrap().is_none());

        let (created, fresh) = Level::load_or_create(&path, || WorldSeed::new(314)).unwrap();
        assert!(fresh);
        assert_eq!(created, Level::new(WorldSeed::new(314)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0\n0\n314\n");

        let (loaded, fresh) = Level::load_or_create(&path, || panic!("must not reseed")).unwrap();
        assert!(!fresh);
        assert_eq!(loaded, created);
    }

    #[test]
    fn test_random_seed_is_non_negative() {
        for _ in 0..100 {
            assert!(random_seed().value() >= 0);
        }
    }
}
