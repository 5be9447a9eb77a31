//! # Commands
//!
//! One command per input line:
//!
//! | Input          | Effect                                         |
//! |----------------|------------------------------------------------|
//! | `w` `a` `s` `d`| Move one tile north / west / south / east      |
//! | `tp <x> <y>`   | Teleport to a world position                   |
//! | `gen <radius>` | Pregenerate chunks around the player's chunk   |
//! | `q`            | Save and quit                                  |

use std::str::FromStr;

use thiserror::Error;

/// Why a line is not a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// Anything else that does not parse.
    #[error("unknown or invalid command: {0}")]
    Invalid(String),
}

/// A compass direction on the tile grid. North is `-y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// `-y`
    North,
    /// `+y`
    South,
    /// `-x`
    West,
    /// `+x`
    East,
}

impl Direction {
    /// Tile offset of one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::East => (1, 0),
        }
    }
}

/// A parsed input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step one tile.
    Move(Direction),
    /// Jump to a world position.
    Teleport {
        /// Target world X.
        x: i32,
        /// Target world Y.
        y: i32,
    },
    /// Pregenerate every chunk within `radius` chunks of the player.
    Generate {
        /// Always positive.
        radius: i32,
    },
    /// Save and exit.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let invalid = || CommandError::Invalid(line.trim().to_string());

        let Some(first) = parts.first() else {
            return Err(CommandError::Empty);
        };

        match (first.to_ascii_lowercase().as_str(), &parts[1..]) {
            ("w", []) => Ok(Self::Move(Direction::North)),
            ("s", []) => Ok(Self::Move(Direction::South)),
            ("a", []) => Ok(Self::Move(Direction::West)),
            ("d", []) => Ok(Self::Move(Direction::East)),
            ("q" | "quit", []) => Ok(Self::Quit),
            ("tp", [x, y]) => Ok(Self::Teleport {
                x: x.parse().map_err(|_| invalid())?,
                y: y.parse().map_err(|_| invalid())?,
            }),
            ("gen", [radius]) => match radius.parse::<i32>() {
                Ok(radius) if radius > 0 => Ok(Self::Generate { radius }),
                _ => Err(invalid()),
            },
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement() {
        assert_eq!("w".parse(), Ok(Command::Move(Direction::North)));
        assert_eq!(" D ".parse(), Ok(Command::Move(Direction::East)));
        assert_eq!("a".parse(), Ok(Command::Move(Direction::West)));
        assert_eq!("s".parse(), Ok(Command::Move(Direction::South)));
        assert_eq!(Direction::North.delta(), (0, -1));
    }

    #[test]
    fn test_teleport() {
        assert_eq!("tp 100 -250".parse(), Ok(Command::Teleport { x: 100, y: -250 }));
        assert_eq!("TP  -1   -1".parse(), Ok(Command::Teleport { x: -1, y: -1 }));
        assert!("tp 1".parse::<Command>().is_err());
        assert!("tp 1 2 3".parse::<Command>().is_err());
        assert!("tp 99999999999 0".parse::<Command>().is_err());
    }

    #[test]
    fn test_generate() {
        assert_eq!("gen 3".parse(), Ok(Command::Generate { radius: 3 }));
        assert_eq!(
            "gen 0".parse::<Command>(),
            Err(CommandError::Invalid("gen 0".to_string()))
        );
        assert!("gen -2".parse::<Command>().is_err());
        assert!("gen lots".parse::<Command>().is_err());
    }

    #[test]
    fn test_quit_empty_and_unknown() {
        assert_eq!("q".parse(), Ok(Command::Quit));
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Invalid("dance".to_string()))
        );
        assert!("w w".parse::<Command>().is_err());
    }
}
