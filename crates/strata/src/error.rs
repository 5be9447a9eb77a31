//! # Application Error Types

use std::path::PathBuf;

use strata_procedural::{StorageError, WorldError};
use thiserror::Error;

use crate::level::LevelError;

/// Errors that end an explorer session.
#[derive(Error, Debug)]
pub enum AppError {
    /// The config file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Config file path.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `WorldConfig`.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The level file could not be loaded or saved.
    #[error(transparent)]
    Level(#[from] LevelError),

    /// The world store failed.
    #[error(transparent)]
    World(#[from] WorldError),

    /// The world folder could not be opened.
    #[error("failed to open world folder: {0}")]
    Storage(#[from] StorageError),

    /// Terminal input or output failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
