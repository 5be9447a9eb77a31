//! # World Configuration
//!
//! Loaded once at startup from an optional TOML file. Every field has a
//! default, so an absent file and an empty file behave the same.
//!
//! ```toml
//! world_dir = "world"
//! viewport_width = 40
//! viewport_height = 20
//! progress_interval = 50
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use strata_procedural::DEFAULT_PROGRESS_INTERVAL;

use crate::error::{AppError, AppResult};
use crate::level::Level;
use crate::viewport::Viewport;

/// Explorer settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Folder holding chunk files and the level file.
    pub world_dir: PathBuf,
    /// Viewport width in tiles.
    pub viewport_width: u16,
    /// Viewport height in tiles.
    pub viewport_height: u16,
    /// Chunks checked between pregeneration progress lines.
    pub progress_interval: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_dir: PathBuf::from("world"),
            viewport_width: 40,
            viewport_height: 20,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl WorldConfig {
    /// Config file looked up in the working directory.
    pub const FILE_NAME: &'static str = "strata.toml";

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys or a zero-sized viewport.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`, falling back to defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> AppResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Path of the level file inside the world folder.
    #[must_use]
    pub fn level_path(&self) -> PathBuf {
        self.world_dir.join(Level::FILE_NAME)
    }

    /// The configured viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    fn validate(&self) -> AppResult<()> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(AppError::InvalidConfig(format!(
                "viewport must be at least 1x1, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }
}
