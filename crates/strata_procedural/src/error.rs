//! # World Error Types
//!
//! All errors that can occur while materializing chunks.
//!
//! Nothing here is retried internally: the caller decides whether to retry,
//! abort, or surface the failure.

use thiserror::Error;

use crate::chunk::ChunkCoord;

/// Errors reported by a chunk storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No chunk is stored under the key.
    ///
    /// This is the only condition the world store treats as "generate it".
    #[error("no chunk stored under key {0}")]
    NotFound(String),

    /// The backend failed for any other reason.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Returns true if this is the well-defined "not present" signal.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors that can occur in the world store.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A persisted chunk does not hold exactly one byte per tile.
    #[error("corrupt chunk data at {coord}: expected 256 bytes, found {found}")]
    CorruptChunkData {
        /// The chunk whose bytes were rejected.
        coord: ChunkCoord,
        /// Number of bytes actually present.
        found: usize,
    },

    /// Reading a persisted chunk failed for a reason other than absence.
    #[error("failed to read chunk {key}: {source}")]
    StorageReadFailed {
        /// Storage key of the chunk.
        key: String,
        /// Backend failure.
        #[source]
        source: StorageError,
    },

    /// Persisting a freshly generated chunk failed.
    #[error("failed to write chunk {key}: {source}")]
    StorageWriteFailed {
        /// Storage key of the chunk.
        key: String,
        /// Backend failure.
        #[source]
        source: StorageError,
    },

    /// Pregeneration was asked for a non-positive radius.
    #[error("invalid pregeneration radius {0}: must be positive")]
    InvalidRadius(i32),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_chunk_message() {
        let err = WorldError::CorruptChunkData {
            coord: ChunkCoord::new(3, -2),
            found: 17,
        };
        assert_eq!(
            err.to_string(),
            "corrupt chunk data at (3, -2): expected 256 bytes, found 17"
        );
    }

    #[test]
    fn test_storage_error_source_is_kept() {
        let err = WorldError::StorageWriteFailed {
            key: "chunk_0_0".to_string(),
            source: StorageError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
        };
        assert_eq!(err.to_string(), "failed to write chunk chunk_0_0: disk full");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_not_found_signal() {
        assert!(StorageError::NotFound("chunk_1_1".into()).is_not_found());
        let io = StorageError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert!(!io.is_not_found());
    }
}
