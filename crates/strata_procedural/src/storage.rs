//! # Chunk Storage
//!
//! A durable keyed byte store. The world store only needs three operations
//! from it (existence, whole-value read, whole-value overwrite), so backends
//! stay trivial.
//!
//! ## Backends
//!
//! - `DirectoryStorage`: one `<key>.dat` file per chunk in a world folder
//! - `MemoryStorage`: in-process map that counts reads and writes
//!
//! Keys come from [`chunk_key`], which collaborators can call without a
//! world store to check whether a chunk was already persisted.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::chunk::ChunkCoord;
use crate::error::StorageError;

/// File extension used by [`DirectoryStorage`].
pub const CHUNK_FILE_EXTENSION: &str = "dat";

/// Storage key for the chunk at `coord`.
///
/// Depends on the coordinate only: `chunk_{cx}_{cy}`.
#[must_use]
pub fn chunk_key(coord: ChunkCoord) -> String {
    format!("chunk_{}_{}", coord.x, coord.y)
}

/// Durable keyed byte store.
pub trait ChunkStorage {
    /// Returns true if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Reads the whole value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if nothing is stored under `key`,
    /// or [`StorageError::Io`] for any other failure.
    fn read_all(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Replaces the value under `key` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Filesystem-backed storage: one file per key inside a world folder.
#[derive(Clone, Debug)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    /// Opens (creating if needed) a world folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The world folder.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path that holds the value for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{CHUNK_FILE_EXTENSION}"))
    }
}

impl ChunkStorage for DirectoryStorage {
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(key).try_exists()?)
    }

    fn read_all(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        std::fs::read(self.path_for(key)).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        // Create + truncate: a full overwrite, never an append
        std::fs::write(self.path_for(key), bytes)?;
        Ok(())
    }
}

/// In-memory storage.
///
/// Counts every read and write so callers can verify how often the
/// durable layer was touched.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`; counters start at zero.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, Vec<u8>>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    /// Consumes the store, returning its contents.
    #[must_use]
    pub fn into_entries(self) -> HashMap<String, Vec<u8>> {
        self.entries
    }

    /// Raw bytes stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Stores bytes under `key` without counting a write.
    ///
    /// Stands in for an out-of-process edit of the world.
    pub fn insert_raw(&mut self, key: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(key.into(), bytes);
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of successful `read_all` calls.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Number of `write_all` calls.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ChunkStorage for MemoryStorage {
    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.contains_key(key))
    }

    fn read_all(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let bytes = self
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        self.reads.set(self.reads.get() + 1);
        Ok(bytes)
    }

    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.writes += 1;
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_key_format() {
        assert_eq!(chunk_key(ChunkCoord::new(0, 0)), "chunk_0_0");
        assert_eq!(chunk_key(ChunkCoord::new(3, -2)), "chunk_3_-2");
        assert_eq!(chunk_key(ChunkCoord::new(-17, 40)), "chunk_-17_40");
    }

    #[test]
    fn test_directory_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = DirectoryStorage::open(dir.path().join("world")).unwrap();

        assert!(!storage.exists("chunk_1_2").unwrap());
        assert!(storage.read_all("chunk_1_2").unwrap_err().is_not_found());

        storage.write_all("chunk_1_2", b"first").unwrap();
        assert!(storage.exists("chunk_1_2").unwrap());
        assert_eq!(storage.read_all("chunk_1_2").unwrap(), b"first");
        assert!(storage.path_for("chunk_1_2").ends_with("chunk_1_2.dat"));
    }

    #[test]
    fn test_directory_storage_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = DirectoryStorage::open(dir.path()).unwrap();

        storage.write_all("chunk_0_0", &[b'#'; 300]).unwrap();
        storage.write_all("chunk_0_0", &[b'~'; 256]).unwrap();

        let bytes = storage.read_all("chunk_0_0").unwrap();
        assert_eq!(bytes.len(), 256, "Write must truncate, not append");
        assert!(bytes.iter().all(|b| *b == b'~'));
    }

    #[test]
    fn test_directory_read_failure_is_not_absence() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::open(dir.path()).unwrap();

        // A directory where the chunk file should be: exists, but unreadable
        std::fs::create_dir(storage.path_for("chunk_5_5")).unwrap();

        assert!(storage.exists("chunk_5_5").unwrap());
        let err = storage.read_all("chunk_5_5").unwrap_err();
        assert!(!err.is_not_found(), "Unexpected NotFound: {err}");
    }

    #[test]
    fn test_memory_storage_counts() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());

        storage.write_all("a", b"1").unwrap();
        storage.write_all("a", b"22").unwrap();
        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.len(), 1);

        assert_eq!(storage.read_all("a").unwrap(), b"22");
        assert!(storage.read_all("b").is_err());
        assert_eq!(storage.read_count(), 1, "Failed reads are not counted");

        storage.insert_raw("b", vec![0; 4]);
        assert_eq!(storage.write_count(), 2);
        assert_eq!(storage.get("b"), Some(&[0u8; 4][..]));

        let reopened = MemoryStorage::with_entries(storage.into_entries());
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.read_count(), 0);
    }
}
