/// Durable storage for client state
///
/// Each store persists one JSON document under its own namespace. The
/// backend is injected so stores are testable without touching the
/// filesystem, and so alternative embeddings can supply their own storage.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Namespaced key-value storage for persisted client state
pub trait StorageBackend: Send + Sync {
    /// Loads the payload stored under a namespace, if any
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError>;

    /// Stores a payload under a namespace, replacing any previous value
    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError>;

    /// Removes a namespace
    fn remove(&self, namespace: &str) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON file per namespace
///
/// The directory is created lazily on the first write.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a file-backed store rooted at the given directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{}.json", namespace))
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(namespace)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(namespace), payload)?;
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(namespace)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory storage for tests and ephemeral embeddings
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, namespace: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(namespace).cloned())
    }

    fn save(&self, namespace: &str, payload: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(namespace.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(namespace);
        Ok(())
    }
}
