use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use milp_api_sdk::Solution;
use parking_lot::Mutex;
use thiserror::Error;

/// Name of the slot holding the last solution
pub const SOLUTION_KEY: &str = "solution";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent string key/value storage
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Backend name for logging/debugging
    fn name(&self) -> &str;
}

/// Process-local store, lost on restart.
///
/// Holds at most `capacity` keys; the least recently used key is dropped first.
pub struct MemoryStore {
    entries: Mutex<LruCache<String, String>>,
}

impl MemoryStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().put(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// One JSON file per key inside a directory; survives restarts
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // rename is atomic: readers see the old file or the new one
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Hands the last solution from the submission flow to the dashboard.
///
/// Each browser session has its own slot; writing overwrites, nothing clears.
#[derive(Clone)]
pub struct ResultHandoff {
    store: Arc<dyn KeyValueStore>,
}

impl ResultHandoff {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &str {
        self.store.name()
    }

    fn key(scope: &str) -> String {
        format!("{}:{}", scope, SOLUTION_KEY)
    }

    pub fn write(&self, scope: &str, solution: &Solution) -> Result<(), StoreError> {
        let value = serde_json::to_string(solution)?;
        self.store.write(&Self::key(scope), &value)
    }

    pub fn read(&self, scope: &str) -> Result<Option<Solution>, StoreError> {
        match self.store.read(&Self::key(scope))? {
            Some(value) if value.trim() != "null" => Ok(Some(serde_json::from_str(&value)?)),
            _ => Ok(None),
        }
    }
}
