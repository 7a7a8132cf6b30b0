//! Client-local key/value storage backing the token store

use crate::error::{ClientError, Result};
use papaya::HashMap;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// String key/value storage; last write wins
pub trait Storage: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

/// Process-local storage, lost when the process exits
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.pin().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.pin().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.pin().remove(key);
    }
}

/// Storage persisted as a flat JSON object, written through on every change
///
/// Survives a process restart the way browser local storage survives a reload.
pub struct FileStorage {
    path: PathBuf,
    cache: MemoryStorage,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing file starts empty. A file that is not a JSON object of
    /// strings is an error rather than being silently overwritten.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = MemoryStorage::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) if !contents.trim().is_empty() => {
                let entries: BTreeMap<String, String> = serde_json::from_str(&contents)?;
                for (key, value) in &entries {
                    cache.set(key, value);
                }
                debug!(path = %path.display(), entries = entries.len(), "Loaded client storage");
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ClientError::Configuration(format!(
                    "Cannot read storage file {}: {e}",
                    path.display()
                )))
            }
        }

        Ok(Self {
            path,
            cache,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let _guard = match self.write_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let snapshot: BTreeMap<String, String> = self
            .cache
            .entries
            .pin()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let result = serde_json::to_vec_pretty(&snapshot)
            .map_err(std::io::Error::other)
            .and_then(|bytes| write_atomically(&self.path, &bytes));

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist client storage");
        }
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// Readers see either the previous contents or the new ones, never a
/// truncated file.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.cache.set(key, value);
        self.persist();
    }

    fn remove(&self, key: &str) {
        self.cache.remove(key);
        self.persist();
    }
}
