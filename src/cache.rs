//! Remembering the opening guess between runs.
//!
//! Only the first guess of a game is ever cached: it depends on nothing but
//! the dictionary, so a digest of the dictionary is enough to key it. A cache
//! that cannot be read is treated as empty and a cache that cannot be written
//! is skipped with a warning; neither is an error.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    process,
};

use log::{debug, warn};

use crate::score::GuessResult;

/// Storage for guesses keyed by dictionary digest.
pub trait GuessCache {
    /// Returns the cached guess for `key`, if there is a usable one.
    fn get(&self, key: &str) -> Option<GuessResult>;

    /// Stores `result` under `key`, replacing any previous entry.
    fn set(&mut self, key: &str, result: &GuessResult);
}

/// A cache keeping one JSON file per key in a directory.
///
/// Concurrent writers race and the last one wins. A missing, partially
/// written or unparsable file reads as a miss.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a cache in `dir`. The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file an entry for `key` lives in.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn write(&self, key: &str, result: &GuessResult) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let staging = self.dir.join(format!("{}.json.{}.tmp", key, process::id()));
        fs::write(&staging, serde_json::to_vec(result)?)?;
        fs::rename(&staging, self.path(key))
    }
}

impl GuessCache for FileCache {
    fn get(&self, key: &str) -> Option<GuessResult> {
        let path = self.path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("no cached guess at {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("ignoring unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, result: &GuessResult) {
        if let Err(e) = self.write(key, result) {
            warn!(
                "could not write cache entry {}: {}",
                self.path(key).display(),
                e
            );
        }
    }
}

/// A cache that lives only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, GuessResult>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GuessCache for MemoryCache {
    fn get(&self, key: &str) -> Option<GuessResult> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, result: &GuessResult) {
        self.entries.insert(key.to_string(), result.clone());
    }
}
