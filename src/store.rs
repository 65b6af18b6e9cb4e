//! Backing stores for cache records.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{error::Error, traits::CacheStore};

const ARTIFACT_PREFIX: &str = "pocache-";
const ARTIFACT_EXTENSION: &str = "json";

/// Stores one artifact file per record under a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    dir: PathBuf,
}

impl Default for FileStore {
    /// Uses the platform temporary directory.
    fn default() -> Self {
        FileStore::new(std::env::temp_dir())
    }
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn set_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        self.dir = dir.into();
    }

    /// Path of the artifact for `id`.
    pub fn artifact_path(&self, id: &str) -> PathBuf {
        self.dir
            .join(format!("{ARTIFACT_PREFIX}{id}.{ARTIFACT_EXTENSION}"))
    }

    fn tmp_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!(
            ".{ARTIFACT_PREFIX}{id}.{}.tmp",
            std::process::id()
        ))
    }
}

impl CacheStore for FileStore {
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>, Error> {
        match fs::read(self.artifact_path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn save(&self, id: &str, bytes: &[u8]) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.tmp_path(id);
        fs::write(&tmp, bytes)?;
        if let Err(e) = fs::rename(&tmp, self.artifact_path(id)) {
            let _ = fs::remove_file(&tmp);
            return Err(Error::Io(e));
        }
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), Error> {
        match fs::remove_file(self.artifact_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Keeps records in memory; useful for tests and short-lived embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map of byte strings.
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.lock().get(id).cloned())
    }

    fn save(&self, id: &str, bytes: &[u8]) -> Result<(), Error> {
        self.lock().insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), Error> {
        self.lock().remove(id);
        Ok(())
    }
}
