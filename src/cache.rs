//! This module provides the `ParseCache` struct, which wraps the catalog parser
//! with a persisted record per source file so unchanged catalogs are not
//! re-parsed on every lookup.
//!
//! A record is keyed by a hash of the source's canonical path and remembers the
//! latest modification/status-change time observed before the source was read.
//! It is served only while the source has not been touched since. Unreadable or
//! corrupt records are treated as misses and rebuilt from the source.

use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    time::SystemTime,
};

use sha2::{Digest, Sha256};

use crate::{
    error::Error,
    parser,
    read_options::ReadOptions,
    store::FileStore,
    traits::CacheStore,
    types::{CacheRecord, Catalog},
};

/// Caches parsed catalogs in a [`CacheStore`], keyed by source file.
#[derive(Debug)]
pub struct ParseCache<S: CacheStore = FileStore> {
    store: S,
    options: ReadOptions,
}

impl Default for ParseCache<FileStore> {
    fn default() -> Self {
        ParseCache::with_store(FileStore::default())
    }
}

impl ParseCache<FileStore> {
    /// Creates a cache writing artifacts to the platform temporary directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache writing artifacts under `dir`.
    pub fn with_cache_dir<P: Into<PathBuf>>(dir: P) -> Self {
        ParseCache::with_store(FileStore::new(dir))
    }

    /// Changes the directory artifacts are read from and written to.
    pub fn set_cache_path<P: Into<PathBuf>>(&mut self, dir: P) {
        self.store.set_dir(dir);
    }

    pub fn cache_path(&self) -> &Path {
        self.store.dir()
    }
}

impl<S: CacheStore> ParseCache<S> {
    pub fn with_store(store: S) -> Self {
        ParseCache {
            store,
            options: ReadOptions::default(),
        }
    }

    /// Sets how source files are decoded.
    pub fn with_read_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the catalog parsed from `path`.
    ///
    /// Returns `Ok(None)` when the source file does not exist. A valid cached
    /// record is used unless `force_reparse` is set; otherwise the source is
    /// parsed and the record rewritten. Parse errors are returned and leave the
    /// cache untouched.
    pub fn get<P: AsRef<Path>>(
        &self,
        path: P,
        force_reparse: bool,
    ) -> Result<Option<Catalog>, Error> {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let source = fs::canonicalize(path)?;
        let id = record_id_for(&source);
        let changed_at = last_changed(&metadata)?;

        if !force_reparse {
            if let Some(catalog) = self.load_fresh(&id, &source, changed_at) {
                return Ok(Some(catalog));
            }
        }

        let text = self.options.read_to_string(&source)?;
        let catalog = parser::parse(&text)?;

        let record = CacheRecord {
            source,
            fresh_as_of: changed_at,
            catalog,
        };
        self.persist(&id, &record);

        Ok(Some(record.catalog))
    }

    /// Drops the cached record for `path`, if any.
    pub fn invalidate<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let id = record_id(path)?;
        self.store.remove(&id)
    }

    fn load_fresh(&self, id: &str, source: &Path, changed_at: SystemTime) -> Option<Catalog> {
        let bytes = match self.store.load(id) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(path = %source.display(), record_id = id, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "failed to load cache record");
                return None;
            }
        };

        let record: CacheRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "discarding corrupt cache record");
                return None;
            }
        };

        if record.source != source {
            tracing::warn!(
                record_id = id,
                expected = %source.display(),
                found = %record.source.display(),
                "cache record belongs to another source"
            );
            return None;
        }

        if !record.is_fresh(changed_at) {
            tracing::debug!(path = %source.display(), "cache record is stale");
            return None;
        }

        tracing::debug!(
            path = %source.display(),
            entries = record.catalog.len(),
            "cache hit"
        );
        Some(record.catalog)
    }

    fn persist(&self, id: &str, record: &CacheRecord) {
        let bytes = match serde_json::to_vec(record) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "failed to serialize cache record");
                return;
            }
        };

        match self.store.save(id, &bytes) {
            Ok(()) => tracing::debug!(
                path = %record.source.display(),
                record_id = id,
                entries = record.catalog.len(),
                "stored cache record"
            ),
            Err(e) => tracing::warn!(record_id = id, error = %e, "failed to store cache record"),
        }
    }
}

/// Returns the record identifier for the catalog at `path`.
///
/// The identifier is the hex SHA-256 of the canonical path, so every spelling
/// of the same file maps to the same record.
pub fn record_id<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let source = fs::canonicalize(path)?;
    Ok(record_id_for(&source))
}

fn record_id_for(canonical: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_os_str().as_encoded_bytes());
    hex::encode(hasher.finalize())
}

/// Conventional location of a catalog: `<domain_path>/<language>/LC_MESSAGES/<domain>.po`.
pub fn catalog_path<P: AsRef<Path>>(domain_path: P, language: &str, domain: &str) -> PathBuf {
    domain_path
        .as_ref()
        .join(language)
        .join("LC_MESSAGES")
        .join(format!("{domain}.po"))
}

/// Latest of the modification and status-change times.
fn last_changed(metadata: &fs::Metadata) -> io::Result<SystemTime> {
    let modified = metadata.modified()?;
    Ok(match status_changed(metadata) {
        Some(changed) => modified.max(changed),
        None => modified,
    })
}

#[cfg(unix)]
fn status_changed(metadata: &fs::Metadata) -> Option<SystemTime> {
    use std::{os::unix::fs::MetadataExt, time::Duration};

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).ok()?;
    SystemTime::UNIX_EPOCH.checked_add(Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn status_changed(_metadata: &fs::Metadata) -> Option<SystemTime> {
    None
}
