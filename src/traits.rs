//! Traits at the seams of pocatalog: reading catalogs, and persisting parse results.

use std::{
    io::{BufRead, Cursor, Read},
    path::Path,
};

use crate::{error::Error, read_options::ReadOptions};

/// A trait for parsing a catalog from text, readers, or files.
///
/// # Example
///
/// ```rust,no_run
/// use pocatalog::{Catalog, traits::Parser};
/// let catalog = Catalog::read_from("locale/fr/LC_MESSAGES/messages.po")?;
/// println!("{}", catalog.translate("Home"));
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from any reader.
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_str(&content)
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Parse from file path, decoding with the given options.
    fn read_with<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_str(&options.read_to_string(path)?)
    }

    /// Parse from file path as UTF-8 (BOM-aware).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::read_with(path, &ReadOptions::default())
    }
}

/// A key-value store holding serialized cache records.
///
/// Identifiers are opaque, filesystem-safe strings. Implementations need no
/// locking: concurrent writers may overwrite each other, and a reader that
/// gets a torn value simply fails to deserialize it.
pub trait CacheStore {
    /// Returns the stored bytes for `id`, or `None` if there are none.
    fn load(&self, id: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Stores `bytes` under `id`, replacing any previous value.
    fn save(&self, id: &str, bytes: &[u8]) -> Result<(), Error>;

    /// Removes the value stored under `id`. Removing a missing id is not an error.
    fn remove(&self, id: &str) -> Result<(), Error>;
}
