#![forbid(unsafe_code)]
//! Gettext `.po` catalog parsing with a file-backed parse cache.
//!
//! Parses message catalogs into a [`Catalog`] mapping each `msgid` to its
//! translation (or plural forms), and caches parse results on disk so that
//! unchanged catalogs are not re-parsed on every lookup.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pocatalog::{ParseCache, catalog_path};
//!
//! let cache = ParseCache::with_cache_dir("/var/cache/myapp");
//! let path = catalog_path("locale", "fr_FR", "messages");
//!
//! match cache.get(&path, false)? {
//!     Some(catalog) => println!("{}", catalog.translate("Home")),
//!     None => println!("no catalog for fr_FR"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Parsing text directly:
//!
//! ```rust
//! use pocatalog::{Translation, parse};
//!
//! let catalog = parse("msgid \"file\"\nmsgid_plural \"files\"\nmsgstr[0] \"fichier\"\nmsgstr[1] \"fichiers\"")?;
//! assert_eq!(
//!     catalog.get("file"),
//!     Some(&Translation::Plural(vec!["fichier".into(), "fichiers".into()]))
//! );
//! # Ok::<(), pocatalog::Error>(())
//! ```

pub mod cache;
pub mod error;
pub mod parser;
pub mod read_options;
pub mod store;
pub mod traits;
pub mod types;
pub mod unescape;

// Re-export most used types for easy consumption
pub use crate::{
    cache::{ParseCache, catalog_path, record_id},
    error::{Error, MalformedEntry},
    parser::parse,
    read_options::ReadOptions,
    store::{FileStore, MemoryStore},
    traits::{CacheStore, Parser},
    types::{CacheRecord, Catalog, Translation},
};

