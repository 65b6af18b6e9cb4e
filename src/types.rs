//! Core types produced by the parser and persisted by the cache.

use std::{
    collections::{BTreeMap, btree_map},
    fmt::Display,
    path::PathBuf,
    time::SystemTime,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, parser, traits::Parser};

impl Parser for Catalog {
    fn from_str(s: &str) -> Result<Self, Error> {
        parser::parse(s)
    }
}

/// The translated value of a single catalog entry.
///
/// Serialized untagged: `null`, a string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Translation {
    /// The entry had no `msgstr`; callers should fall back to the key.
    Untranslated,

    /// A single translation without plural forms.
    Singular(String),

    /// Plural forms indexed by plural form number (0 = singular).
    Plural(Vec<String>),
}

impl Translation {
    pub fn is_translated(&self) -> bool {
        !matches!(self, Translation::Untranslated)
    }

    /// Returns the form for `index`, treating a singular value as form 0.
    pub fn form(&self, index: usize) -> Option<&str> {
        match self {
            Translation::Untranslated => None,
            Translation::Singular(value) => (index == 0).then_some(value.as_str()),
            Translation::Plural(forms) => forms.get(index).map(String::as_str),
        }
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Translation::Untranslated => Ok(()),
            Translation::Singular(value) => write!(f, "{}", value),
            Translation::Plural(forms) => write!(f, "[{}]", forms.join(", ")),
        }
    }
}

/// A parsed message catalog for one language/domain pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, Translation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Translation> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Translation> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Looks up `key`, returning the key itself when there is no usable translation.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.translate_plural(key, 0)
    }

    /// Looks up plural form `index` of `key`, returning the key itself when
    /// the entry or the form is missing or empty.
    pub fn translate_plural<'a>(&'a self, key: &'a str, index: usize) -> &'a str {
        match self.get(key).and_then(|t| t.form(index)) {
            Some(value) if !value.is_empty() => value,
            _ => key,
        }
    }

    pub(crate) fn translated(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(Translation::is_translated)
    }

    pub(crate) fn insert(&mut self, key: String, value: Translation) {
        self.entries.insert(key, value);
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = (&'a String, &'a Translation);
    type IntoIter = btree_map::Iter<'a, String, Translation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Translation)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Translation)>>(iter: I) -> Self {
        Catalog {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A persisted parse result tied to one source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheRecord {
    /// Canonical path of the source catalog.
    pub source: PathBuf,

    /// Latest source timestamp (modification or status change) observed before parsing.
    pub fresh_as_of: SystemTime,

    pub catalog: Catalog,
}

impl CacheRecord {
    /// A record is usable only if nothing touched the source after it was parsed.
    pub fn is_fresh(&self, source_changed_at: SystemTime) -> bool {
        self.fresh_as_of >= source_changed_at
    }
}
