//! All error types for the pocatalog crate.
//!
//! These are returned from all fallible operations (parsing, decoding, cache I/O).
//! Cache record (de)serialization failures are logged, never returned.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed catalog at line {line}: {kind}")]
    Malformed { line: usize, kind: MalformedEntry },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),
}

/// The grammar violations that make a catalog unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedEntry {
    #[error("msgstr without a preceding msgid")]
    MsgstrWithoutMsgid,

    #[error("msgstr assigned twice to the same entry")]
    DuplicateMsgstr,

    #[error("singular msgstr on a plural entry")]
    SingularOnPluralEntry,

    #[error("msgstr[n] on a non-plural entry")]
    PluralOnSingularEntry,

    #[error("duplicate key `{0}`")]
    DuplicateKey(String),

    #[error("plural index {0} assigned twice")]
    DuplicatePluralIndex(usize),

    #[error("continuation line without a pending msgid")]
    OrphanContinuation,
}

impl Error {
    pub(crate) fn malformed(line: usize, kind: MalformedEntry) -> Self {
        Error::Malformed { line, kind }
    }

    /// Returns the grammar violation if this error came from the parser.
    pub fn malformed_kind(&self) -> Option<&MalformedEntry> {
        match self {
            Error::Malformed { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
