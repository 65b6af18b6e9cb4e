//! Options controlling how catalog source files are decoded.

use std::{fs::File, io::Read, path::Path};

use encoding_rs::Encoding;

use crate::error::Error;

/// Read behavior options for [`crate::ParseCache`] and [`crate::traits::Parser::read_from`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// WHATWG encoding label of the source files (e.g. `"windows-1252"`).
    /// `None` means UTF-8. A byte-order mark always wins.
    pub encoding: Option<String>,
}

impl ReadOptions {
    /// Creates default read options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    fn resolve_encoding(&self) -> Result<Option<&'static Encoding>, Error> {
        match &self.encoding {
            None => Ok(None),
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .map(Some)
                .ok_or_else(|| Error::UnknownEncoding(label.clone())),
        }
    }

    /// Reads `path` and decodes it to a UTF-8 string.
    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> Result<String, Error> {
        let encoding = self.resolve_encoding()?;
        let file = File::open(path)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(encoding)
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded)?;
        Ok(decoded)
    }
}
