//! Line-oriented parser for gettext `.po` catalogs.
//!
//! Only what is needed to resolve message text is kept: `msgid`,
//! `msgid_plural`, `msgstr`, `msgstr[N]` and continuation strings. Comments
//! and unrecognized lines are skipped, so extensions of the format (contexts,
//! obsolete entries, flags) never make a catalog unreadable.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::{Error, MalformedEntry},
    types::{Catalog, Translation},
    unescape::unescape,
};

lazy_static! {
    static ref COMMENT_REGEX: Regex = Regex::new(r#"^\s*#"#).unwrap();
    static ref MSGID_REGEX: Regex = Regex::new(r#"^\s*msgid\s*"(.*)""#).unwrap();
    static ref MSGID_PLURAL_REGEX: Regex = Regex::new(r#"^\s*msgid_plural\s*"(.*)""#).unwrap();
    static ref MSGSTR_REGEX: Regex = Regex::new(r#"^\s*msgstr\s*"(.*)""#).unwrap();
    static ref MSGSTR_PLURAL_REGEX: Regex =
        Regex::new(r#"^\s*msgstr\[([0-9]+)\]\s*"(.*)""#).unwrap();
    static ref CONTINUATION_REGEX: Regex = Regex::new(r#"^\s*"(.*)""#).unwrap();
}

/// Plural form indices at or above this are not plural forms of any language.
const MAX_PLURAL_FORMS: usize = 256;

/// One recognized line of catalog text.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Msgid(&'a str),
    MsgidPlural(&'a str),
    Msgstr(&'a str),
    MsgstrPlural(usize, &'a str),
    Continuation(&'a str),
    Ignored,
}

fn capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str())
}

impl<'a> Line<'a> {
    fn classify(line: &'a str) -> Line<'a> {
        if COMMENT_REGEX.is_match(line) {
            Line::Ignored
        } else if let Some(s) = capture(&MSGID_REGEX, line) {
            Line::Msgid(s)
        } else if let Some(s) = capture(&MSGID_PLURAL_REGEX, line) {
            Line::MsgidPlural(s)
        } else if let Some(s) = capture(&MSGSTR_REGEX, line) {
            Line::Msgstr(s)
        } else if let Some(caps) = MSGSTR_PLURAL_REGEX.captures(line) {
            // An out-of-range index is treated like any other unknown line.
            match (caps[1].parse::<usize>(), caps.get(2)) {
                (Ok(index), Some(s)) if index < MAX_PLURAL_FORMS => {
                    Line::MsgstrPlural(index, s.as_str())
                }
                _ => Line::Ignored,
            }
        } else if let Some(s) = capture(&CONTINUATION_REGEX, line) {
            Line::Continuation(s)
        } else {
            Line::Ignored
        }
    }
}

/// Which string a continuation line appends to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenField {
    Key,
    PluralSource,
    Singular,
    PluralForm(usize),
}

/// The entry currently being assembled.
#[derive(Debug)]
struct Pending {
    key: String,
    plural_source: Option<String>,
    msgstr: Option<String>,
    forms: BTreeMap<usize, String>,
    open: OpenField,
}

impl Pending {
    fn new(key: String) -> Self {
        Pending {
            key,
            plural_source: None,
            msgstr: None,
            forms: BTreeMap::new(),
            open: OpenField::Key,
        }
    }

    fn is_plural(&self) -> bool {
        self.plural_source.is_some()
    }

    fn has_value(&self) -> bool {
        self.msgstr.is_some() || !self.forms.is_empty()
    }

    fn append(&mut self, text: &str) {
        let field = match self.open {
            OpenField::Key => Some(&mut self.key),
            OpenField::PluralSource => self.plural_source.as_mut(),
            OpenField::Singular => self.msgstr.as_mut(),
            OpenField::PluralForm(index) => self.forms.get_mut(&index),
        };
        if let Some(field) = field {
            field.push_str(text);
        }
    }

    fn into_entry(self) -> (String, Translation) {
        let value = if let Some(msgstr) = self.msgstr {
            Translation::Singular(msgstr)
        } else if let Some(len) = self
            .forms
            .last_key_value()
            .and_then(|(&last, _)| last.checked_add(1))
        {
            let mut values = vec![String::new(); len];
            for (index, form) in self.forms {
                values[index] = form;
            }
            Translation::Plural(values)
        } else {
            Translation::Untranslated
        };
        (self.key, value)
    }
}

/// Incremental parser state; feed lines in order, then call [`CatalogParser::finish`].
#[derive(Debug, Default)]
pub struct CatalogParser {
    catalog: Catalog,
    pending: Option<Pending>,
    line: usize,
}

impl CatalogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes the next line of input.
    pub fn feed(&mut self, line: &str) -> Result<(), Error> {
        self.line += 1;
        let line_no = self.line;
        let line = line.strip_suffix('\r').unwrap_or(line);

        match Line::classify(line) {
            Line::Ignored => {}
            Line::Msgid(s) => {
                self.commit();
                self.pending = Some(Pending::new(unescape(s)));
            }
            Line::MsgidPlural(s) => match self.pending.as_mut() {
                Some(pending) if !pending.has_value() => {
                    pending.plural_source = Some(unescape(s));
                    pending.open = OpenField::PluralSource;
                }
                _ => {
                    // No singular msgid to attach to: the plural text becomes the key.
                    self.commit();
                    let key = unescape(s);
                    let mut pending = Pending::new(key.clone());
                    pending.plural_source = Some(key);
                    self.pending = Some(pending);
                }
            },
            Line::Msgstr(s) => {
                let pending = self.open_for_value(false)?;
                pending.msgstr = Some(unescape(s));
                pending.open = OpenField::Singular;
            }
            Line::MsgstrPlural(index, s) => {
                let pending = self.open_for_value(true)?;
                if pending.forms.contains_key(&index) {
                    return Err(Error::malformed(
                        line_no,
                        MalformedEntry::DuplicatePluralIndex(index),
                    ));
                }
                pending.forms.insert(index, unescape(s));
                pending.open = OpenField::PluralForm(index);
            }
            Line::Continuation(s) => match self.pending.as_mut() {
                Some(pending) => pending.append(&unescape(s)),
                None => {
                    return Err(Error::malformed(
                        line_no,
                        MalformedEntry::OrphanContinuation,
                    ));
                }
            },
        }
        Ok(())
    }

    /// Commits the last pending entry and returns the catalog.
    pub fn finish(mut self) -> Catalog {
        self.commit();
        self.catalog
    }

    /// Checks that a `msgstr` (`plural` = `msgstr[N]`) may be assigned to the pending entry.
    fn open_for_value(&mut self, plural: bool) -> Result<&mut Pending, Error> {
        let line = self.line;
        let fail = |kind| Err(Error::malformed(line, kind));

        let Some(pending) = self.pending.as_mut() else {
            return fail(MalformedEntry::MsgstrWithoutMsgid);
        };
        if self.catalog.translated(&pending.key) {
            return fail(MalformedEntry::DuplicateKey(pending.key.clone()));
        }
        if plural {
            if !pending.is_plural() {
                return fail(MalformedEntry::PluralOnSingularEntry);
            }
            if pending.msgstr.is_some() {
                return fail(MalformedEntry::DuplicateMsgstr);
            }
        } else {
            if pending.has_value() {
                return fail(MalformedEntry::DuplicateMsgstr);
            }
            if pending.is_plural() {
                return fail(MalformedEntry::SingularOnPluralEntry);
            }
        }
        Ok(pending)
    }

    fn commit(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let (key, value) = pending.into_entry();
        // An untranslated repeat never shadows an existing entry.
        if value.is_translated() || !self.catalog.contains_key(&key) {
            self.catalog.insert(key, value);
        }
    }
}

/// Parses catalog text into a [`Catalog`].
///
/// Fails on the first grammar violation; no partial catalog is returned.
pub fn parse(text: &str) -> Result<Catalog, Error> {
    let mut parser = CatalogParser::new();
    for line in text.split('\n') {
        parser.feed(line)?;
    }
    let catalog = parser.finish();
    tracing::debug!(entries = catalog.len(), "parsed catalog");
    Ok(catalog)
}
