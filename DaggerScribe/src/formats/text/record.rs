//! Text records and their lazily parsed subrecords

use std::ops::Range;
use std::sync::OnceLock;

use serde::Serialize;

use super::{RECORD_END, SUBRECORD_SEPARATOR};
use crate::formats::tokens::{TokenizedText, tokenize};

/// One `0xFF`/`0xFE`-delimited chunk of a text record.
///
/// Tokens are computed on first access. The cell is filled with a value
/// computed outside of it, so concurrent first readers may each tokenize and
/// all but one result is dropped; the output only depends on `raw`.
#[derive(Debug, Clone, Default)]
pub struct TextSubrecord {
    raw: Vec<u8>,
    user_override: Option<String>,
    tokens: OnceLock<TokenizedText>,
}

impl TextSubrecord {
    #[must_use]
    pub fn new(raw: Vec<u8>) -> Self {
        Self {
            raw,
            user_override: None,
            tokens: OnceLock::new(),
        }
    }

    /// Raw, uninterpreted bytes.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Whether tokens have been computed yet.
    pub fn is_tokenized(&self) -> bool {
        self.tokens.get().is_some()
    }

    pub fn tokens(&self) -> &TokenizedText {
        if let Some(tokens) = self.tokens.get() {
            return tokens;
        }
        let computed = tokenize(&self.raw);
        self.tokens.get_or_init(move || computed)
    }

    /// Replace the displayed text without touching the source bytes.
    pub fn set_override(&mut self, text: impl Into<String>) {
        self.user_override = Some(text.into());
    }

    pub fn clear_override(&mut self) {
        self.user_override = None;
    }

    pub fn user_override(&self) -> Option<&str> {
        self.user_override.as_deref()
    }

    /// The override if one is set, else the plain rendering.
    pub fn effective_plain(&self) -> &str {
        match &self.user_override {
            Some(text) => text,
            None => &self.tokens().plain,
        }
    }

    /// The override if one is set, else the rich rendering.
    pub fn effective_rich(&self) -> &str {
        match &self.user_override {
            Some(text) => text,
            None => &self.tokens().rich,
        }
    }
}

/// A text record: an id and a byte span into the owning database.
#[derive(Debug, Clone, Serialize)]
pub struct TextRecord {
    pub record_id: u16,
    pub start: u32,
    pub end: u32,
    #[serde(skip)]
    subrecords: OnceLock<Vec<TextSubrecord>>,
}

impl TextRecord {
    #[must_use]
    pub fn new(record_id: u16, start: u32, end: u32) -> Self {
        Self {
            record_id,
            start,
            end,
            subrecords: OnceLock::new(),
        }
    }

    /// Byte span `[start, end)` in the database file.
    pub fn span(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the subrecords have been split out yet.
    pub fn is_parsed(&self) -> bool {
        self.subrecords.get().is_some()
    }

    /// Subrecords, splitting `file[start..end]` on first access.
    pub fn subrecords(&self, file: &[u8]) -> &[TextSubrecord] {
        if let Some(subs) = self.subrecords.get() {
            return subs;
        }
        let computed = split_subrecords(file, self.span());
        self.subrecords.get_or_init(move || computed)
    }

    /// Mutable subrecords, for the override layer.
    pub fn subrecords_mut(&mut self, file: &[u8]) -> &mut [TextSubrecord] {
        if self.subrecords.get().is_none() {
            let computed = split_subrecords(file, self.span());
            let _ = self.subrecords.set(computed);
        }
        self.subrecords
            .get_mut()
            .map(Vec::as_mut_slice)
            .unwrap_or_default()
    }
}

/// Split a record span into subrecords.
///
/// `0xFF` closes the current subrecord, `0xFE` closes it and ends the record
/// (anything after is dropped); a non-empty trailing run becomes a final
/// subrecord. An invalid span yields no subrecords.
pub fn split_subrecords(file: &[u8], span: Range<usize>) -> Vec<TextSubrecord> {
    let Some(bytes) = file.get(span.clone()).filter(|_| span.start < span.end) else {
        return Vec::new();
    };

    let mut subrecords = Vec::new();
    let mut current = Vec::new();

    for &b in bytes {
        match b {
            SUBRECORD_SEPARATOR => subrecords.push(TextSubrecord::new(std::mem::take(&mut current))),
            RECORD_END => {
                subrecords.push(TextSubrecord::new(current));
                return subrecords;
            }
            _ => current.push(b),
        }
    }

    if !current.is_empty() {
        subrecords.push(TextSubrecord::new(current));
    }
    subrecords
}
