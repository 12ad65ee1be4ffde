//! Text record database (`TEXT.RSC` and quest `.QRC` files)
//!
//! The file starts with a header list of `(id, offset)` slots. Each record
//! runs from its offset to the next record's offset (or the terminator's),
//! and is split into `0xFF`-separated subrecords of rich text. Records are
//! indexed at load time; subrecords and tokens are produced on demand since
//! most records are never looked at.

mod reader;
mod record;

use std::path::{Path, PathBuf};

pub use reader::{
    ARENA2_DIR_NAME, HeaderEntry, TEXT_FILE_NAME, TextHeader, parse_header, parse_text_bytes, read_text_db,
    read_text_db_from_arena2_root,
};
pub use record::{TextRecord, TextSubrecord, split_subrecords};

use crate::error::Result;

/// Size of one `(id: u16, offset: u32)` header slot.
pub const HEADER_SLOT_SIZE: usize = 6;

/// Record id that terminates the header list.
pub const TERMINATOR_ID: u16 = 0xFFFF;

/// Corruption guard for the fallback header scan.
pub const MAX_HEADER_ENTRIES: usize = 50_000;

/// Ends the current subrecord.
pub const SUBRECORD_SEPARATOR: u8 = 0xFF;

/// Ends the current subrecord and the record.
pub const RECORD_END: u8 = 0xFE;

const BOOK_LABEL_WORDS: [&str; 10] = [
    "book",
    "notebook",
    "journal",
    "diary",
    "spellbook",
    "guide",
    "chronicle",
    "history",
    "biography",
    "biograph",
];

/// A loaded text database. Owns the file bytes so records parse lazily.
#[derive(Debug, Clone, Default)]
pub struct TextDatabase {
    pub source_path: Option<PathBuf>,
    bytes: Vec<u8>,
    records: Vec<TextRecord>,
}

impl TextDatabase {
    /// Read a text database from disk
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_text_db(path)
    }

    /// Parse a text database from bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        parse_text_bytes(data)
    }

    /// Locate `TEXT.RSC` in `root` or `root/ARENA2` and read it
    pub fn from_arena2_root<P: AsRef<Path>>(root: P) -> Result<Self> {
        read_text_db_from_arena2_root(root)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn records(&self) -> &[TextRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given id.
    pub fn find(&self, id: u16) -> Option<&TextRecord> {
        self.records.iter().find(|r| r.record_id == id)
    }

    pub fn find_mut(&mut self, id: u16) -> Option<&mut TextRecord> {
        self.records.iter_mut().find(|r| r.record_id == id)
    }

    /// Subrecords of the record with the given id (parsed on first access).
    pub fn subrecords(&self, id: u16) -> Option<&[TextSubrecord]> {
        self.find(id).map(|r| r.subrecords(&self.bytes))
    }

    /// Subrecords of a record already borrowed from this database.
    pub fn subrecords_of<'a>(&'a self, record: &'a TextRecord) -> &'a [TextSubrecord] {
        record.subrecords(&self.bytes)
    }

    /// Plain text of a record's first subrecord.
    pub fn first_plain(&self, id: u16) -> Option<&str> {
        self.subrecords(id)?.first().map(|s| s.tokens().plain.as_str())
    }

    /// Set the non-persistent display override of one subrecord.
    ///
    /// Returns `false` if the record or subrecord does not exist.
    pub fn set_override(&mut self, id: u16, subrecord: usize, text: impl Into<String>) -> bool {
        let Self { bytes, records, .. } = self;
        let Some(record) = records.iter_mut().find(|r| r.record_id == id) else {
            return false;
        };
        match record.subrecords_mut(bytes).get_mut(subrecord) {
            Some(sub) => {
                sub.set_override(text);
                true
            }
            None => false,
        }
    }

    /// Heuristic: does this record read like an in-game book?
    ///
    /// Scores page breaks, the script font, book images, multiple subrecords,
    /// length, and a book-like index label; three points make a book.
    pub fn looks_like_book(&self, id: u16, label: Option<&str>) -> bool {
        let Some(subrecords) = self.subrecords(id) else {
            return false;
        };
        if subrecords.is_empty() {
            return false;
        }

        let mut score = 0;
        if label.is_some_and(is_book_label) {
            score += 2;
        }

        let mut plain_bytes = 0;
        for sub in subrecords {
            let tokens = sub.tokens();
            plain_bytes += tokens.plain.len();
            if tokens.has_end_of_page {
                score += 3;
            }
            if tokens.has_font_script {
                score += 2;
            }
            if tokens.has_book_image() {
                score += 2;
            }
        }

        if subrecords.len() >= 2 {
            score += 1;
        }
        if plain_bytes >= 350 {
            score += 1;
        }
        score >= 3
    }
}

fn is_book_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    BOOK_LABEL_WORDS.iter().any(|w| lower.contains(w))
}
