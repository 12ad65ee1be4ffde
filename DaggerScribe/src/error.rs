//! Error types for `DaggerScribe`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `DaggerScribe` operations.
///
/// Only file-level structural problems surface here. Section- and record-level
/// irregularities inside a QBN are absorbed by the decoder (clamped counts,
/// absent sections) and unknown text codes degrade to `Unknown` tokens.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations (missing or unreadable file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Structural Errors ====================
    /// The buffer is shorter than the fixed header of its format.
    #[error("{kind} too small: {size} bytes (need at least {minimum})")]
    TooSmall {
        /// Which format was being decoded (e.g. "QBN").
        kind: &'static str,
        /// Actual buffer size.
        size: usize,
        /// Minimum size the format requires.
        minimum: usize,
    },

    /// Text database header invariants are violated.
    #[error("malformed text database header: {reason}")]
    MalformedHeader {
        /// What was wrong with the header.
        reason: String,
    },

    /// Text record offsets decrease somewhere in the header list.
    #[error("text record offsets not sorted: entry {index} at {offset:#x} precedes {previous:#x}")]
    UnsortedOffsets {
        /// Position of the offending entry in the header list.
        index: usize,
        /// The offending offset.
        offset: u32,
        /// The offset of the entry before it.
        previous: u32,
    },

    /// A computed offset lies outside the buffer.
    #[error("offset {offset:#x} out of range for {size}-byte buffer")]
    OutOfRange {
        /// The offending offset.
        offset: u64,
        /// Buffer size.
        size: usize,
    },

    // ==================== Catalog Errors ====================
    /// A hash catalog source produced no `0x<hash> <name>` entries.
    #[error("hash catalog loaded but produced 0 hash entries")]
    EmptyHashCatalog,

    /// An index-label catalog source produced no id spans.
    #[error("index catalog loaded but produced 0 spans")]
    EmptyIndexCatalog,

    // ==================== Quest Catalog Errors ====================
    /// No `.QBN` files were found in the scanned folder.
    #[error("no QBN files found in {path}")]
    NoQuestFiles {
        /// The folder that was scanned.
        path: PathBuf,
    },

    /// A quest index does not exist in the catalog.
    #[error("quest index {index} out of range ({len} quests)")]
    QuestIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of quests in the catalog.
        len: usize,
    },

    /// The `.QRC` text database paired with a quest is missing.
    #[error("missing quest text database: {path}")]
    MissingQuestText {
        /// Expected path of the `.QRC` file.
        path: PathBuf,
    },

    /// No `TEXT.RSC` could be found under the given root.
    #[error("TEXT.RSC not found under {path} (checked the folder and an ARENA2 subfolder)")]
    TextFileNotFound {
        /// The root folder that was searched.
        path: PathBuf,
    },
}

/// A specialized Result type for `DaggerScribe` operations.
pub type Result<T> = std::result::Result<T, Error>;
