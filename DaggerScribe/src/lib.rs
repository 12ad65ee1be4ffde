//! # DaggerScribe
//!
//! A pure-Rust library for reading the quest scripts and text records of
//! Daggerfall-era game data.
//!
//! ## Supported Formats
//!
//! - **QBN** - Quest bytecode: typed record sections, opcodes and text variables
//! - **TEXT.RSC / QRC** - Header-indexed text record databases
//! - **Rich text** - Control codes and inline `%var` / `_var_` references
//!
//! ## Quick Start
//!
//! ### Disassembling a Quest
//!
//! ```no_run
//! use daggerscribe::catalog::VarHashCatalog;
//! use daggerscribe::disasm::disassemble_all;
//! use daggerscribe::formats::{TextDatabase, read_qbn};
//!
//! let hashes = VarHashCatalog::load("TEXT_VARIABLE_HASHES.txt")?;
//! let qbn = read_qbn("ARENA2/M0B00Y00.QBN", Some(&hashes))?;
//! let qrc = TextDatabase::read("ARENA2/M0B00Y00.QRC")?;
//!
//! for line in disassemble_all(&qbn, Some(&qrc)) {
//!     println!("{}", line.summary);
//! }
//! # Ok::<(), daggerscribe::Error>(())
//! ```
//!
//! ### Reading Text Records
//!
//! ```no_run
//! use daggerscribe::formats::TextDatabase;
//!
//! let text = TextDatabase::from_arena2_root("/games/daggerfall")?;
//! if let Some(plain) = text.first_plain(0x03E8) {
//!     println!("{plain}");
//! }
//! # Ok::<(), daggerscribe::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use daggerscribe::prelude::*;
//!
//! assert_eq!(var_hash("ab"), 292);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `daggerscribe` command-line binary

pub mod catalog;
pub mod disasm;
pub mod error;
pub mod formats;
pub mod quest;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{ByteReader, var_hash};
    pub use crate::formats::qbn::{HashedName, QbnOpCode, QuestBytecodeFile, SubRecord, parse_qbn_bytes, read_qbn};
    pub use crate::formats::text::{TextDatabase, TextRecord, TextSubrecord};
    pub use crate::formats::tokens::{Token, TokenKind, TokenizedText, VarRef, VarStyle, tokenize};

    pub use crate::catalog::{IndexCatalog, VarHashCatalog};
    pub use crate::disasm::{OpCodeDisasm, disassemble_all, disassemble_opcode, format_sub_record};
    pub use crate::quest::{DisplayName, QuestCatalog, QuestEntry, QuestFilename};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
