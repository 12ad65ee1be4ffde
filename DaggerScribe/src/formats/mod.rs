//! File format handlers for quest bytecode and text record files

pub mod common;
pub mod qbn;
pub mod text;
pub mod tokens;

// Re-export main document types
pub use qbn::{QuestBytecodeFile, SubRecord, parse_qbn_bytes, read_qbn};
pub use text::{TextDatabase, TextRecord, TextSubrecord, read_text_db};
pub use tokens::{Token, TokenKind, TokenizedText, VarRef, VarStyle, tokenize};
