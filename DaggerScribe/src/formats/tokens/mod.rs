//! Rich-text token stream embedded in text records
//!
//! A text subrecord is a run of printable ASCII interleaved with one- to
//! four-byte control codes (line ends, positioning, fonts, colours, book
//! images). [`tokenize`] turns the raw bytes into a [`TokenizedText`]: the
//! token list, inline variable references, a plain rendering and a debug
//! "rich" rendering.

mod tokenizer;
mod vars;

use serde::Serialize;

pub use tokenizer::tokenize;

/// Control-code bytes recognised inside text subrecords.
pub mod codes {
    /// Second byte of a position code (`mode 0xFB x y`).
    pub const POSITION: u8 = 0xFB;
    /// End of line, left aligned (`0xFC 0x00`).
    pub const END_OF_LINE_LEFT: u8 = 0xFC;
    /// End of line, centered (`0xFD 0x00`).
    pub const END_OF_LINE_CENTER: u8 = 0xFD;
    pub const NEW_LINE: u8 = 0x00;
    pub const END_OF_PAGE: u8 = 0xF6;
    /// Font prefix, followed by the font index.
    pub const FONT: u8 = 0xF9;
    /// Colour prefix, followed by the colour index.
    pub const COLOR: u8 = 0xFA;
    /// Book image, followed by a NUL-terminated image name.
    pub const BOOK_IMAGE: u8 = 0xF7;

    /// Position mode that starts a new line.
    pub const POSITION_NEW_LINE: u8 = 0x00;
    /// Font index of the script (handwriting) font.
    pub const FONT_SCRIPT: u8 = 0x02;
    pub const FONT_NORMAL: u8 = 0x04;
    /// Longest book image name that is read.
    pub const MAX_IMAGE_NAME: usize = 255;
}

/// What a token represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenKind {
    /// A run of printable ASCII.
    Text { text: String },
    NewLine,
    /// Cursor positioning; mode 0 is "new line offset".
    Position { mode: u8, x: u8, y: u8 },
    EndOfPage,
    EndOfLineLeft,
    EndOfLineCenter,
    Font { index: u8 },
    Color { index: u8 },
    BookImage { name: String },
    /// Any byte the format does not define here, preserved as-is.
    Unknown { byte: u8 },
}

/// One unit of the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    /// Offset of the token's first byte in the raw subrecord.
    pub byte_offset: usize,
}

/// Spelling of an inline variable reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarStyle {
    /// `%name`
    Percent,
    /// `_name_`
    Underscore,
}

/// An inline variable reference found in a text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarRef {
    pub style: VarStyle,
    /// Literal text as it appears, e.g. `%pcn` or `_npc1_`.
    pub token: String,
    /// Lowercased name without decoration, e.g. `pcn`.
    pub name: String,
    /// [`var_hash`](crate::formats::common::var_hash) of `name`.
    pub hash: u32,
    /// Offset of the token in [`TokenizedText::plain`].
    pub plain_offset: usize,
    /// Offset of the token in the raw subrecord bytes.
    pub byte_offset: usize,
}

/// Tokenizer output for one subrecord.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenizedText {
    pub tokens: Vec<Token>,
    pub vars: Vec<VarRef>,
    /// Plain rendering: text runs plus `\n` for line codes and `\n\f\n` per page.
    pub plain: String,
    /// Diagnostic rendering with `<pos ...>`, `<font=...>` style markup.
    pub rich: String,
    pub has_end_of_page: bool,
    /// Set when the script font (index 2) is selected.
    pub has_font_script: bool,
}

impl TokenizedText {
    /// Whether any token is a book image.
    pub fn has_book_image(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t.kind, TokenKind::BookImage { .. }))
    }
}
