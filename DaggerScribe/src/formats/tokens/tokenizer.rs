//! Single-pass greedy scanner over a text subrecord
//!
//! At every position the codes are tried in a fixed priority order; the first
//! match wins. This makes `0xFC 0xFB x y` a position code rather than an
//! end-of-line, which is how the game reads it.

use std::fmt::Write as _;

use super::codes;
use super::vars::detect_vars;
use super::{Token, TokenKind, TokenizedText};

/// Tokenize one subrecord's raw bytes.
///
/// Pure function of its input; unknown bytes become [`TokenKind::Unknown`].
#[must_use]
pub fn tokenize(bytes: &[u8]) -> TokenizedText {
    let mut scanner = Scanner::default();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // Position code: mode 0xFB x y
        if i + 3 < bytes.len() && bytes[i + 1] == codes::POSITION {
            let (mode, x, y) = (b, bytes[i + 2], bytes[i + 3]);
            scanner.control(TokenKind::Position { mode, x, y }, i);
            if mode == codes::POSITION_NEW_LINE {
                scanner.out.plain.push('\n');
            }
            let _ = write!(scanner.out.rich, "<pos m=0x{mode:02X} x={x} y={y}>");
            i += 4;
            continue;
        }

        // End of line: 0xFC 0x00 / 0xFD 0x00
        if (b == codes::END_OF_LINE_LEFT || b == codes::END_OF_LINE_CENTER)
            && bytes.get(i + 1) == Some(&codes::NEW_LINE)
        {
            let kind = if b == codes::END_OF_LINE_LEFT {
                TokenKind::EndOfLineLeft
            } else {
                TokenKind::EndOfLineCenter
            };
            scanner.control(kind, i);
            scanner.out.plain.push('\n');
            scanner.out.rich.push('\n');
            i += 2;
            continue;
        }

        match b {
            codes::NEW_LINE => {
                scanner.control(TokenKind::NewLine, i);
                scanner.out.plain.push('\n');
                scanner.out.rich.push('\n');
                i += 1;
            }
            codes::END_OF_PAGE => {
                scanner.control(TokenKind::EndOfPage, i);
                scanner.out.has_end_of_page = true;
                scanner.out.plain.push_str("\n\u{c}\n");
                scanner.out.rich.push_str("\n<page/>\n");
                i += 1;
            }
            codes::FONT if i + 1 < bytes.len() => {
                let index = bytes[i + 1];
                scanner.control(TokenKind::Font { index }, i);
                match index {
                    codes::FONT_SCRIPT => {
                        scanner.out.has_font_script = true;
                        scanner.out.rich.push_str("<font=script>");
                    }
                    codes::FONT_NORMAL => scanner.out.rich.push_str("<font=normal>"),
                    _ => {
                        let _ = write!(scanner.out.rich, "<font=0x{index:02X}>");
                    }
                }
                i += 2;
            }
            codes::COLOR if i + 1 < bytes.len() => {
                let index = bytes[i + 1];
                scanner.control(TokenKind::Color { index }, i);
                let _ = write!(scanner.out.rich, "<color={index}>");
                i += 2;
            }
            codes::BOOK_IMAGE => {
                let name_start = i + 1;
                let name_end = bytes[name_start..]
                    .iter()
                    .take(codes::MAX_IMAGE_NAME)
                    .position(|&c| c == 0)
                    .map_or_else(
                        || (name_start + codes::MAX_IMAGE_NAME).min(bytes.len()),
                        |n| name_start + n,
                    );
                let name: String = bytes[name_start..name_end].iter().map(|&c| char::from(c)).collect();
                let _ = write!(scanner.out.rich, "<bookimg={name}>");
                scanner.control(TokenKind::BookImage { name }, i);
                // Skip the NUL terminator when there is one
                i = if bytes.get(name_end) == Some(&0) { name_end + 1 } else { name_end };
            }
            0x20..=0x7F => {
                scanner.printable(b, i);
                i += 1;
            }
            _ => {
                scanner.control(TokenKind::Unknown { byte: b }, i);
                let _ = write!(scanner.out.rich, "<0x{b:02X}>");
                i += 1;
            }
        }
    }

    scanner.flush();
    scanner.out
}

/// Accumulates output plus the pending printable run.
#[derive(Default)]
struct Scanner {
    out: TokenizedText,
    run: String,
    run_start: usize,
}

impl Scanner {
    fn printable(&mut self, b: u8, offset: usize) {
        if self.run.is_empty() {
            self.run_start = offset;
        }
        self.run.push(char::from(b));
    }

    /// Flush the pending run, then push a control token.
    fn control(&mut self, kind: TokenKind, offset: usize) {
        self.flush();
        self.out.tokens.push(Token {
            kind,
            byte_offset: offset,
        });
    }

    fn flush(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.run);
        let plain_base = self.out.plain.len();

        self.out.plain.push_str(&text);
        self.out.rich.push_str(&text);
        detect_vars(&text, plain_base, self.run_start, &mut self.out.vars);

        self.out.tokens.push(Token {
            kind: TokenKind::Text { text },
            byte_offset: self.run_start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::tokens::VarStyle;

    #[test]
    fn test_plain_text_single_token() {
        let t = tokenize(b"Hello world");
        assert_eq!(t.tokens.len(), 1);
        assert_eq!(t.plain, "Hello world");
        assert_eq!(t.rich, "Hello world");
    }

    #[test]
    fn test_end_of_line_codes() {
        let t = tokenize(b"ab\xFC\x00cd\xFD\x00");
        assert_eq!(t.plain, "ab\ncd\n");
        assert_eq!(t.tokens[1].kind, TokenKind::EndOfLineLeft);
        assert_eq!(t.tokens[3].kind, TokenKind::EndOfLineCenter);
        assert_eq!(t.tokens[3].byte_offset, 6);
    }

    #[test]
    fn test_position_beats_end_of_line() {
        let t = tokenize(&[0xFC, 0xFB, 10, 20]);
        assert_eq!(t.tokens.len(), 1);
        assert_eq!(
            t.tokens[0].kind,
            TokenKind::Position {
                mode: 0xFC,
                x: 10,
                y: 20
            }
        );
        assert_eq!(t.plain, "");
        assert_eq!(t.rich, "<pos m=0xFC x=10 y=20>");
    }

    #[test]
    fn test_position_new_line_mode() {
        let t = tokenize(&[b'a', 0x00, 0xFB, 1, 2, b'b']);
        assert_eq!(t.plain, "a\nb");
        assert_eq!(t.tokens.len(), 3);
    }

    #[test]
    fn test_truncated_position_is_not_matched() {
        // Only three bytes: 0x00 is a new line, 0xFB unknown, 0x05 unknown
        let t = tokenize(&[0x00, 0xFB, 0x05]);
        assert_eq!(t.tokens[0].kind, TokenKind::NewLine);
        assert_eq!(t.tokens[1].kind, TokenKind::Unknown { byte: 0xFB });
        assert_eq!(t.plain, "\n");
    }

    #[test]
    fn test_end_of_page_and_fonts() {
        let t = tokenize(b"\xF9\x02Dear\xF6\xF9\x04\xFA\x07x");
        assert!(t.has_end_of_page);
        assert!(t.has_font_script);
        assert_eq!(t.plain, "Dear\n\u{c}\nx");
        assert_eq!(t.rich, "<font=script>Dear\n<page/>\n<font=normal><color=7>x");
    }

    #[test]
    fn test_book_image() {
        let t = tokenize(b"\xF7BOOK01.IMG\0Text");
        assert!(t.has_book_image());
        assert_eq!(
            t.tokens[0].kind,
            TokenKind::BookImage {
                name: "BOOK01.IMG".to_string()
            }
        );
        assert_eq!(t.plain, "Text");
        assert_eq!(t.tokens[1].byte_offset, 12);
    }

    #[test]
    fn test_book_image_at_buffer_end() {
        let t = tokenize(b"\xF7PIC");
        assert_eq!(
            t.tokens[0].kind,
            TokenKind::BookImage {
                name: "PIC".to_string()
            }
        );
        assert_eq!(t.tokens.len(), 1);
    }

    #[test]
    fn test_book_image_name_capped_without_nul() {
        let mut raw = vec![codes::BOOK_IMAGE];
        raw.extend(std::iter::repeat_n(b'A', 300));
        let t = tokenize(&raw);

        assert_eq!(t.tokens.len(), 2);
        let TokenKind::BookImage { name } = &t.tokens[0].kind else {
            panic!("expected a book image, got {:?}", t.tokens[0].kind);
        };
        assert_eq!(name.len(), codes::MAX_IMAGE_NAME);
        // The byte after the cap starts a text run rather than being swallowed
        assert_eq!(t.tokens[1].byte_offset, 1 + codes::MAX_IMAGE_NAME);
        assert_eq!(t.plain, "A".repeat(300 - codes::MAX_IMAGE_NAME));
    }

    #[test]
    fn test_unknown_byte_flushes_run() {
        let t = tokenize(b"ab\x85cd");
        assert_eq!(t.tokens.len(), 3);
        assert_eq!(t.tokens[1].kind, TokenKind::Unknown { byte: 0x85 });
        assert_eq!(t.plain, "abcd");
        assert_eq!(t.rich, "ab<0x85>cd");
    }

    #[test]
    fn test_dangling_prefix_is_unknown() {
        let t = tokenize(b"x\xF9");
        assert_eq!(t.tokens[1].kind, TokenKind::Unknown { byte: 0xF9 });
    }

    #[test]
    fn test_vars_offsets_across_runs() {
        let t = tokenize(b"Hi\x00see %pcn");
        assert_eq!(t.vars.len(), 1);
        assert_eq!(t.vars[0].style, VarStyle::Percent);
        assert_eq!(t.vars[0].byte_offset, 7);
        assert_eq!(t.vars[0].plain_offset, 7);
        assert_eq!(&t.plain[t.vars[0].plain_offset..], "%pcn");
    }

    #[test]
    fn test_idempotent() {
        let raw = b"\xF9\x02Go see _npc1_ \xFC\x00about %god\xF6\x91";
        assert_eq!(tokenize(raw), tokenize(raw));
    }
}
