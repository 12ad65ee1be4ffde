//! Quest display-name deriver
//!
//! Picks a human title for a quest from its text database: the first log
//! entry an opcode creates, else one of the standard offer/accept records,
//! else whatever the first record says.

use serde::Serialize;

use crate::formats::qbn::QuestBytecodeFile;
use crate::formats::text::{TextDatabase, TextSubrecord};
use crate::formats::tokens::VarRef;

/// "Create Log Entry" opcode; sub-record 1 holds the log message id.
pub const LOG_ENTRY_OPCODE: u16 = 0x17;

/// Records tried when no log entry yields a title, in order.
pub const FALLBACK_RECORDS: [u16; 5] = [0x03F2, 0x03E8, 0x03EC, 0x03EA, 0x03E9];

const MIN_TITLE_CHARS: usize = 6;
const MAX_TITLE_CHARS: usize = 88;
const MIN_SENTENCE_CHARS: usize = 10;

/// A derived title and the text record it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayName {
    pub title: String,
    pub source_record: u16,
}

/// Derive a display name, or `None` if the text database offers nothing usable.
pub fn derive_display_name(qbn: Option<&QuestBytecodeFile>, text: &TextDatabase) -> Option<DisplayName> {
    let log_entries = qbn
        .into_iter()
        .flat_map(|q| q.opcodes.iter())
        .filter(|op| op.op_code == LOG_ENTRY_OPCODE && op.records >= 3)
        .filter_map(|op| u16::try_from(op.sub_records[1].value).ok())
        .filter(|&id| id != 0xFFFF);

    for id in log_entries.chain(FALLBACK_RECORDS) {
        let Some(first) = text.subrecords(id).and_then(<[TextSubrecord]>::first) else {
            continue;
        };
        let title = title_from(first);
        if title.chars().count() >= MIN_TITLE_CHARS && !matches!(title.as_str(), "..." | "?" | "!") {
            return Some(DisplayName {
                title: clamp(title),
                source_record: id,
            });
        }
    }

    let record = text.records().first()?;
    let first = text.subrecords_of(record).first()?;
    let title = clamp(title_from(first));
    (!title.is_empty()).then(|| DisplayName {
        title,
        source_record: record.record_id,
    })
}

/// Plain text without variables, whitespace collapsed, cut to one sentence.
fn title_from(sub: &TextSubrecord) -> String {
    let tokens = sub.tokens();
    let cleaned = collapse_whitespace(&strip_vars(&tokens.plain, &tokens.vars));
    first_sentence_or_line(&cleaned).to_string()
}

fn strip_vars(plain: &str, vars: &[VarRef]) -> String {
    let mut out = String::with_capacity(plain.len());
    let mut pos = 0;
    for var in vars {
        let start = var.plain_offset;
        let end = start + var.token.len();
        if start < pos || end > plain.len() {
            continue;
        }
        out.push_str(&plain[pos..start]);
        pos = end;
    }
    out.push_str(&plain[pos..]);
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split([' ', '\t', '\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_sentence_or_line(s: &str) -> &str {
    let line = s.split(['\r', '\n']).next().unwrap_or_default();
    match line.find(['.', '!', '?']) {
        Some(pos) if pos >= MIN_SENTENCE_CHARS => &line[..=pos],
        _ => line,
    }
}

fn clamp(title: String) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title;
    }
    let mut cut: String = title.chars().take(MAX_TITLE_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::qbn::QbnOpCode;

    fn text_db(records: &[(u16, &[u8])]) -> TextDatabase {
        let header_len = ((records.len() + 1) * 6) as u16;
        let mut out = header_len.to_le_bytes().to_vec();
        let mut offset = 2 + u32::from(header_len);
        for (id, body) in records {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            offset += body.len() as u32;
        }
        out.extend_from_slice(&0xFFFFu16.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        for (_, body) in records {
            out.extend_from_slice(body);
        }
        TextDatabase::from_bytes(out).unwrap()
    }

    fn log_entry(message: u32) -> QbnOpCode {
        let mut op = QbnOpCode {
            op_code: LOG_ENTRY_OPCODE,
            records: 3,
            ..Default::default()
        };
        op.sub_records[1].value = message;
        op
    }

    #[test]
    fn test_log_entry_wins() {
        let db = text_db(&[
            (0x03E8, b"An offer you cannot refuse\xFE"),
            (0x1000, b"Recover the relic stolen by _thief_ from the temple. Hurry!\xFE"),
        ]);
        let qbn = QuestBytecodeFile {
            opcodes: vec![log_entry(0xFFFF), log_entry(0x1_0000), log_entry(0x1000)],
            ..Default::default()
        };
        let name = derive_display_name(Some(&qbn), &db).unwrap();
        assert_eq!(name.title, "Recover the relic stolen by from the temple.");
        assert_eq!(name.source_record, 0x1000);
    }

    #[test]
    fn test_fallback_records_in_order() {
        let db = text_db(&[
            (0x03E8, b"Short\xFE"),
            (0x03EC, b"%g3 %di.\xFE"),
            (0x03EA, b"Thanks for the help\xFE"),
        ]);
        let name = derive_display_name(None, &db).unwrap();
        assert_eq!(name.title, "Thanks for the help");
        assert_eq!(name.source_record, 0x03EA);
    }

    #[test]
    fn test_first_record_fallback() {
        let db = text_db(&[(7, b"Hi\xFE"), (8, b"Something longer\xFE")]);
        let name = derive_display_name(None, &db).unwrap();
        assert_eq!(name.title, "Hi");
        assert_eq!(name.source_record, 7);
    }

    #[test]
    fn test_title_cleanup() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(first_sentence_or_line("Go. Then come back"), "Go. Then come back");
        assert_eq!(first_sentence_or_line("Find the ring. Then return"), "Find the ring.");
        let long = "y".repeat(100);
        let clamped = clamp(long);
        assert_eq!(clamped.chars().count(), MAX_TITLE_CHARS);
        assert!(clamped.ends_with("..."));
    }
}
