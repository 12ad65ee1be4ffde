//! Opcode disassembler
//!
//! Turns decoded [`QbnOpCode`]s into readable statements: a type name from
//! the opcode table, a condition from sub-record 0, one operand string per
//! active sub-record, and a preview of the opcode's message text.
//!
//! ```no_run
//! use daggerscribe::disasm::disassemble_all;
//! use daggerscribe::formats::{TextDatabase, read_qbn};
//!
//! let qbn = read_qbn("S0000999.QBN", None)?;
//! let qrc = TextDatabase::read("S0000999.QRC")?;
//! for line in disassemble_all(&qbn, Some(&qrc)) {
//!     println!("{}", line.summary);
//! }
//! # Ok::<(), daggerscribe::Error>(())
//! ```

mod operand;
mod types;

use serde::Serialize;

pub use operand::{format_sub_record, section_name};
pub use types::{OPCODE_TYPES, OpCodeType, lookup_opcode_type, opcode_type_name};

use crate::formats::qbn::{QbnOpCode, QuestBytecodeFile};
use crate::formats::text::TextDatabase;

/// Longest message preview, including the `...` marker.
pub const PREVIEW_MAX_CHARS: usize = 90;

/// A disassembled opcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpCodeDisasm {
    pub type_name: String,
    /// Sub-record 0, formatted.
    pub condition: String,
    /// Each active sub-record, formatted.
    pub operands: Vec<String>,
    pub message_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_preview: Option<String>,
    /// `type | condition[ | Msg=0xNNNN "preview"]`
    pub summary: String,
}

/// Disassemble one opcode of `qbn`, previewing its message from `text` if given.
pub fn disassemble_opcode(qbn: &QuestBytecodeFile, op: &QbnOpCode, text: Option<&TextDatabase>) -> OpCodeDisasm {
    let type_name = opcode_type_name(op.op_code);
    let condition = format_sub_record(qbn, &op.sub_records[0]);
    let operands = op
        .active_sub_records()
        .iter()
        .map(|s| format_sub_record(qbn, s))
        .collect();
    let message_preview = op
        .message()
        .and_then(|id| text.and_then(|db| message_preview(db, id)));

    let mut summary = format!("{type_name} | {condition}");
    if let Some(id) = op.message() {
        summary.push_str(&format!(" | Msg=0x{id:04X}"));
        if let Some(preview) = &message_preview {
            summary.push_str(&format!(" \"{preview}\""));
        }
    }

    OpCodeDisasm {
        type_name,
        condition,
        operands,
        message_id: op.message_id,
        message_preview,
        summary,
    }
}

/// Disassemble every opcode of `qbn` in file order.
pub fn disassemble_all(qbn: &QuestBytecodeFile, text: Option<&TextDatabase>) -> Vec<OpCodeDisasm> {
    qbn.opcodes
        .iter()
        .map(|op| disassemble_opcode(qbn, op, text))
        .collect()
}

/// Plain text of the message's first subrecord, cut to [`PREVIEW_MAX_CHARS`].
pub fn message_preview(text: &TextDatabase, message_id: u16) -> Option<String> {
    let plain = text.first_plain(message_id)?;
    if plain.chars().count() <= PREVIEW_MAX_CHARS {
        return Some(plain.to_string());
    }
    let mut cut: String = plain.chars().take(PREVIEW_MAX_CHARS - 3).collect();
    cut.push_str("...");
    Some(cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::qbn::{QbnState, SubRecord};

    fn text_db(id: u16, body: &[u8]) -> TextDatabase {
        let mut out = 12u16.to_le_bytes().to_vec();
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&14u32.to_le_bytes());
        out.extend_from_slice(&0xFFFFu16.to_le_bytes());
        out.extend_from_slice(&(14 + body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        TextDatabase::from_bytes(out).unwrap()
    }

    fn state_ref(index: u8) -> SubRecord {
        SubRecord {
            not_flag: 0,
            local_ptr: 0x0900 | u32::from(index),
            section_id: 0,
            value: 0xFFFF_FFFF,
            object_ptr: 0,
        }
    }

    #[test]
    fn test_summary_with_preview() {
        let mut qbn = QuestBytecodeFile::default();
        qbn.states.push(QbnState {
            var_names: vec!["questdone".into()],
            ..Default::default()
        });
        let mut op = QbnOpCode {
            op_code: 0x33,
            records: 1,
            message_id: 0x03E8,
            ..Default::default()
        };
        op.sub_records[0] = state_ref(0);

        let db = text_db(0x03E8, b"Well done, %pcn.\xFE");
        let d = disassemble_opcode(&qbn, &op, Some(&db));
        assert_eq!(d.type_name, "Display Message");
        assert_eq!(d.condition, "_questdone_");
        assert_eq!(d.operands, ["_questdone_"]);
        assert_eq!(d.message_preview.as_deref(), Some("Well done, %pcn."));
        assert_eq!(
            d.summary,
            "Display Message | _questdone_ | Msg=0x03E8 \"Well done, %pcn.\""
        );
    }

    #[test]
    fn test_summary_without_message() {
        let qbn = QuestBytecodeFile::default();
        let mut op = QbnOpCode {
            op_code: 0x0E,
            records: 0,
            message_id: 0xFFFF,
            ..Default::default()
        };
        op.sub_records[0] = state_ref(2);
        let d = disassemble_opcode(&qbn, &op, None);
        assert_eq!(d.summary, "Type 0x000E | State[2]");
        assert!(d.operands.is_empty());
        assert!(d.message_preview.is_none());
    }

    #[test]
    fn test_message_without_text_db() {
        let qbn = QuestBytecodeFile::default();
        let op = QbnOpCode {
            op_code: 0x17,
            message_id: 0x0010,
            ..Default::default()
        };
        let d = disassemble_opcode(&qbn, &op, None);
        assert_eq!(d.summary, "Create Log Entry | Item(rec=0 val=0x00000000) | Msg=0x0010");
    }

    #[test]
    fn test_preview_is_capped() {
        let long = "x".repeat(120);
        let mut body = long.into_bytes();
        body.push(0xFE);
        let db = text_db(1, &body);
        let preview = message_preview(&db, 1).unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS);
        assert!(preview.ends_with("..."));
        assert!(message_preview(&db, 2).is_none());
    }
}
