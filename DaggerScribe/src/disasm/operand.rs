//! Sub-record formatting

use crate::formats::qbn::{HashedName, QuestBytecodeFile, STATE_SECTION_ID, SubRecord};

const NO_VALUE: u32 = 0xFFFF_FFFF;

/// Display name of a sub-record section id.
pub fn section_name(section: u16) -> &'static str {
    match section {
        0 => "Item",
        1 => "NPC",
        2 => "Location",
        3 => "Timer",
        4 => "Mob",
        8 => "OpCode",
        STATE_SECTION_ID => "State",
        10 => "TextVar",
        _ => "Section",
    }
}

/// Format one sub-record as a readable reference.
///
/// Constants print as `Const(0x...)`. State references print the state's
/// first name as `_name_` (or `State[n]`); everything else prints as
/// `Section(rec=n val=0x...)`. Negated references get a `NOT ` prefix.
pub fn format_sub_record(qbn: &QuestBytecodeFile, sub: &SubRecord) -> String {
    if sub.is_constant() {
        return format!("Const(0x{:08X})", sub.value);
    }

    let section = sub.effective_section();
    let body = if section == STATE_SECTION_ID {
        let index = sub.record_index().unwrap_or(sub.value & 0x00FF_FFFF);
        state_name(qbn, index)
    } else {
        let name = section_name(section);
        match (sub.record_index(), sub.value) {
            (Some(index), NO_VALUE) => format!("{name}(rec={index})"),
            (Some(index), value) => format!("{name}(rec={index} val=0x{value:08X})"),
            (None, NO_VALUE) => format!("{name}(none)"),
            (None, value) => format!("{name}(val=0x{value:08X})"),
        }
    };

    if sub.is_negated() {
        format!("NOT {body}")
    } else {
        body
    }
}

fn state_name(qbn: &QuestBytecodeFile, index: u32) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| qbn.state(i))
        .and_then(HashedName::display_name)
        .map_or_else(|| format!("State[{index}]"), |name| format!("_{name}_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::qbn::{CONSTANT_LOCAL_PTR, QbnState};

    fn sub(not_flag: u8, local_ptr: u32, section_id: u16, value: u32) -> SubRecord {
        SubRecord {
            not_flag,
            local_ptr,
            section_id,
            value,
            object_ptr: 0,
        }
    }

    fn qbn_with_state(name: Option<&str>) -> QuestBytecodeFile {
        let mut qbn = QuestBytecodeFile::default();
        qbn.states.push(QbnState {
            var_names: name.map(str::to_string).into_iter().collect(),
            ..Default::default()
        });
        qbn
    }

    #[test]
    fn test_constant() {
        let qbn = QuestBytecodeFile::default();
        let s = sub(1, CONSTANT_LOCAL_PTR, 0, 0xDEAD_BEEF);
        assert_eq!(format_sub_record(&qbn, &s), "Const(0xDEADBEEF)");
    }

    #[test]
    fn test_state_reference() {
        let named = qbn_with_state(Some("done"));
        let unnamed = qbn_with_state(None);
        let s = sub(0, 0x0900, 0, NO_VALUE);
        assert_eq!(format_sub_record(&named, &s), "_done_");
        assert_eq!(format_sub_record(&unnamed, &s), "State[0]");
        assert_eq!(format_sub_record(&named, &sub(1, 0x0900, 0, NO_VALUE)), "NOT _done_");
    }

    #[test]
    fn test_state_index_from_masked_value() {
        let qbn = QuestBytecodeFile::default();
        // explicit section, no packed record, sentinel value
        let s = sub(0, 0xFFFF_FFFF, 9, NO_VALUE);
        assert_eq!(format_sub_record(&qbn, &s), "State[16777215]");
        let s = sub(0, 0x0000_00FF, 9, 4);
        assert_eq!(format_sub_record(&qbn, &s), "State[4]");
    }

    #[test]
    fn test_generic_references() {
        let qbn = QuestBytecodeFile::default();
        assert_eq!(format_sub_record(&qbn, &sub(0, 0x0103, 0, NO_VALUE)), "NPC(rec=3)");
        assert_eq!(
            format_sub_record(&qbn, &sub(0, 0x0103, 0, 7)),
            "NPC(rec=7 val=0x00000007)"
        );
        assert_eq!(format_sub_record(&qbn, &sub(0, 0x01FF, 0, NO_VALUE)), "NPC(none)");
        assert_eq!(
            format_sub_record(&qbn, &sub(1, 0x02FF, 0, 0xFFFF_FFFE)),
            "NOT Location(val=0xFFFFFFFE)"
        );
        assert_eq!(format_sub_record(&qbn, &sub(0, 0, 0x20, 1)), "Section(rec=1 val=0x00000001)");
    }
}
