//! QBN document structure definitions

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::VarHashCatalog;
use crate::error::Result;

use super::{CONSTANT_LOCAL_PTR, SECTION_COUNT, SECTION_OFFSET_COUNT, STATE_SECTION_ID, SUB_RECORDS_PER_OPCODE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnHeader {
    pub quest_id: u16,
    pub faction_id: u16,
    pub resource_id: u16,
    pub resource_filename: String,
    pub has_debug_info: u8,
    pub section_record_count: [u16; SECTION_COUNT],
    pub section_offset: [u16; SECTION_OFFSET_COUNT],
}

/// A record that carries a text-variable hash and the names resolved for it.
pub trait HashedName {
    fn text_var_hash(&self) -> u32;

    /// Resolved candidate names, lowercase, in resolution order.
    fn var_names(&self) -> &[String];

    fn var_names_mut(&mut self) -> &mut Vec<String>;

    /// Append `name` unless an equal name (ignoring case) is already present.
    fn add_var_name(&mut self, name: &str) {
        let names = self.var_names_mut();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            names.push(name.to_string());
        }
    }

    /// First resolved name, if any.
    fn display_name(&self) -> Option<&str> {
        self.var_names().first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnItem {
    pub item_index: i16,
    pub reward: u8,
    pub category: u16,
    pub category_index: u16,
    pub text_var_hash: u32,
    pub text_record_id1: u16,
    pub text_record_id2: u16,
    pub var_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnNpc {
    pub npc_index: i16,
    pub gender: u8,
    pub face_index: u8,
    pub unknown1: u16,
    pub faction_index: u16,
    pub text_var_hash: u32,
    pub text_record_id1: u16,
    pub text_record_id2: u16,
    pub var_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnLocation {
    pub location_index: u16,
    pub flags: u8,
    pub general_location: u8,
    pub fine_location: u16,
    pub location_type: i16,
    pub door_selector: i16,
    pub unknown2: u16,
    pub text_var_hash: u32,
    pub obj_ptr: u32,
    pub text_record_id1: u16,
    pub text_record_id2: u16,
    pub var_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnTimer {
    pub timer_index: i16,
    pub flags: u16,
    pub timer_type: u8,
    pub minimum: i32,
    pub maximum: i32,
    pub started: u32,
    pub duration: u32,
    pub link1: i32,
    pub link2: i32,
    pub text_var_hash: u32,
    pub var_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnMob {
    pub mob_index: u8,
    pub null1: u16,
    pub mob_type: u8,
    pub mob_count: u16,
    pub text_var_hash: u32,
    pub null2: u32,
    pub var_names: Vec<String>,
}

/// A quest state flag. Opcodes refer to states by position in
/// [`QuestBytecodeFile::states`], not by `flag_index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnState {
    pub flag_index: i16,
    pub is_global: u8,
    pub global_index: u8,
    pub text_var_hash: u32,
    pub var_names: Vec<String>,
}

/// An entry of the optional trailing text-variable table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnTextVariable {
    /// Name as stored (lowercase).
    pub name: String,
    pub section_id: u8,
    pub record_id: u16,
    pub record_ptr: u32,
    /// Hash of `name`.
    pub hash: u32,
    pub var_names: Vec<String>,
}

impl HashedName for QbnItem {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnNpc {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnLocation {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnTimer {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnMob {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnState {
    fn text_var_hash(&self) -> u32 {
        self.text_var_hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

impl HashedName for QbnTextVariable {
    fn text_var_hash(&self) -> u32 {
        self.hash
    }
    fn var_names(&self) -> &[String] {
        &self.var_names
    }
    fn var_names_mut(&mut self) -> &mut Vec<String> {
        &mut self.var_names
    }
}

/// One 15-byte operand slot of an opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubRecord {
    pub not_flag: u8,
    /// Legacy packed pointer: section in bits 8-15, record in the low byte.
    pub local_ptr: u32,
    /// Explicit section id; 0 defers to the section packed in `local_ptr`.
    pub section_id: u16,
    pub value: u32,
    pub object_ptr: u32,
}

impl SubRecord {
    pub fn is_negated(&self) -> bool {
        self.not_flag == 1
    }

    /// `value` is a literal rather than a reference.
    pub fn is_constant(&self) -> bool {
        self.section_id == 0 && self.local_ptr == CONSTANT_LOCAL_PTR
    }

    /// Section packed into `local_ptr`.
    pub fn local_section(&self) -> u16 {
        ((self.local_ptr >> 8) & 0xFF) as u16
    }

    /// Record packed into the low byte of `local_ptr`; `0xFF` means none.
    pub fn local_record(&self) -> Option<u8> {
        let record = (self.local_ptr & 0xFF) as u8;
        (record != 0xFF).then_some(record)
    }

    /// Explicit section id if set, else the packed one.
    pub fn effective_section(&self) -> u16 {
        if self.section_id != 0 {
            self.section_id
        } else {
            self.local_section()
        }
    }

    /// Referenced record index.
    ///
    /// `value` wins unless it is one of the sentinels `0xFFFFFFFF` or
    /// `0xFFFFFFFE`; then the packed `local_ptr` record byte is used.
    pub fn record_index(&self) -> Option<u32> {
        if self.value != 0xFFFF_FFFF && self.value != 0xFFFF_FFFE {
            return Some(self.value);
        }
        self.local_record().map(u32::from)
    }

    /// Whether this sub-record points at the state at `state_index`.
    pub fn references_state(&self, state_index: u16) -> bool {
        if self.effective_section() != STATE_SECTION_ID {
            return false;
        }
        match self.local_record() {
            Some(record) => u16::from(record) == state_index,
            None => self.value as u16 == state_index,
        }
    }
}

/// One 0x57-byte opcode record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QbnOpCode {
    pub op_code: u16,
    pub flags: u16,
    /// Declared number of valid sub-records, as stored.
    pub records: u16,
    pub sub_records: [SubRecord; SUB_RECORDS_PER_OPCODE],
    /// `0xFFFF` when the opcode has no message.
    pub message_id: u16,
    pub last_update: u32,
    /// Byte offset of this record in the file.
    pub file_offset: u32,
}

impl QbnOpCode {
    /// Declared sub-record count, clamped to five.
    pub fn record_count(&self) -> usize {
        usize::from(self.records).min(SUB_RECORDS_PER_OPCODE)
    }

    /// The meaningful sub-records.
    pub fn active_sub_records(&self) -> &[SubRecord] {
        &self.sub_records[..self.record_count()]
    }

    pub fn message(&self) -> Option<u16> {
        (self.message_id != super::NO_MESSAGE).then_some(self.message_id)
    }
}

/// A decoded quest bytecode file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuestBytecodeFile {
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
    #[serde(skip)]
    pub(crate) bytes: Vec<u8>,
    pub header: QbnHeader,
    pub items: Vec<QbnItem>,
    pub npcs: Vec<QbnNpc>,
    pub locations: Vec<QbnLocation>,
    pub timers: Vec<QbnTimer>,
    pub mobs: Vec<QbnMob>,
    pub states: Vec<QbnState>,
    pub opcodes: Vec<QbnOpCode>,
    pub text_variables: Vec<QbnTextVariable>,
    #[serde(skip)]
    pub(crate) item_by_index: HashMap<u16, usize>,
    #[serde(skip)]
    pub(crate) npc_by_index: HashMap<u16, usize>,
    #[serde(skip)]
    pub(crate) location_by_index: HashMap<u16, usize>,
    #[serde(skip)]
    pub(crate) timer_by_index: HashMap<u16, usize>,
    #[serde(skip)]
    pub(crate) mob_by_index: HashMap<u16, usize>,
}

impl QuestBytecodeFile {
    /// Read and decode a QBN file; see [`read_qbn`](super::read_qbn).
    ///
    /// # Errors
    /// Returns an error if the file can't be read or is shorter than the header.
    pub fn read<P: AsRef<Path>>(path: P, hashes: Option<&VarHashCatalog>) -> Result<Self> {
        super::read_qbn(path, hashes)
    }

    /// Raw file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Rebuild the `index → position` maps. Call after changing any of the
    /// item/npc/location/timer/mob vectors.
    pub fn rebuild_index_maps(&mut self) {
        self.item_by_index = index_map(self.items.iter().map(|r| r.item_index as u16));
        self.npc_by_index = index_map(self.npcs.iter().map(|r| r.npc_index as u16));
        self.location_by_index = index_map(self.locations.iter().map(|r| r.location_index));
        self.timer_by_index = index_map(self.timers.iter().map(|r| r.timer_index as u16));
        self.mob_by_index = index_map(self.mobs.iter().map(|r| u16::from(r.mob_index)));
    }

    pub fn find_item(&self, index: u16) -> Option<&QbnItem> {
        self.item_by_index.get(&index).and_then(|&i| self.items.get(i))
    }

    pub fn find_npc(&self, index: u16) -> Option<&QbnNpc> {
        self.npc_by_index.get(&index).and_then(|&i| self.npcs.get(i))
    }

    pub fn find_location(&self, index: u16) -> Option<&QbnLocation> {
        self.location_by_index.get(&index).and_then(|&i| self.locations.get(i))
    }

    pub fn find_timer(&self, index: u16) -> Option<&QbnTimer> {
        self.timer_by_index.get(&index).and_then(|&i| self.timers.get(i))
    }

    pub fn find_mob(&self, index: u16) -> Option<&QbnMob> {
        self.mob_by_index.get(&index).and_then(|&i| self.mobs.get(i))
    }

    /// State by position, which is the index opcodes use.
    pub fn state(&self, index: usize) -> Option<&QbnState> {
        self.states.get(index)
    }

    /// Opcodes with an active sub-record referencing the given state.
    pub fn opcodes_referencing_state(&self, state_index: u16) -> Vec<&QbnOpCode> {
        self.opcodes
            .iter()
            .filter(|op| {
                op.active_sub_records()
                    .iter()
                    .any(|s| s.references_state(state_index))
            })
            .collect()
    }
}

/// Later records with a duplicate index replace earlier ones.
fn index_map(indices: impl Iterator<Item = u16>) -> HashMap<u16, usize> {
    indices.enumerate().map(|(pos, index)| (index, pos)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(local_ptr: u32, section_id: u16, value: u32) -> SubRecord {
        SubRecord {
            not_flag: 0,
            local_ptr,
            section_id,
            value,
            object_ptr: 0,
        }
    }

    #[test]
    fn test_record_index_precedence() {
        assert_eq!(sub(0x0000_0903, 0, 5).record_index(), Some(5));
        assert_eq!(sub(0x0000_09FF, 0, 0xFFFF_FFFF).record_index(), None);
        assert_eq!(sub(0x0000_0907, 0, 0xFFFF_FFFF).record_index(), Some(7));
        assert_eq!(sub(0x0000_0907, 0, 0xFFFF_FFFE).record_index(), Some(7));
    }

    #[test]
    fn test_constant_pattern() {
        let s = sub(CONSTANT_LOCAL_PTR, 0, 0xDEAD_BEEF);
        assert!(s.is_constant());
        assert!(!sub(CONSTANT_LOCAL_PTR, 1, 0xDEAD_BEEF).is_constant());
    }

    #[test]
    fn test_effective_section() {
        assert_eq!(sub(0x0000_0903, 0, 0).effective_section(), 9);
        assert_eq!(sub(0x0000_0903, 2, 0).effective_section(), 2);
    }

    #[test]
    fn test_references_state() {
        assert!(sub(0x0000_0903, 0, 0xFFFF_FFFF).references_state(3));
        assert!(!sub(0x0000_0903, 0, 0xFFFF_FFFF).references_state(4));
        assert!(sub(0x0000_09FF, 0, 0x0001_0004).references_state(4));
        assert!(sub(0xFFFF_FFFF, 9, 2).references_state(2));
        assert!(!sub(0x0000_0103, 0, 3).references_state(3));
    }

    #[test]
    fn test_index_maps() {
        let mut qbn = QuestBytecodeFile {
            npcs: vec![
                QbnNpc {
                    npc_index: 4,
                    ..Default::default()
                },
                QbnNpc {
                    npc_index: 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert!(qbn.find_npc(1).is_none());
        qbn.rebuild_index_maps();
        assert_eq!(qbn.find_npc(1).map(|n| n.npc_index), Some(1));
        assert_eq!(qbn.find_npc(4).map(|n| n.npc_index), Some(4));
        assert!(qbn.find_npc(0).is_none());
    }

    #[test]
    fn test_add_var_name_dedups_ignoring_case() {
        let mut state = QbnState::default();
        state.add_var_name("done");
        state.add_var_name("DONE");
        state.add_var_name("finished");
        assert_eq!(state.var_names, ["done", "finished"]);
        assert_eq!(state.display_name(), Some("done"));
    }

    #[test]
    fn test_active_sub_records_clamped() {
        let op = QbnOpCode {
            records: 9,
            ..Default::default()
        };
        assert_eq!(op.record_count(), 5);
        assert_eq!(op.active_sub_records().len(), 5);
        assert_eq!(op.message(), Some(0));
    }
}
