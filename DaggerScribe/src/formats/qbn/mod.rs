//! Quest bytecode (`.QBN`) format
//!
//! A QBN file is a fixed 60-byte header followed by typed sections of
//! fixed-size records. The header stores a record count (sections 0-9) and a
//! byte offset (sections 0-10) per section index; section 10 is the optional
//! text-variable table, which runs until an empty name or end of file.
//!
//! Section problems never fail a load: a section with no records, a zero or
//! out-of-file offset is treated as absent, and a count that would run past
//! the end of the file is clamped.

mod document;
mod reader;

pub use document::{
    HashedName, QbnHeader, QbnItem, QbnLocation, QbnMob, QbnNpc, QbnOpCode, QbnState, QbnTextVariable,
    QbnTimer, QuestBytecodeFile, SubRecord,
};
pub use reader::{parse_qbn_bytes, read_qbn};

/// Fixed header size in bytes.
pub const HEADER_SIZE: usize = 60;

/// Number of sections with a record count in the header.
pub const SECTION_COUNT: usize = 10;

/// Number of section offsets in the header (includes the text-variable table).
pub const SECTION_OFFSET_COUNT: usize = 11;

// Section indices as stored in the header
pub const SECTION_ITEMS: usize = 0;
pub const SECTION_NPCS: usize = 3;
pub const SECTION_LOCATIONS: usize = 4;
pub const SECTION_TIMERS: usize = 6;
pub const SECTION_MOBS: usize = 7;
pub const SECTION_OPCODES: usize = 8;
pub const SECTION_STATES: usize = 9;
pub const SECTION_TEXT_VARIABLES: usize = 10;

// Record sizes in bytes
pub const ITEM_RECORD_SIZE: usize = 0x13;
pub const NPC_RECORD_SIZE: usize = 0x14;
pub const LOCATION_RECORD_SIZE: usize = 0x18;
pub const TIMER_RECORD_SIZE: usize = 0x21;
pub const MOB_RECORD_SIZE: usize = 0x0E;
pub const STATE_RECORD_SIZE: usize = 0x08;
pub const OPCODE_RECORD_SIZE: usize = 0x57;
pub const TEXT_VARIABLE_RECORD_SIZE: usize = 0x1B;

/// Size of one opcode sub-record.
pub const SUB_RECORD_SIZE: usize = 15;

/// Sub-records per opcode.
pub const SUB_RECORDS_PER_OPCODE: usize = 5;

/// Longest text-variable name.
pub const TEXT_VARIABLE_NAME_LEN: usize = 20;

/// Corruption guard for the text-variable table scan.
pub const MAX_TEXT_VARIABLES: usize = 4096;

/// Sub-record section id of the State section.
pub const STATE_SECTION_ID: u16 = 9;

/// `local_ptr` marking a sub-record whose `value` is a literal.
pub const CONSTANT_LOCAL_PTR: u32 = 0x1234_5678;

/// Opcode message id meaning "no message".
pub const NO_MESSAGE: u16 = 0xFFFF;
