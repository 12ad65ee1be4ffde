//! Opcode type table

use serde::Serialize;

/// Name and operand-count hint of a known opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpCodeType {
    pub code: u16,
    pub name: &'static str,
    /// Expected sub-record count, as documented (e.g. `"2 or 5"`).
    pub arity: &'static str,
}

impl OpCodeType {
    const fn new(code: u16, name: &'static str, arity: &'static str) -> Self {
        Self { code, name, arity }
    }
}

/// Known opcodes, sorted by code.
pub static OPCODE_TYPES: &[OpCodeType] = &[
    OpCodeType::new(0x00, "Item & Location", "3"),
    OpCodeType::new(0x01, "Item & NPC", "3"),
    OpCodeType::new(0x02, "Check Kill Count", "3"),
    OpCodeType::new(0x03, "PC finds Item", "2"),
    OpCodeType::new(0x04, "Items", "5"),
    OpCodeType::new(0x05, "unknown", "3"),
    OpCodeType::new(0x06, "States", "1"),
    OpCodeType::new(0x07, "States", "2 or 5"),
    OpCodeType::new(0x08, "Quest", "3"),
    OpCodeType::new(0x09, "Repeating Spawn", "5"),
    OpCodeType::new(0x0A, "Add Topics", "4"),
    OpCodeType::new(0x0B, "Remove Topics", "4"),
    OpCodeType::new(0x0C, "Start timer", "2"),
    OpCodeType::new(0x0D, "Stop timer", "2"),
    OpCodeType::new(0x11, "Locations", "4"),
    OpCodeType::new(0x13, "Add Location to Map", "2"),
    OpCodeType::new(0x15, "Mob hurt by PC", "2"),
    OpCodeType::new(0x16, "Place Mob at Location", "3"),
    OpCodeType::new(0x17, "Create Log Entry", "3"),
    OpCodeType::new(0x18, "Remove Log", "2"),
    OpCodeType::new(0x1A, "Give Item to NPC", "3"),
    OpCodeType::new(0x1B, "Add Global Map", "4"),
    OpCodeType::new(0x1C, "PC meets NPC", "2"),
    OpCodeType::new(0x1D, "Yes/No Question", "4"),
    OpCodeType::new(0x1E, "NPC, Location", "3"),
    OpCodeType::new(0x1F, "Daily Clock", "3"),
    OpCodeType::new(0x22, "Random State", "5"),
    OpCodeType::new(0x23, "Cycle state", "5"),
    OpCodeType::new(0x24, "Give Item to PC", "2"),
    OpCodeType::new(0x25, "Item", "4"),
    OpCodeType::new(0x26, "Rumors", "2"),
    OpCodeType::new(0x27, "Item and Mob", "3"),
    OpCodeType::new(0x2B, "PC at Location", "3"),
    OpCodeType::new(0x2C, "Delete NPC", "2"),
    OpCodeType::new(0x2E, "Hide NPC", "2"),
    OpCodeType::new(0x30, "Show NPC", "2"),
    OpCodeType::new(0x31, "Cure disease", "2"),
    OpCodeType::new(0x32, "Play movie", "2"),
    OpCodeType::new(0x33, "Display Message", "1"),
    OpCodeType::new(0x34, "AND States", "5"),
    OpCodeType::new(0x35, "OR States", "5"),
    OpCodeType::new(0x36, "Make Item ordinary", "2"),
    OpCodeType::new(0x37, "Escort NPC", "2"),
    OpCodeType::new(0x38, "End Escort NPC", "2"),
    OpCodeType::new(0x39, "Use Item", "3"),
    OpCodeType::new(0x3A, "Cure Vampirism", "1"),
    OpCodeType::new(0x3B, "Cure Lycanthropy", "1"),
    OpCodeType::new(0x3C, "Play Sound", "2"),
    OpCodeType::new(0x3D, "Reputation", "3"),
    OpCodeType::new(0x3E, "Weather Override", "3"),
    OpCodeType::new(0x3F, "Unknown", "2"),
    OpCodeType::new(0x40, "Unknown", "2"),
    OpCodeType::new(0x41, "Legal Reputation", "2"),
    OpCodeType::new(0x44, "Mob", "3"),
    OpCodeType::new(0x45, "Mob", "3"),
    OpCodeType::new(0x46, "PC has Items", "5"),
    OpCodeType::new(0x47, "Take PC Gold", "4"),
    OpCodeType::new(0x48, "Unknown", "2"),
    OpCodeType::new(0x49, "PC casts Spell", "3"),
    OpCodeType::new(0x4C, "Give Item to PC", "2"),
    OpCodeType::new(0x4D, "Check Player Level", "2"),
    OpCodeType::new(0x4E, "Unknown", "2"),
    OpCodeType::new(0x51, "Locations, NPC", "3"),
    OpCodeType::new(0x52, "Stop NPC talk", "3"),
    OpCodeType::new(0x53, "Location", "4"),
    OpCodeType::new(0x54, "Play Sound", "4"),
    OpCodeType::new(0x55, "Choose Questor", "4"),
    OpCodeType::new(0x56, "End Questor", "4"),
    OpCodeType::new(0x57, "Unknown", "5"),
];

/// Look up an opcode by code.
pub fn lookup_opcode_type(code: u16) -> Option<&'static OpCodeType> {
    OPCODE_TYPES
        .binary_search_by_key(&code, |t| t.code)
        .ok()
        .and_then(|i| OPCODE_TYPES.get(i))
}

/// Display name of an opcode; unknown codes render as `Type 0xNNNN`.
pub fn opcode_type_name(code: u16) -> String {
    match lookup_opcode_type(code) {
        Some(t) => t.name.to_string(),
        None => format!("Type 0x{code:04X}"),
    }
}
