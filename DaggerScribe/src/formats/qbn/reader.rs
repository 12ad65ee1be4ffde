//! QBN decoder

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{
    HEADER_SIZE, HashedName, ITEM_RECORD_SIZE, LOCATION_RECORD_SIZE, MAX_TEXT_VARIABLES, MOB_RECORD_SIZE,
    NPC_RECORD_SIZE, OPCODE_RECORD_SIZE, QbnHeader, QbnItem, QbnLocation, QbnMob, QbnNpc, QbnOpCode, QbnState,
    QbnTextVariable, QbnTimer, QuestBytecodeFile, SECTION_COUNT, SECTION_ITEMS, SECTION_LOCATIONS, SECTION_MOBS,
    SECTION_NPCS, SECTION_OFFSET_COUNT, SECTION_OPCODES, SECTION_STATES, SECTION_TEXT_VARIABLES, SECTION_TIMERS,
    STATE_RECORD_SIZE, SUB_RECORD_SIZE, SubRecord, TEXT_VARIABLE_NAME_LEN, TEXT_VARIABLE_RECORD_SIZE,
    TIMER_RECORD_SIZE,
};
use crate::catalog::VarHashCatalog;
use crate::error::{Error, Result};
use crate::formats::common::{ByteReader, var_hash};

/// Read and decode a QBN file
///
/// # Errors
/// Returns an error if the file can't be read or is shorter than the header.
pub fn read_qbn<P: AsRef<Path>>(path: P, hashes: Option<&VarHashCatalog>) -> Result<QuestBytecodeFile> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let mut qbn = parse_qbn_bytes(data, hashes)?;
    qbn.source_path = Some(path.to_path_buf());
    Ok(qbn)
}

/// Decode QBN bytes
///
/// Only a buffer shorter than the 60-byte header fails; damaged sections
/// come back empty or clamped.
///
/// # Errors
/// Returns [`Error::TooSmall`] if the buffer can't hold the header.
pub fn parse_qbn_bytes(data: Vec<u8>, hashes: Option<&VarHashCatalog>) -> Result<QuestBytecodeFile> {
    if data.len() < HEADER_SIZE {
        return Err(Error::TooSmall {
            kind: "QBN",
            size: data.len(),
            minimum: HEADER_SIZE,
        });
    }

    let r = ByteReader::new(&data);
    let header = read_header(&r);
    tracing::debug!(
        "QBN quest {} ({}), counts {:?}",
        header.quest_id,
        header.resource_filename,
        header.section_record_count
    );

    let mut qbn = QuestBytecodeFile {
        opcodes: read_section(&r, &header, SECTION_OPCODES, OPCODE_RECORD_SIZE, read_opcode),
        states: read_section(&r, &header, SECTION_STATES, STATE_RECORD_SIZE, read_state),
        items: read_section(&r, &header, SECTION_ITEMS, ITEM_RECORD_SIZE, read_item),
        npcs: read_section(&r, &header, SECTION_NPCS, NPC_RECORD_SIZE, read_npc),
        locations: read_section(&r, &header, SECTION_LOCATIONS, LOCATION_RECORD_SIZE, read_location),
        timers: read_section(&r, &header, SECTION_TIMERS, TIMER_RECORD_SIZE, read_timer),
        mobs: read_section(&r, &header, SECTION_MOBS, MOB_RECORD_SIZE, read_mob),
        text_variables: read_text_variables(&r, &header),
        header,
        ..Default::default()
    };
    qbn.bytes = data;

    enrich_names(&mut qbn, hashes);
    qbn.rebuild_index_maps();
    Ok(qbn)
}

fn read_header(r: &ByteReader<'_>) -> QbnHeader {
    let mut section_record_count = [0u16; SECTION_COUNT];
    for (i, count) in section_record_count.iter_mut().enumerate() {
        *count = r.u16(16 + i * 2);
    }
    let mut section_offset = [0u16; SECTION_OFFSET_COUNT];
    for (i, offset) in section_offset.iter_mut().enumerate() {
        *offset = r.u16(36 + i * 2);
    }
    QbnHeader {
        quest_id: r.u16(0),
        faction_id: r.u16(2),
        resource_id: r.u16(4),
        resource_filename: r.fixed_str(6, 9),
        has_debug_info: r.u8(15),
        section_record_count,
        section_offset,
    }
}

/// Byte offset and record count of a section, clamped to the buffer.
fn section_bounds(header: &QbnHeader, section: usize, record_size: usize, file_size: usize) -> Option<(usize, usize)> {
    let declared = usize::from(*header.section_record_count.get(section)?);
    let offset = usize::from(*header.section_offset.get(section)?);
    if declared == 0 || offset == 0 || offset >= file_size {
        return None;
    }

    let available = (file_size - offset) / record_size;
    if available == 0 {
        tracing::warn!("Section {section} at {offset:#x} has no room for a record, skipping");
        return None;
    }
    if declared > available {
        tracing::warn!("Section {section} declares {declared} records, only {available} fit; clamping");
    }
    Some((offset, declared.min(available)))
}

fn read_section<T>(
    r: &ByteReader<'_>,
    header: &QbnHeader,
    section: usize,
    record_size: usize,
    read: fn(&ByteReader<'_>, usize) -> T,
) -> Vec<T> {
    let Some((offset, count)) = section_bounds(header, section, record_size, r.len()) else {
        return Vec::new();
    };
    tracing::debug!("Section {section}: {count} records at {offset:#x}");
    (0..count).map(|i| read(r, offset + i * record_size)).collect()
}

fn read_opcode(r: &ByteReader<'_>, o: usize) -> QbnOpCode {
    let mut sub_records = [SubRecord::default(); 5];
    for (i, sub) in sub_records.iter_mut().enumerate() {
        let s = o + 6 + i * SUB_RECORD_SIZE;
        *sub = SubRecord {
            not_flag: r.u8(s),
            local_ptr: r.u32(s + 1),
            section_id: r.u16(s + 5),
            value: r.u32(s + 7),
            object_ptr: r.u32(s + 11),
        };
    }
    QbnOpCode {
        op_code: r.u16(o),
        flags: r.u16(o + 2),
        records: r.u16(o + 4),
        sub_records,
        message_id: r.u16(o + 81),
        last_update: r.u32(o + 83),
        file_offset: o as u32,
    }
}

fn read_state(r: &ByteReader<'_>, o: usize) -> QbnState {
    QbnState {
        flag_index: r.i16(o),
        is_global: r.u8(o + 2),
        global_index: r.u8(o + 3),
        text_var_hash: r.u32(o + 4),
        var_names: Vec::new(),
    }
}

fn read_item(r: &ByteReader<'_>, o: usize) -> QbnItem {
    QbnItem {
        item_index: r.i16(o),
        reward: r.u8(o + 2),
        category: r.u16(o + 3),
        category_index: r.u16(o + 5),
        text_var_hash: r.u32(o + 7),
        text_record_id1: r.u16(o + 15),
        text_record_id2: r.u16(o + 17),
        var_names: Vec::new(),
    }
}

fn read_npc(r: &ByteReader<'_>, o: usize) -> QbnNpc {
    QbnNpc {
        npc_index: r.i16(o),
        gender: r.u8(o + 2),
        face_index: r.u8(o + 3),
        unknown1: r.u16(o + 4),
        faction_index: r.u16(o + 6),
        text_var_hash: r.u32(o + 8),
        text_record_id1: r.u16(o + 16),
        text_record_id2: r.u16(o + 18),
        var_names: Vec::new(),
    }
}

fn read_location(r: &ByteReader<'_>, o: usize) -> QbnLocation {
    QbnLocation {
        location_index: r.u16(o),
        flags: r.u8(o + 2),
        general_location: r.u8(o + 3),
        fine_location: r.u16(o + 4),
        location_type: r.i16(o + 6),
        door_selector: r.i16(o + 8),
        unknown2: r.u16(o + 10),
        text_var_hash: r.u32(o + 12),
        obj_ptr: r.u32(o + 16),
        text_record_id1: r.u16(o + 20),
        text_record_id2: r.u16(o + 22),
        var_names: Vec::new(),
    }
}

fn read_timer(r: &ByteReader<'_>, o: usize) -> QbnTimer {
    QbnTimer {
        timer_index: r.i16(o),
        flags: r.u16(o + 2),
        timer_type: r.u8(o + 4),
        minimum: r.i32(o + 5),
        maximum: r.i32(o + 9),
        started: r.u32(o + 13),
        duration: r.u32(o + 17),
        link1: r.i32(o + 21),
        link2: r.i32(o + 25),
        text_var_hash: r.u32(o + 29),
        var_names: Vec::new(),
    }
}

fn read_mob(r: &ByteReader<'_>, o: usize) -> QbnMob {
    QbnMob {
        mob_index: r.u8(o),
        null1: r.u16(o + 1),
        mob_type: r.u8(o + 3),
        mob_count: r.u16(o + 4),
        text_var_hash: r.u32(o + 6),
        null2: r.u32(o + 10),
        var_names: Vec::new(),
    }
}

/// The text-variable table has no count: entries run until an empty name
/// or the end of the file.
fn read_text_variables(r: &ByteReader<'_>, header: &QbnHeader) -> Vec<QbnTextVariable> {
    let start = usize::from(header.section_offset[SECTION_TEXT_VARIABLES]);
    if start == 0 || start >= r.len() {
        return Vec::new();
    }

    let mut vars = Vec::new();
    let mut o = start;
    while r.fits(o, TEXT_VARIABLE_RECORD_SIZE) {
        if vars.len() == MAX_TEXT_VARIABLES {
            tracing::warn!("Text variable table at {start:#x} exceeds {MAX_TEXT_VARIABLES} entries, truncating");
            break;
        }
        let name = r.fixed_str(o, TEXT_VARIABLE_NAME_LEN);
        if name.is_empty() {
            break;
        }
        vars.push(QbnTextVariable {
            hash: var_hash(&name),
            name,
            section_id: r.u8(o + 20),
            record_id: r.u16(o + 21),
            record_ptr: r.u32(o + 23),
            var_names: Vec::new(),
        });
        o += TEXT_VARIABLE_RECORD_SIZE;
    }
    tracing::debug!("Text variables: {} entries at {start:#x}", vars.len());
    vars
}

/// Attach names to every hashed record: catalog candidates first, then the
/// quest's own text-variable table. Names are only ever appended.
fn enrich_names(qbn: &mut QuestBytecodeFile, hashes: Option<&VarHashCatalog>) {
    let local: HashMap<u32, String> = qbn
        .text_variables
        .iter()
        .map(|tv| (tv.hash, tv.name.clone()))
        .collect();

    let enrich = |record: &mut dyn HashedName| {
        let hash = record.text_var_hash();
        if let Some(names) = hashes.and_then(|h| h.names_for(hash)) {
            for name in names {
                record.add_var_name(name);
            }
        }
        if let Some(name) = local.get(&hash) {
            record.add_var_name(name);
        }
    };

    qbn.states.iter_mut().for_each(|r| enrich(r));
    qbn.items.iter_mut().for_each(|r| enrich(r));
    qbn.npcs.iter_mut().for_each(|r| enrich(r));
    qbn.locations.iter_mut().for_each(|r| enrich(r));
    qbn.timers.iter_mut().for_each(|r| enrich(r));
    qbn.mobs.iter_mut().for_each(|r| enrich(r));

    if let Some(hashes) = hashes {
        for tv in &mut qbn.text_variables {
            if let Some(names) = hashes.names_for(tv.hash) {
                for name in names {
                    tv.add_var_name(name);
                }
            }
        }
    }
}
