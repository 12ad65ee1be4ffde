//! Text database header parsing
//!
//! The header is a `u16` length followed by `(id: u16, offset: u32)` slots and
//! a `0xFFFF` terminator slot whose offset marks the end of the text data.
//! Real files do not always agree with the slot count implied by the length,
//! so a forward scan for the terminator is kept as a fallback.

use std::path::Path;

use super::{HEADER_SLOT_SIZE, MAX_HEADER_ENTRIES, TERMINATOR_ID, TextDatabase, TextRecord};
use crate::error::{Error, Result};
use crate::formats::common::{ByteReader, find_child};

/// Main text database file name.
pub const TEXT_FILE_NAME: &str = "TEXT.RSC";

/// Game data subfolder of an install root.
pub const ARENA2_DIR_NAME: &str = "ARENA2";

/// Smallest buffer that can hold the length field plus one slot.
pub const MIN_FILE_SIZE: usize = 8;

/// One `(id, offset)` slot from the header list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub id: u16,
    pub offset: u32,
}

/// Parsed header: record slots plus the end-of-data offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHeader {
    pub header_len: u16,
    pub entries: Vec<HeaderEntry>,
    pub terminator_offset: u32,
    /// Whether the forward scan was needed to find the terminator.
    pub used_fallback: bool,
}

/// Read a text database (`TEXT.RSC` or a quest `.QRC`) from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any error of
/// [`parse_text_bytes`].
pub fn read_text_db<P: AsRef<Path>>(path: P) -> Result<TextDatabase> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let mut db = parse_text_bytes(data)?;
    db.source_path = Some(path.to_path_buf());
    Ok(db)
}

/// Locate and read `TEXT.RSC` in `root` or its `ARENA2` subfolder
///
/// Both names are matched ignoring ASCII case.
pub fn read_text_db_from_arena2_root<P: AsRef<Path>>(root: P) -> Result<TextDatabase> {
    let root = root.as_ref();
    let path = find_child(root, TEXT_FILE_NAME)
        .filter(|p| p.is_file())
        .or_else(|| {
            find_child(root, ARENA2_DIR_NAME)
                .filter(|d| d.is_dir())
                .and_then(|d| find_child(d, TEXT_FILE_NAME))
                .filter(|p| p.is_file())
        });
    let Some(path) = path else {
        return Err(Error::TextFileNotFound {
            path: root.to_path_buf(),
        });
    };
    read_text_db(path)
}

/// Parse a text database held in memory
///
/// Record spans are computed here; subrecords are split on first access.
///
/// # Errors
///
/// Returns [`Error::TooSmall`], [`Error::MalformedHeader`],
/// [`Error::OutOfRange`] or [`Error::UnsortedOffsets`] when the header list
/// cannot be trusted.
pub fn parse_text_bytes(data: Vec<u8>) -> Result<TextDatabase> {
    let header = parse_header(&data)?;
    let file_len = data.len() as u32;

    let records = header
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let end = header
                .entries
                .get(i + 1)
                .map_or(header.terminator_offset, |next| next.offset)
                .min(file_len);
            TextRecord::new(entry.id, entry.offset, end)
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        "Text database: {} records, headerLen={}, data ends at {:#x}",
        records.len(),
        header.header_len,
        header.terminator_offset
    );

    Ok(TextDatabase {
        source_path: None,
        bytes: data,
        records,
    })
}

/// Parse and validate the header slot list.
pub fn parse_header(file: &[u8]) -> Result<TextHeader> {
    if file.len() < MIN_FILE_SIZE {
        return Err(Error::TooSmall {
            kind: "text database",
            size: file.len(),
            minimum: MIN_FILE_SIZE,
        });
    }

    let r = ByteReader::new(file);
    let header_len = r.u16(0);
    if (header_len as usize) < HEADER_SLOT_SIZE {
        return Err(malformed(format!("headerLen {header_len} < {HEADER_SLOT_SIZE}")));
    }

    let slots = header_len as usize / HEADER_SLOT_SIZE;
    if slots < 2 {
        return Err(malformed(format!(
            "headerLen {header_len} too small for one record plus terminator"
        )));
    }

    let record_count = slots - 1;
    let base = 2;
    let term_pos = base + record_count * HEADER_SLOT_SIZE;

    let (entries, terminator, used_fallback) =
        if r.fits(term_pos, 2) && r.u16(term_pos) == TERMINATOR_ID {
            let entries = read_fixed_slots(&r, base, record_count);
            (entries, terminator_offset(&r, term_pos), false)
        } else {
            tracing::warn!(
                "Terminator not at slot {record_count} (headerLen={header_len}), scanning forward"
            );
            let (entries, terminator) = scan_slots(&r, base, header_len as usize);
            (entries, terminator, true)
        };

    if entries.is_empty() {
        return Err(malformed("header parse produced 0 records".to_string()));
    }

    let mut previous = 0u32;
    for (index, entry) in entries.iter().enumerate() {
        if entry.offset as usize >= file.len() {
            return Err(Error::OutOfRange {
                offset: u64::from(entry.offset),
                size: file.len(),
            });
        }
        if index > 0 && entry.offset < previous {
            return Err(Error::UnsortedOffsets {
                index,
                offset: entry.offset,
                previous,
            });
        }
        previous = entry.offset;
    }

    let file_len = file.len() as u32;
    let last = entries.last().map_or(0, |e| e.offset);
    let terminator_offset = match terminator {
        Some(off) if off != 0 && off <= file_len && off >= last => off,
        _ => file_len,
    };

    Ok(TextHeader {
        header_len,
        entries,
        terminator_offset,
        used_fallback,
    })
}

fn malformed(reason: String) -> Error {
    Error::MalformedHeader { reason }
}

/// Offset stored after a terminator id, if the slot is complete.
fn terminator_offset(r: &ByteReader<'_>, pos: usize) -> Option<u32> {
    r.fits(pos, HEADER_SLOT_SIZE).then(|| r.u32(pos + 2))
}

fn read_fixed_slots(r: &ByteReader<'_>, base: usize, count: usize) -> Vec<HeaderEntry> {
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let pos = base + i * HEADER_SLOT_SIZE;
        if !r.fits(pos, HEADER_SLOT_SIZE) {
            break;
        }
        let id = r.u16(pos);
        if id == TERMINATOR_ID {
            break;
        }
        entries.push(HeaderEntry {
            id,
            offset: r.u32(pos + 2),
        });
    }
    entries
}

/// Walk 6-byte slots until the terminator, within `headerLen + 64` bytes.
fn scan_slots(r: &ByteReader<'_>, base: usize, header_len: usize) -> (Vec<HeaderEntry>, Option<u32>) {
    let guard = r.len().min(base + header_len + 64);
    let mut entries = Vec::new();
    let mut pos = base;

    while pos + 2 <= guard {
        let id = r.u16(pos);
        if id == TERMINATOR_ID {
            return (entries, terminator_offset(r, pos));
        }
        if !r.fits(pos, HEADER_SLOT_SIZE) {
            break;
        }
        entries.push(HeaderEntry {
            id,
            offset: r.u32(pos + 2),
        });
        pos += HEADER_SLOT_SIZE;
        if entries.len() > MAX_HEADER_ENTRIES {
            tracing::warn!("Header scan hit the {MAX_HEADER_ENTRIES}-entry cap");
            break;
        }
    }
    (entries, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Header with the given slots, a terminator pointing at EOF, then `body`.
    fn build(ids_and_texts: &[(u16, &[u8])]) -> Vec<u8> {
        let header_len = ((ids_and_texts.len() + 1) * HEADER_SLOT_SIZE) as u16;
        let data_start = 2 + header_len as usize;
        let mut out = header_len.to_le_bytes().to_vec();
        let mut offset = data_start as u32;
        for (id, text) in ids_and_texts {
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&offset.to_le_bytes());
            offset += text.len() as u32;
        }
        out.extend_from_slice(&TERMINATOR_ID.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        for (_, text) in ids_and_texts {
            out.extend_from_slice(text);
        }
        out
    }

    #[test]
    fn test_primary_layout() {
        let data = build(&[(1, b"one\xFE"), (2, b"two\xFE")]);
        let header = parse_header(&data).unwrap();
        assert!(!header.used_fallback);
        assert_eq!(header.entries.len(), 2);
        assert_eq!(header.entries[0].offset, 20);
        assert_eq!(header.entries[1].offset, 24);
        assert_eq!(header.terminator_offset as usize, data.len());
    }

    #[test]
    fn test_header_len_too_small() {
        let mut data = build(&[(1, b"x\xFE")]);
        data[0] = 5;
        data[1] = 0;
        assert!(matches!(parse_header(&data), Err(Error::MalformedHeader { .. })));

        data[0] = 6;
        assert!(matches!(parse_header(&data), Err(Error::MalformedHeader { .. })));
    }

    #[test]
    fn test_too_small_file() {
        assert!(matches!(
            parse_header(&[12, 0, 1]),
            Err(Error::TooSmall { size: 3, .. })
        ));
    }

    #[test]
    fn test_fallback_scan_when_header_len_is_short() {
        // headerLen claims one slot too few; the terminator is found by scanning
        let mut data = build(&[(7, b"aa\xFE"), (8, b"bb\xFE"), (9, b"cc\xFE")]);
        data[0] = 18;
        let header = parse_header(&data).unwrap();
        assert!(header.used_fallback);
        let ids: Vec<u16> = header.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_unsorted_offsets() {
        let mut data = build(&[(1, b"aa\xFE"), (2, b"bb\xFE")]);
        // Swap the two record offsets
        let first: [u8; 4] = data[4..8].try_into().unwrap();
        let second: [u8; 4] = data[10..14].try_into().unwrap();
        data[4..8].copy_from_slice(&second);
        data[10..14].copy_from_slice(&first);
        assert!(matches!(
            parse_header(&data),
            Err(Error::UnsortedOffsets { index: 1, .. })
        ));
    }

    #[test]
    fn test_out_of_range_offset() {
        let mut data = build(&[(1, b"aa\xFE")]);
        data[4..8].copy_from_slice(&0x1000u32.to_le_bytes());
        assert!(matches!(parse_header(&data), Err(Error::OutOfRange { offset: 0x1000, .. })));
    }

    #[test]
    fn test_bogus_terminator_clamped() {
        let mut data = build(&[(1, b"aa\xFE")]);
        // Terminator slot starts at 8; its offset field at 10
        data[10..14].copy_from_slice(&0u32.to_le_bytes());
        let header = parse_header(&data).unwrap();
        assert_eq!(header.terminator_offset as usize, data.len());
    }

    #[test]
    fn test_terminator_past_end_clamped() {
        let mut data = build(&[(1, b"aa\xFE"), (2, b"bb\xFE")]);
        // Terminator slot starts at 14; its offset field at 16
        data[16..20].copy_from_slice(&0x1_0000u32.to_le_bytes());
        let header = parse_header(&data).unwrap();
        assert_eq!(header.terminator_offset as usize, data.len());
    }

    #[test]
    fn test_terminator_before_last_record_clamped() {
        let mut data = build(&[(1, b"aa\xFE"), (2, b"bb\xFE")]);
        assert_eq!(u32::from_le_bytes(data[10..14].try_into().unwrap()), 23);
        data[16..20].copy_from_slice(&21u32.to_le_bytes());
        let len = data.len() as u32;

        let header = parse_header(&data).unwrap();
        assert_eq!(header.terminator_offset, len);

        let db = parse_text_bytes(data).unwrap();
        assert_eq!(db.records()[1].start, 23);
        assert_eq!(db.records()[1].end, len);
    }

    #[test]
    fn test_fallback_scan_bounded_by_header_len() {
        // Largest possible headerLen with no terminator anywhere: the scan stops
        // at headerLen + 64 bytes, well inside the entry cap
        let file_len = 70_000;
        let mut data = Vec::with_capacity(file_len);
        data.extend_from_slice(&u16::MAX.to_le_bytes());
        while data.len() + HEADER_SLOT_SIZE <= 66_000 {
            data.extend_from_slice(&1u16.to_le_bytes());
            data.extend_from_slice(&69_000u32.to_le_bytes());
        }
        data.resize(file_len, b'x');

        let header = parse_header(&data).unwrap();
        assert!(header.used_fallback);
        // Slots at 2 + 6k with 2 + 6k + 2 <= 2 + 0xFFFF + 64
        assert_eq!(header.entries.len(), 10_933);
        assert!(header.entries.len() < MAX_HEADER_ENTRIES);
        assert_eq!(header.terminator_offset as usize, file_len);
    }

    #[test]
    fn test_lowercase_install_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("arena2")).unwrap();
        std::fs::write(dir.path().join("arena2").join("text.rsc"), build(&[(5, b"hi\xFE")])).unwrap();

        let db = read_text_db_from_arena2_root(dir.path()).unwrap();
        assert_eq!(db.source_path, Some(dir.path().join("arena2").join("text.rsc")));
        assert_eq!(db.records()[0].record_id, 5);
    }
}
