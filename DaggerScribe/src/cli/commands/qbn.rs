//! CLI command for decoding and disassembling QBN files

use std::path::Path;

use crate::disasm::disassemble_all;
use crate::formats::qbn::{HashedName, QuestBytecodeFile, read_qbn};
use crate::formats::text::TextDatabase;
use crate::quest::paired_text_path;

use super::{load_hashes, truncate_text};

/// Decode a QBN file and print its header, sections and disassembly
pub fn execute(path: &Path, hashes: Option<&Path>, text: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let hashes = load_hashes(hashes)?;
    let qbn = read_qbn(path, hashes.as_ref())?;
    let text = load_text(path, text)?;
    let lines = disassemble_all(&qbn, text.as_ref());

    if json {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "quest": qbn,
            "disassembly": lines,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let h = &qbn.header;
    println!("Quest: {} (id {}, faction {})", h.resource_filename, h.quest_id, h.faction_id);
    println!("Resource id: {}  Debug info: {}", h.resource_id, h.has_debug_info);
    println!(
        "Sections: {} items, {} NPCs, {} locations, {} timers, {} mobs, {} states, {} opcodes, {} text variables",
        qbn.items.len(),
        qbn.npcs.len(),
        qbn.locations.len(),
        qbn.timers.len(),
        qbn.mobs.len(),
        qbn.states.len(),
        qbn.opcodes.len(),
        qbn.text_variables.len()
    );

    print_states(&qbn);

    println!();
    println!("Opcodes:");
    for (op, line) in qbn.opcodes.iter().zip(&lines) {
        println!("  {:06X}  {}", op.file_offset, truncate_text(&line.summary, 160));
        if line.operands.len() > 1 {
            println!("          operands: {}", line.operands[1..].join(", "));
        }
    }

    Ok(())
}

fn print_states(qbn: &QuestBytecodeFile) {
    if qbn.states.is_empty() {
        return;
    }
    println!();
    println!("States:");
    for (i, state) in qbn.states.iter().enumerate() {
        let name = state.display_name().unwrap_or("-");
        let global = if state.is_global != 0 {
            format!(" global={}", state.global_index)
        } else {
            String::new()
        };
        println!("  [{i:3}] flag={:<4} {name}{global}", state.flag_index);
    }
}

/// The explicit text database, else the `.QRC` paired with the QBN if present.
fn load_text(qbn_path: &Path, explicit: Option<&Path>) -> anyhow::Result<Option<TextDatabase>> {
    if let Some(path) = explicit {
        return Ok(Some(TextDatabase::read(path)?));
    }
    let paired = paired_text_path(qbn_path);
    if !paired.is_file() {
        return Ok(None);
    }
    match TextDatabase::read(&paired) {
        Ok(db) => Ok(Some(db)),
        Err(e) => {
            tracing::warn!("Ignoring {}: {e}", paired.display());
            Ok(None)
        }
    }
}
