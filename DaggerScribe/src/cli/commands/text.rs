//! CLI commands for text database inspection

use std::path::Path;

use crate::formats::text::TextDatabase;

use super::{load_indices, truncate_text};

/// List every record with its span, label and a preview
pub fn list(path: &Path, indices: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let db = TextDatabase::read(path)?;
    let indices = load_indices(indices)?;
    let label = |id: u16| indices.as_ref().and_then(|c| c.label_for(id));

    if json {
        let records: Vec<_> = db
            .records()
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.record_id,
                    "start": r.start,
                    "end": r.end,
                    "label": label(r.record_id),
                    "subrecords": db.subrecords_of(r).len(),
                    "book": db.looks_like_book(r.record_id, label(r.record_id)),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{} records in {}", db.len(), path.display());
    for record in db.records() {
        let preview = db.first_plain(record.record_id).unwrap_or_default();
        let label = label(record.record_id).unwrap_or("");
        println!(
            "  {:04X} ({:5})  {:>7}..{:<7}  {:<24}  {}",
            record.record_id,
            record.record_id,
            record.start,
            record.end,
            truncate_text(label, 24),
            truncate_text(preview, 60)
        );
    }
    Ok(())
}

/// Show one record's subrecords and inline variables
pub fn show(path: &Path, id: u16, rich: bool, indices: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let db = TextDatabase::read(path)?;
    let indices = load_indices(indices)?;
    let label = indices.as_ref().and_then(|c| c.label_for(id));
    let subrecords = db
        .subrecords(id)
        .ok_or_else(|| anyhow::anyhow!("Record 0x{id:04X} not found in {}", path.display()))?;

    if json {
        let tokens: Vec<_> = subrecords.iter().map(|s| s.tokens()).collect();
        let output = serde_json::json!({
            "id": id,
            "label": label,
            "book": db.looks_like_book(id, label),
            "subrecords": tokens,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Record 0x{id:04X} ({id}){}", label.map(|l| format!(" [{l}]")).unwrap_or_default());
    if db.looks_like_book(id, label) {
        println!("Looks like a book");
    }
    for (i, sub) in subrecords.iter().enumerate() {
        let tokens = sub.tokens();
        println!();
        println!("--- Subrecord {i} ({} bytes) ---", sub.raw().len());
        println!("{}", if rich { &tokens.rich } else { &tokens.plain });
        for var in &tokens.vars {
            println!("  var {:<16} hash=0x{:08X} at {}", var.token, var.hash, var.plain_offset);
        }
    }
    Ok(())
}
