//! CLI command for listing a folder's quests

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{LOOKING_GLASS, SCROLL, print_done, print_step, simple_bar};
use crate::error::Error;
use crate::quest::QuestCatalog;

use super::{load_hashes, truncate_text};

/// Load the quest catalog and print one line per quest
pub fn execute(folder: &Path, hashes: Option<&Path>, json: bool, show_progress: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let show_progress = show_progress && !json;
    let hashes = load_hashes(hashes)?;

    if show_progress {
        print_step(1, 2, LOOKING_GLASS, "Decoding quest files...");
    }
    let bar = show_progress.then(|| simple_bar(0, "Decoding"));
    let mut catalog = QuestCatalog::load_with_progress(folder, hashes.as_ref(), |p| {
        if let Some(bar) = &bar {
            bar.set_length(p.total as u64);
            bar.set_position(p.current as u64);
        }
    })?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if show_progress {
        print_step(2, 2, SCROLL, "Reading quest text...");
    }
    for index in 0..catalog.len() {
        match catalog.ensure_text_loaded(index).map(|_| ()) {
            Ok(_) | Err(Error::MissingQuestText { .. }) => {}
            Err(e) => tracing::warn!("{}: {e}", catalog.quests[index].base_name),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.quests)?);
        return Ok(());
    }

    println!("{} quests in {}", catalog.len(), catalog.root.display());
    for quest in &catalog.quests {
        let meta = &quest.filename;
        let status = if quest.is_decoded() { " " } else { "!" };
        println!(
            "{status} {:<10} {:<22} {:<10} {:<9} rep {:>3}  {}",
            quest.base_name,
            truncate_text(meta.guild_name.unwrap_or("-"), 22),
            meta.membership_name.unwrap_or("-"),
            meta.delivery_name.unwrap_or("-"),
            meta.min_reputation.map_or_else(|| "-".to_string(), |r| r.to_string()),
            truncate_text(quest.title(), 70)
        );
    }

    if show_progress {
        print_done(started.elapsed());
    }
    Ok(())
}
