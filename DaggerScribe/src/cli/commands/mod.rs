//! CLI subcommands

mod definitions;
mod execute;

pub mod hash;
pub mod qbn;
pub mod quests;
pub mod text;

pub use definitions::{Commands, parse_record_id};

use std::path::Path;

use crate::catalog::{IndexCatalog, VarHashCatalog};

/// Truncate text for display
pub(crate) fn truncate_text(text: &str, max_len: usize) -> String {
    let text = text.replace('\n', "\\n");
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        text
    }
}

pub(crate) fn load_hashes(path: Option<&Path>) -> anyhow::Result<Option<VarHashCatalog>> {
    Ok(path.map(VarHashCatalog::load).transpose()?)
}

pub(crate) fn load_indices(path: Option<&Path>) -> anyhow::Result<Option<IndexCatalog>> {
    Ok(path.map(IndexCatalog::load).transpose()?)
}
