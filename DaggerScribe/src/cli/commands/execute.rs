//! Command execution implementations

use super::Commands;
use super::{hash, qbn, quests, text};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Qbn {
                path,
                hashes,
                text,
                json,
            } => qbn::execute(path, hashes.as_deref(), text.as_deref(), *json),
            Commands::Text {
                path,
                id,
                rich,
                indices,
                json,
            } => match id {
                Some(id) => text::show(path, *id, *rich, indices.as_deref(), *json),
                None => text::list(path, indices.as_deref(), *json),
            },
            Commands::Quests {
                folder,
                hashes,
                json,
                quiet,
            } => quests::execute(folder, hashes.as_deref(), *json, !*quiet),
            Commands::Hash { names, hashes } => hash::execute(names, hashes.as_deref()),
        }
    }
}
