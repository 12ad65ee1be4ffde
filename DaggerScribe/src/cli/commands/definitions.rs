//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a QBN quest file and disassemble its opcodes
    Qbn {
        /// QBN file
        path: PathBuf,

        /// Text-variable hash catalog (`0x<hash> <name>` lines)
        #[arg(long)]
        hashes: Option<PathBuf>,

        /// Quest text database for message previews (defaults to the sibling .QRC)
        #[arg(long)]
        text: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect a text database (TEXT.RSC or a quest .QRC)
    Text {
        /// Text database file
        path: PathBuf,

        /// Show one record (decimal or 0x-prefixed hex id)
        #[arg(long, value_parser = parse_record_id)]
        id: Option<u16>,

        /// Show the rich rendering with control-code markup
        #[arg(long)]
        rich: bool,

        /// Record-id label catalog
        #[arg(long)]
        indices: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the quests of a game data folder
    Quests {
        /// Folder holding the QBN/QRC files (or its parent with an ARENA2 subfolder)
        folder: PathBuf,

        /// Text-variable hash catalog
        #[arg(long)]
        hashes: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the text-variable hash of each name
    Hash {
        /// Variable names (`%` and surrounding `_` are ignored)
        #[arg(required = true)]
        names: Vec<String>,

        /// Also list the catalog names sharing each hash
        #[arg(long)]
        hashes: Option<PathBuf>,
    },
}

/// Parse a record id given as decimal or `0x` hex.
pub fn parse_record_id(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("Invalid record id '{s}': {e}"))
}
