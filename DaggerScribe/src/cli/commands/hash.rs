//! CLI command for computing text-variable hashes

use std::path::Path;

use crate::formats::common::var_hash;

use super::load_hashes;

/// Print the hash of each name, with catalog collisions if a catalog is given
pub fn execute(names: &[String], hashes: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load_hashes(hashes)?;

    for name in names {
        let bare = bare_name(name);
        let hash = var_hash(&bare);
        match catalog.as_ref().and_then(|c| c.names_for(hash)) {
            Some(known) => println!("0x{hash:08X} {bare}  (catalog: {})", known.join(", ")),
            None => println!("0x{hash:08X} {bare}"),
        }
    }
    Ok(())
}

/// Lowercased name without `%` prefix or `_` wrapping.
fn bare_name(name: &str) -> String {
    let name = name.strip_prefix('%').unwrap_or(name);
    let name = name
        .strip_prefix('_')
        .and_then(|n| n.strip_suffix('_'))
        .filter(|n| !n.is_empty())
        .unwrap_or(name);
    name.to_ascii_lowercase()
}
