//! Text-variable hash catalog
//!
//! Maps a 32-bit text-variable hash to the names known to produce it. The
//! source is a loosely structured text export: any line holding `0x` plus
//! eight hex digits followed by a name token contributes one entry.
//! Collisions are expected and all candidates are kept.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::common::var_hash;

/// Hash → candidate names (lowercase, first-seen order).
#[derive(Debug, Clone, Default)]
pub struct VarHashCatalog {
    names: HashMap<u32, Vec<String>>,
}

impl VarHashCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a text file
    ///
    /// # Errors
    /// Returns an error if the file can't be read or yields no entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let catalog = Self::parse(&String::from_utf8_lossy(&bytes))?;
        tracing::info!(
            "Loaded {} hashes from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Parse catalog text
    ///
    /// # Errors
    /// Returns [`Error::EmptyHashCatalog`] if no line yields an entry.
    pub fn parse(text: &str) -> Result<Self> {
        let mut catalog = Self::new();
        for line in text.lines() {
            if let Some((hash, name)) = parse_line(line) {
                catalog.insert(hash, name);
            }
        }
        if catalog.is_empty() {
            return Err(Error::EmptyHashCatalog);
        }
        Ok(catalog)
    }

    /// Add a candidate name under `hash`, lowercased and deduplicated.
    pub fn insert(&mut self, hash: u32, name: &str) {
        let name = name.to_ascii_lowercase();
        let names = self.names.entry(hash).or_default();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            names.push(name);
        }
    }

    /// Add a name under its own computed hash.
    pub fn insert_name(&mut self, name: &str) {
        let lower = name.to_ascii_lowercase();
        self.insert(var_hash(&lower), &lower);
    }

    /// Candidate names for a hash, if any are known.
    pub fn names_for(&self, hash: u32) -> Option<&[String]> {
        self.names.get(&hash).map(Vec::as_slice)
    }

    /// Number of distinct hashes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn parse_line(line: &str) -> Option<(u32, &str)> {
    let start = line.find("0x")?;
    let hex = line.get(start + 2..start + 10)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let hash = u32::from_str_radix(hex, 16).ok()?;

    let rest = line[start + 10..].trim_start_matches([' ', '\t']);
    let end = rest.find([' ', '\t', '\r']).unwrap_or(rest.len());
    let name = &rest[..end];
    if name.is_empty() {
        return None;
    }
    Some((hash, name))
}
