//! Record-id → label catalog for `TEXT.RSC`
//!
//! A line-oriented listing where heading lines name a group and index lines
//! list record ids (`1000, 1002-1010`) with an optional `= label`.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

const UNCATEGORIZED: &str = "Uncategorized";

/// An inclusive id range sharing one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpan {
    pub first: u16,
    pub last: u16,
    pub label: String,
}

impl IndexSpan {
    pub fn contains(&self, id: u16) -> bool {
        (self.first..=self.last).contains(&id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexCatalog {
    spans: Vec<IndexSpan>,
    labels: Vec<String>,
}

impl IndexCatalog {
    /// Load a catalog from a text file
    ///
    /// # Errors
    /// Returns an error if the file can't be read or yields no spans.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let catalog = Self::parse(&String::from_utf8_lossy(&bytes))?;
        tracing::info!(
            "Loaded {} index spans ({} labels) from {}",
            catalog.spans.len(),
            catalog.labels.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Parse catalog text
    ///
    /// # Errors
    /// Returns [`Error::EmptyIndexCatalog`] if no line yields a span.
    pub fn parse(text: &str) -> Result<Self> {
        let mut catalog = Self::default();
        let mut heading = String::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.contains("UESPWiki") || line.contains('\u{29FC}') {
                continue;
            }
            if !line.starts_with(|c: char| c.is_ascii_digit()) {
                heading = strip_parenthetical(line).to_string();
                continue;
            }

            let (ids, label) = match line.split_once('=') {
                Some((ids, label)) => (ids.trim(), strip_quotes(strip_parenthetical(label.trim()))),
                None => (line, heading.as_str()),
            };
            let label = if label.is_empty() { UNCATEGORIZED } else { label };

            let ranges = parse_id_list(ids);
            if ranges.is_empty() {
                continue;
            }
            if !catalog.labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
                catalog.labels.push(label.to_string());
            }
            catalog.spans.extend(ranges.into_iter().map(|(first, last)| IndexSpan {
                first,
                last,
                label: label.to_string(),
            }));
        }

        if catalog.spans.is_empty() {
            return Err(Error::EmptyIndexCatalog);
        }
        Ok(catalog)
    }

    /// Label of the first span containing `id`.
    pub fn label_for(&self, id: u16) -> Option<&str> {
        self.spans
            .iter()
            .find(|s| s.contains(id))
            .map(|s| s.label.as_str())
    }

    pub fn spans(&self) -> &[IndexSpan] {
        &self.spans
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

fn strip_parenthetical(s: &str) -> &str {
    match s.find('(') {
        Some(pos) => s[..pos].trim(),
        None => s,
    }
}

fn strip_quotes(s: &str) -> &str {
    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if quoted { s[1..s.len() - 1].trim() } else { s }
}

/// Comma list of ids and `a-b` ranges; braces are ignored.
fn parse_id_list(s: &str) -> Vec<(u16, u16)> {
    let cleaned = s.replace(['{', '}'], " ");
    let mut out = Vec::new();
    for segment in cleaned.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match segment.split_once('-') {
            Some((a, b)) => {
                let (a, b) = (a.trim(), b.trim());
                if a.is_empty() || b.is_empty() {
                    continue;
                }
                let (a, b) = (parse_id(a), parse_id(b));
                out.push((a.min(b), a.max(b)));
            }
            None => {
                let id = parse_id(segment);
                out.push((id, id));
            }
        }
    }
    out
}

/// Decimal value of the last four digits in `token` (0 when there are none).
fn parse_id(token: &str) -> u16 {
    let digits: Vec<u16> = token
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as u16)
        .collect();
    let tail = &digits[digits.len().saturating_sub(4)..];
    tail.iter().fold(0, |acc, d| acc * 10 + d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
UESPWiki navigation
Quest Messages (general)
1000, 1002-1004
1010 = \"Letters\" (unused)
1020 - {1018} = Books

Empty
1030
";

    #[test]
    fn test_parse_sample() {
        let catalog = IndexCatalog::parse(SAMPLE).unwrap();
        assert_eq!(catalog.spans().len(), 5);
        assert_eq!(catalog.label_for(1000), Some("Quest Messages"));
        assert_eq!(catalog.label_for(1003), Some("Quest Messages"));
        assert_eq!(catalog.label_for(1001), None);
        assert_eq!(catalog.label_for(1010), Some("Letters"));
        assert_eq!(catalog.label_for(1019), Some("Books"));
        assert_eq!(catalog.label_for(1030), Some("Empty"));
        assert_eq!(catalog.labels(), ["Quest Messages", "Letters", "Books", "Empty"]);
    }

    #[test]
    fn test_missing_heading_is_uncategorized() {
        let catalog = IndexCatalog::parse("42\n").unwrap();
        assert_eq!(catalog.label_for(42), Some(UNCATEGORIZED));
    }

    #[test]
    fn test_parse_id_keeps_last_four_digits() {
        assert_eq!(parse_id("0x1234"), 1234);
        assert_eq!(parse_id("123456"), 3456);
        assert_eq!(parse_id("abc"), 0);
    }

    #[test]
    fn test_empty_catalog() {
        assert!(matches!(
            IndexCatalog::parse("Heading only\n"),
            Err(Error::EmptyIndexCatalog)
        ));
    }
}
