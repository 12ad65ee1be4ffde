//! Inline variable detection (`%name` and `_name_`)

use super::{VarRef, VarStyle};
use crate::formats::common::var_hash;

fn is_var_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End (exclusive) of the run of variable bytes starting at `from`.
fn var_run_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| !is_var_byte(b))
        .map_or(bytes.len(), |n| from + n)
}

/// Scan one flushed text run for variable references.
///
/// Matches never overlap: scanning resumes right after each match. `_name_`
/// is matched greedily, so the closing underscore is the last one in the run
/// of variable characters (`_a_b_` names `a_b`).
pub(super) fn detect_vars(text: &str, plain_base: usize, byte_base: usize, out: &mut Vec<VarRef>) {
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let end = var_run_end(bytes, i + 1);
                if end > i + 1 {
                    out.push(var_ref(VarStyle::Percent, text, i, end, i + 1..end, plain_base, byte_base));
                    i = end;
                    continue;
                }
            }
            b'_' => {
                let end = var_run_end(bytes, i + 1);
                // Last underscore inside the run closes the reference; it must leave a non-empty name
                if let Some(close) = bytes[i + 1..end].iter().rposition(|&b| b == b'_').map(|n| i + 1 + n)
                    && close > i + 1
                {
                    out.push(var_ref(VarStyle::Underscore, text, i, close + 1, i + 1..close, plain_base, byte_base));
                    i = close + 1;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
}

fn var_ref(
    style: VarStyle,
    text: &str,
    start: usize,
    end: usize,
    name: std::ops::Range<usize>,
    plain_base: usize,
    byte_base: usize,
) -> VarRef {
    let name = text[name].to_ascii_lowercase();
    VarRef {
        style,
        token: text[start..end].to_string(),
        hash: var_hash(&name),
        name,
        plain_offset: plain_base + start,
        byte_offset: byte_base + start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<VarRef> {
        let mut out = Vec::new();
        detect_vars(text, 0, 0, &mut out);
        out
    }

    #[test]
    fn test_percent_var() {
        let vars = detect("Hello %pcn, welcome");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].style, VarStyle::Percent);
        assert_eq!(vars[0].token, "%pcn");
        assert_eq!(vars[0].name, "pcn");
        assert_eq!(vars[0].plain_offset, 6);
        assert_eq!(vars[0].hash, var_hash("pcn"));
    }

    #[test]
    fn test_underscore_var() {
        let vars = detect("Go see _npc1_ now");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].style, VarStyle::Underscore);
        assert_eq!(vars[0].token, "_npc1_");
        assert_eq!(vars[0].name, "npc1");
        assert_eq!(vars[0].byte_offset, 7);
    }

    #[test]
    fn test_names_are_lowercased() {
        let vars = detect("%GOD and _Qgiver_");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "god");
        assert_eq!(vars[0].token, "%GOD");
        assert_eq!(vars[1].name, "qgiver");
    }

    #[test]
    fn test_no_double_count() {
        let vars = detect("%_a_");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].style, VarStyle::Percent);
        assert_eq!(vars[0].name, "_a_");
    }

    #[test]
    fn test_lone_markers_ignored() {
        assert!(detect("100% sure").is_empty());
        assert!(detect("a _ b").is_empty());
        assert!(detect("__").is_empty());
        assert!(detect("_open ended").is_empty());
    }

    #[test]
    fn test_adjacent_vars() {
        let vars = detect("%a%b");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[1].plain_offset, 2);
    }
}
