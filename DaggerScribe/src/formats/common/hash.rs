//! Text-variable name hashing

/// Shift-add hash linking QBN records to text-variable names.
///
/// `val = (val << 1) + byte` over the raw bytes with 32-bit wraparound. The hash
/// itself does no case folding; names must already be lowercase.
#[must_use]
pub fn var_hash(name_lower: &str) -> u32 {
    name_lower
        .bytes()
        .fold(0u32, |val, b| (val << 1).wrapping_add(u32::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(var_hash(""), 0);
        assert_eq!(var_hash("a"), 97);
        assert_eq!(var_hash("ab"), (97 << 1) + 98);
        assert_eq!(var_hash("ab"), 292);
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(var_hash("npc"), var_hash("NPC"));
    }

    #[test]
    fn test_wraps_on_long_names() {
        // 40 bytes shifts the first character well past bit 31
        let long = "z".repeat(40);
        let expected = long
            .bytes()
            .fold(0u64, |v, b| ((v << 1) + u64::from(b)) & 0xFFFF_FFFF);
        assert_eq!(u64::from(var_hash(&long)), expected);
    }
}
