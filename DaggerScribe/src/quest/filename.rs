//! Quest filename metadata
//!
//! Standard quest files are named `G0MRCDxx`: guild, a literal `0`,
//! membership, minimum reputation digit, child-guard flag, delivery method
//! and a two-character suffix.

use serde::Serialize;

/// Metadata decoded from a quest's base name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestFilename {
    /// Eight characters with a `0` in the second position.
    pub standard: bool,
    pub guild_code: Option<char>,
    pub guild_name: Option<&'static str>,
    pub membership_code: Option<char>,
    pub membership_name: Option<&'static str>,
    /// Minimum reputation (digit × 10).
    pub min_reputation: Option<u8>,
    pub child_guard_code: Option<char>,
    pub child_guard_restricted: bool,
    pub delivery_code: Option<char>,
    pub delivery_name: Option<&'static str>,
}

impl QuestFilename {
    /// Decode an (upper-cased) base name such as `A0B00Y00`.
    ///
    /// Names shorter than six characters carry no metadata. Non-standard
    /// names only get their guild decoded.
    pub fn parse(base_name: &str) -> Self {
        let chars: Vec<char> = base_name.chars().collect();
        let standard = is_standard(&chars);
        if chars.len() < 6 {
            return Self {
                standard,
                ..Self::default()
            };
        }

        let (guild, membership, min_rep, child_guard, delivery) =
            (chars[0], chars[2], chars[3], chars[4], chars[5]);
        let mut meta = Self {
            standard,
            guild_code: Some(guild),
            guild_name: Some(guild_name(guild)),
            membership_code: Some(membership),
            child_guard_code: Some(child_guard),
            delivery_code: Some(delivery),
            ..Self::default()
        };
        if standard {
            meta.membership_name = Some(membership_name(membership));
            meta.delivery_name = Some(delivery_name(delivery));
            meta.child_guard_restricted = matches!(child_guard, 'X' | 'Y');
            meta.min_reputation = min_rep.to_digit(10).map(|d| d as u8 * 10);
        }
        meta
    }
}

fn is_standard(chars: &[char]) -> bool {
    chars.len() == 8 && chars[1] == '0'
}

/// Guild or faction offering quests with this filename prefix.
pub fn guild_name(code: char) -> &'static str {
    match code.to_ascii_uppercase() {
        '_' => "Starting Quests",
        '$' => "Cure Quests",
        '0' => "School of Julianos",
        '1' => "Meridia",
        '2' => "Molag Bal",
        '3' => "Namira",
        '4' => "Nocturnal",
        '5' => "Peryite",
        '6' => "Sheogorath",
        '7' => "Sanguine",
        '8' => "Malacath",
        '9' => "Vaermina",
        'A' => "Commoners",
        'B' => "Knightly Orders",
        'C' => "Temple Quests",
        'D' => "Akatosh Chantry",
        'E' => "Temple of Arkay",
        'F' => "House of Dibella",
        'G' => "Kynaran Order",
        'H' => "Benevolence of Mara",
        'I' => "Temple of Stendarr",
        'J' => "Resolution of Zenithar",
        'K' => "Merchants",
        'L' => "Dark Brotherhood",
        'M' => "Fighters Guild",
        'N' => "Mages Guild",
        'O' => "Thieves Guild",
        'P' => "Vampires",
        'Q' => "Covens",
        'R' => "Royalty",
        'S' => "Main Quests",
        'T' => "Azura (Crimson Gate)",
        'U' => "Boethiah",
        'V' => "Clavicus Vile",
        'W' => "Hermaeus Mora",
        'X' => "Hircine",
        'Y' => "Mehrunes Dagon",
        'Z' => "Mephala",
        _ => "Unknown",
    }
}

pub fn membership_name(code: char) -> &'static str {
    match code.to_ascii_uppercase() {
        'A' => "Join",
        'B' => "Member",
        'C' => "Non-member",
        _ => "Unknown",
    }
}

pub fn delivery_name(code: char) -> &'static str {
    match code.to_ascii_uppercase() {
        'Y' => "In-person",
        'L' => "Letter",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_name() {
        let meta = QuestFilename::parse("M0B30Y08");
        assert!(meta.standard);
        assert_eq!(meta.guild_name, Some("Fighters Guild"));
        assert_eq!(meta.membership_name, Some("Member"));
        assert_eq!(meta.min_reputation, Some(30));
        assert!(!meta.child_guard_restricted);
        assert_eq!(meta.delivery_name, Some("In-person"));
    }

    #[test]
    fn test_child_guard() {
        assert!(QuestFilename::parse("A0C0XL01").child_guard_restricted);
        assert!(QuestFilename::parse("A0C0YL01").child_guard_restricted);
        assert_eq!(QuestFilename::parse("A0C0XL01").delivery_name, Some("Letter"));
    }

    #[test]
    fn test_non_standard_keeps_guild_only() {
        let meta = QuestFilename::parse("S0000999X");
        assert!(!meta.standard);
        assert_eq!(meta.guild_name, Some("Main Quests"));
        assert_eq!(meta.membership_name, None);
        assert_eq!(meta.min_reputation, None);
        assert!(!meta.child_guard_restricted);
    }

    #[test]
    fn test_short_name() {
        let meta = QuestFilename::parse("$CURE");
        assert_eq!(meta, QuestFilename::default());
    }

    #[test]
    fn test_unknown_codes() {
        assert_eq!(guild_name('#'), "Unknown");
        assert_eq!(membership_name('Z'), "Unknown");
        assert_eq!(delivery_name('q'), "Unknown");
        assert_eq!(guild_name('m'), "Fighters Guild");
    }
}
