//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Seconds since the Unix epoch
pub type Timestamp = i64;

/// Trained level of a skill (0 = untrained, 5 = maximum)
pub type Level = u32;

/// Skill points, the resource consumed while training
pub type SkillPoints = u64;

/// Highest level any skill can be trained to
pub const MAX_SKILL_LEVEL: Level = 5;

/// Seconds in one hour, used to convert SP/hour rates
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Unique identifier for skills in the catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct SkillId(pub u32);

/// Unique identifier for certificates in the catalog
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct CertificateId(pub u32);

/// Skill group identifier (skills are organized into groups)
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct GroupId(pub u32);

/// Stable handle for a plan entry
///
/// Positions shift whenever entries are inserted, moved or pruned; the id
/// stays with the entry for its whole lifetime in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub struct EntryId(pub u32);

/// Roman numeral for a skill level (I..V), used in display text
pub fn roman_level(level: Level) -> &'static str {
    match level {
        0 => "0",
        1 => "I",
        2 => "II",
        3 => "III",
        4 => "IV",
        5 => "V",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_id_equality() {
        let a = SkillId(3300);
        let b = SkillId::from(3300);
        let c = SkillId(3301);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_id_display_is_bare_number() {
        assert_eq!(SkillId(3300).to_string(), "3300");
        assert_eq!(CertificateId(7).to_string(), "7");
    }

    #[test]
    fn test_skill_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<SkillId, &str> = HashMap::new();
        map.insert(SkillId(3300), "gunnery");
        assert_eq!(map.get(&SkillId(3300)), Some(&"gunnery"));
    }

    #[test]
    fn test_roman_level() {
        assert_eq!(roman_level(1), "I");
        assert_eq!(roman_level(4), "IV");
        assert_eq!(roman_level(5), "V");
        assert_eq!(roman_level(9), "?");
    }
}
