//! TOML character fixtures
//!
//! ```toml
//! name = "Pilot"
//! base = { intelligence = 20, memory = 20, charisma = 19, perception = 20, willpower = 20 }
//! standard_implants = [10221, 10208]
//!
//! [[skills]]
//! id = 3300
//! level = 2
//! points = 1415
//!
//! [[queue]]
//! skill_id = 3300
//! to_level = 3
//! start_time = 1700000000
//! end_time = 1700013170
//! end_sp = 8000
//! ```

use serde::Deserialize;
use std::path::Path;

use super::{Character, CharacterSheet, QueueEntry, TrainingQueue};
use crate::attributes::{Attributes, Implant};
use crate::core::error::LoadError;
use crate::core::types::{Level, SkillId, SkillPoints};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TomlCharacter {
    name: String,
    #[serde(default = "default_true")]
    valid: bool,
    base: Attributes,
    /// Implants given in full
    #[serde(default)]
    implants: Vec<Implant>,
    /// Basic implants referenced by type id
    #[serde(default)]
    standard_implants: Vec<u32>,
    #[serde(default)]
    skills: Vec<TomlSkill>,
    #[serde(default)]
    queue: Vec<QueueEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlSkill {
    id: SkillId,
    level: Level,
    points: SkillPoints,
}

impl Character {
    /// Load a character fixture from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a character fixture
    ///
    /// The result still needs a [`Character::refresh`] before live values
    /// are available.
    pub fn parse_toml(content: &str) -> Result<Self, LoadError> {
        let data: TomlCharacter = toml::from_str(content)?;

        let mut implants = data.implants;
        for type_id in data.standard_implants {
            let implant = Implant::standard(type_id)
                .ok_or_else(|| LoadError::Invalid(format!("unknown implant type {}", type_id)))?;
            implants.push(implant);
        }

        let mut sheet = CharacterSheet::new(data.name)
            .with_attributes(data.base, Attributes::from_implants(&implants));
        sheet.valid = data.valid;
        for skill in data.skills {
            sheet.set_skill(skill.id, skill.level, skill.points);
        }

        Ok(Character::new(sheet, TrainingQueue::new(data.queue)))
    }
}
