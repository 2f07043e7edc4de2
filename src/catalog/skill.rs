//! Static skill definitions

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::core::types::{GroupId, Level, SkillId};

/// A required (skill, level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prerequisite {
    pub skill: SkillId,
    pub level: Level,
}

impl Prerequisite {
    pub fn new(skill: SkillId, level: Level) -> Self {
        Self { skill, level }
    }
}

/// A group skills are filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub id: GroupId,
    pub name: String,
}

/// Immutable definition of a trainable skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub group: GroupId,
    /// Multiplier on the SP cost of every level
    pub rank: u32,
    pub primary: Attribute,
    pub secondary: Attribute,
    /// Skills needed before level 1 can be trained, in declaration order
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
}

impl SkillDefinition {
    pub fn new(
        id: SkillId,
        name: impl Into<String>,
        rank: u32,
        primary: Attribute,
        secondary: Attribute,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            group: GroupId::default(),
            rank,
            primary,
            secondary,
            prerequisites: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = group;
        self
    }

    pub fn with_prerequisite(mut self, skill: SkillId, level: Level) -> Self {
        self.prerequisites.push(Prerequisite::new(skill, level));
        self
    }

    /// Prerequisite level required on `skill`, if any
    pub fn requires(&self, skill: SkillId) -> Option<Level> {
        self.prerequisites
            .iter()
            .find(|p| p.skill == skill)
            .map(|p| p.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let skill = SkillDefinition::new(SkillId(10), "Gunnery", 1, Attribute::Perception, Attribute::Willpower)
            .with_prerequisite(SkillId(3), 2)
            .with_prerequisite(SkillId(1), 1);
        let order: Vec<SkillId> = skill.prerequisites.iter().map(|p| p.skill).collect();
        assert_eq!(order, vec![SkillId(3), SkillId(1)]);
        assert_eq!(skill.requires(SkillId(3)), Some(2));
        assert_eq!(skill.requires(SkillId(99)), None);
    }
}
