//! Character sheet snapshot
//!
//! The last synchronized view of a character: trained skills and SP,
//! attributes, and whether the snapshot is usable at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attributes::Attributes;
use crate::catalog::{GameRules, SkillCatalog};
use crate::core::types::{GroupId, Level, SkillId, SkillPoints};

/// Trained state of one skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSkill {
    pub level: Level,
    /// SP in the skill, possibly part way into the next level
    pub points: SkillPoints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    /// False while no snapshot has been received
    pub valid: bool,
    pub base: Attributes,
    pub implant: Attributes,
    skills: BTreeMap<SkillId, CharacterSkill>,
    total_sp: SkillPoints,
}

impl CharacterSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            valid: true,
            ..Self::default()
        }
    }

    /// Placeholder for a character whose sheet has not arrived yet
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn with_attributes(mut self, base: Attributes, implant: Attributes) -> Self {
        self.base = base;
        self.implant = implant;
        self
    }

    /// Record a skill as reported by the snapshot
    pub fn set_skill(&mut self, id: SkillId, level: Level, points: SkillPoints) {
        let old = self.skills.insert(id, CharacterSkill { level, points });
        self.total_sp = self.total_sp - old.map_or(0, |s| s.points) + points;
    }

    pub fn with_skill(mut self, id: SkillId, level: Level, points: SkillPoints) -> Self {
        self.set_skill(id, level, points);
        self
    }

    pub fn skill(&self, id: SkillId) -> Option<&CharacterSkill> {
        self.skills.get(&id)
    }

    pub fn skills(&self) -> impl Iterator<Item = (&SkillId, &CharacterSkill)> {
        self.skills.iter()
    }

    /// Trained level, 0 for skills the character does not have
    pub fn level_for(&self, id: SkillId) -> Level {
        self.skills.get(&id).map_or(0, |s| s.level)
    }

    pub fn total_sp(&self) -> SkillPoints {
        self.total_sp
    }

    pub fn total_attributes(&self) -> Attributes {
        self.base + self.implant
    }

    /// Sum of SP over all trained skills of a group
    pub fn group_sp(&self, catalog: &SkillCatalog, group: GroupId) -> SkillPoints {
        self.skills
            .iter()
            .filter(|(id, _)| catalog.skill(**id).map_or(false, |s| s.group == group))
            .map(|(_, s)| s.points)
            .sum()
    }

    /// Raise a skill to `level` after its training finished
    ///
    /// Levels only move up; replaying the same or a lower level is a no-op.
    /// Returns true when the sheet changed.
    pub fn advance_skill(
        &mut self,
        id: SkillId,
        level: Level,
        catalog: &SkillCatalog,
        rules: &dyn GameRules,
    ) -> bool {
        if level == 0 || self.level_for(id) >= level {
            return false;
        }

        let Some(skill) = catalog.skill(id) else {
            tracing::warn!("Cannot replay skill {} to level {}: not in catalog", id, level);
            return false;
        };

        let level_sp = rules.sp_required(level, skill.rank);
        let points = self.skill(id).map_or(level_sp, |s| s.points.max(level_sp));
        self.set_skill(id, level, points);
        true
    }
}
