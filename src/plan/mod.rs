//! Training plans
//!
//! A plan is an ordered list of (skill, level) entries; earlier entries
//! train first. The builder keeps the list dependency-correct while
//! appending, the simulator fills in timing figures, and the optimizer
//! searches for the attribute allocation that finishes the plan soonest.

pub mod builder;
pub mod entry;
pub mod optimize;
pub mod records;
pub mod simulate;

pub use entry::{EntryStatus, EntryTiming, PlanEntry};
pub use optimize::{allocation_lattice, optimize_attributes, OptimizationResult};
pub use records::PlanRecord;

use crate::catalog::{GameRules, SkillCatalog};
use crate::character::{Character, CharacterSheet};
use crate::core::error::{PlanError, Result};
use crate::core::types::{EntryId, Level, SkillId, SkillPoints, MAX_SKILL_LEVEL};

/// Collaborators a plan operation reads from
#[derive(Clone, Copy)]
pub struct PlanContext<'a> {
    pub catalog: &'a SkillCatalog,
    pub rules: &'a dyn GameRules,
    pub character: &'a Character,
}

impl<'a> PlanContext<'a> {
    pub fn new(catalog: &'a SkillCatalog, rules: &'a dyn GameRules, character: &'a Character) -> Self {
        Self {
            catalog,
            rules,
            character,
        }
    }

    pub fn sheet(&self) -> &'a CharacterSheet {
        self.character.sheet()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrainingPlan {
    entries: Vec<PlanEntry>,
    next_id: u32,
    total_plan_sp: SkillPoints,
    total_duration: i64,
}

impl TrainingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PlanEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlanEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&PlanEntry> {
        self.entries.last()
    }

    /// Current position of an entry
    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_plan_sp = 0;
        self.total_duration = 0;
    }

    fn assign_id(&mut self, entry: &mut PlanEntry) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        entry.id = id;
        id
    }

    pub(crate) fn push_entry(&mut self, mut entry: PlanEntry) -> EntryId {
        let id = self.assign_id(&mut entry);
        self.entries.push(entry);
        id
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PlanError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    /// Insert an entry at `pos` (0..=len); dependencies are not re-checked
    pub fn insert(&mut self, pos: usize, mut entry: PlanEntry) -> Result<EntryId> {
        if pos > self.entries.len() {
            return Err(PlanError::IndexOutOfRange {
                index: pos,
                len: self.entries.len(),
            });
        }
        if !(1..=MAX_SKILL_LEVEL).contains(&entry.level) {
            return Err(PlanError::InvalidLevel {
                skill: entry.skill.id,
                level: entry.level as i32,
            });
        }
        let id = self.assign_id(&mut entry);
        self.entries.insert(pos, entry);
        Ok(id)
    }

    /// Remove the entry at `index`; dependencies are not re-checked
    pub fn delete(&mut self, index: usize) -> Result<PlanEntry> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Move an entry so it ends up at position `to`
    ///
    /// Every other entry keeps its relative order. Whether the new order
    /// still satisfies dependencies is up to the caller.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    pub fn set_notes(&mut self, index: usize, notes: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].notes = notes.into();
        Ok(())
    }

    /// Whether (skill, level) is planned; optionally marks it objective
    pub fn has_plan_skill(&mut self, skill: SkillId, level: Level, make_objective: bool) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.skill.id == skill && e.level == level)
        {
            Some(entry) => {
                if make_objective {
                    entry.objective = true;
                }
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, skill: SkillId, level: Level) -> bool {
        self.entries
            .iter()
            .any(|e| e.skill.id == skill && e.level == level)
    }

    /// Whether another entry needs the entry at `index`
    ///
    /// It is needed by the next level of the same skill, or by an entry
    /// naming exactly this (skill, level) as a prerequisite.
    pub fn is_dependency(&self, index: usize) -> bool {
        let Some(target) = self.entries.get(index) else {
            return false;
        };

        self.entries.iter().enumerate().any(|(i, other)| {
            if i == index {
                return false;
            }
            if other.skill.id == target.skill.id && other.level == target.level + 1 {
                return true;
            }
            other
                .skill
                .prerequisites
                .iter()
                .any(|p| p.skill == target.skill.id && p.level == target.level)
        })
    }

    /// Whether the character already has `level` of `skill`
    pub fn has_char_skill(sheet: &CharacterSheet, skill: SkillId, level: Level) -> bool {
        sheet.level_for(skill) >= level
    }

    /// Whether the character alone meets the requirements of (skill, level)
    pub fn has_char_dep_skills(sheet: &CharacterSheet, entry: &PlanEntry) -> bool {
        if entry.level > 1 {
            return sheet.level_for(entry.skill.id) >= entry.level - 1;
        }
        entry
            .skill
            .prerequisites
            .iter()
            .all(|p| sheet.level_for(p.skill) >= p.level)
    }

    /// Whether the requirements of the entry at `index` are met by earlier
    /// plan entries, with the character filling any gaps
    pub fn has_plan_dep_skills(&self, sheet: &CharacterSheet, index: usize) -> bool {
        let Some(entry) = self.entries.get(index) else {
            return false;
        };
        let earlier = &self.entries[..index];

        if entry.level > 1 {
            return earlier
                .iter()
                .any(|e| e.skill.id == entry.skill.id && e.level == entry.level - 1);
        }

        entry.skill.prerequisites.iter().all(|p| {
            sheet.level_for(p.skill) >= p.level
                || earlier.iter().any(|e| e.skill.id == p.skill && e.level >= p.level)
        })
    }

    /// The plan as persistence tuples, in order
    pub fn to_records(&self) -> Vec<PlanRecord> {
        self.entries.iter().map(PlanRecord::from_entry).collect()
    }
}
