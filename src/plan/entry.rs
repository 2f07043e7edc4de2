//! Plan entries and their simulation outputs

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::SkillDefinition;
use crate::core::types::{roman_level, EntryId, Level, SkillPoints, Timestamp};

/// Where an entry stands relative to the character and the plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum EntryStatus {
    /// The character already has this level
    Trained,
    /// This exact level is in training right now
    Training,
    /// The character meets every requirement
    Trainable,
    /// Requirements are missing but earlier plan entries provide them
    UntrainableButQueued,
    /// Requirements are missing and the plan does not provide them
    #[default]
    MissingDeps,
}

/// Timing figures for an entry with a known training rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryTiming {
    /// SP the skill holds when this entry starts
    pub start_sp: SkillPoints,
    /// SP the skill holds when this entry finishes
    pub dest_sp: SkillPoints,
    pub start_time: Timestamp,
    pub finish_time: Timestamp,
    /// Seconds this entry takes on its own
    pub skill_duration: i64,
    /// Seconds from now until this entry finishes
    pub train_duration: i64,
    /// Fraction of the level already trained
    pub completed: f64,
    pub spph: f64,
}

/// One row of a training plan
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub(crate) id: EntryId,
    pub skill: Arc<SkillDefinition>,
    pub level: Level,
    /// Explicitly requested, as opposed to pulled in as a dependency
    pub objective: bool,
    pub notes: String,
    pub status: EntryStatus,
    /// `None` until simulated, or when the rate is unknown
    pub timing: Option<EntryTiming>,
}

impl PlanEntry {
    pub fn new(skill: Arc<SkillDefinition>, level: Level, objective: bool) -> Self {
        Self {
            id: EntryId(0),
            skill,
            level,
            objective,
            notes: String::new(),
            status: EntryStatus::default(),
            timing: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn is_rate_known(&self) -> bool {
        self.timing.is_some()
    }

    /// "Skill name III"
    pub fn label(&self) -> String {
        format!("{} {}", self.skill.name, roman_level(self.level))
    }
}
