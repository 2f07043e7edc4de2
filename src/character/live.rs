//! Live training state
//!
//! Between two synchronizations the skill in training keeps accruing SP.
//! [`Character`] extrapolates those figures from the queue's end time and
//! the character's current training rate.
//!
//! State machine:
//! - `NoActiveTraining` until the queue has an entry ending in the future
//! - `Training` while that entry runs
//! - `SkillJustCompleted` once its end time passes; the entry is replayed
//!   into the sheet and the caller refreshes to pick up the next entry

use crate::catalog::{GameRules, SkillCatalog};
use crate::character::queue::TrainingQueue;
use crate::character::sheet::CharacterSheet;
use crate::core::types::{roman_level, Level, SkillId, SkillPoints, Timestamp, SECONDS_PER_HOUR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    NoActiveTraining,
    Training,
    SkillJustCompleted,
}

/// The queue entry currently in training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTraining {
    pub queue_pos: usize,
    pub skill_id: SkillId,
    pub to_level: Level,
    pub end_time: Timestamp,
    pub end_sp: SkillPoints,
    /// Rank, when the skill is in the catalog
    pub rank: Option<u32>,
    /// Current SP/hour; `None` when it cannot be computed
    pub spph: Option<f64>,
}

impl ActiveTraining {
    pub fn remaining(&self, now: Timestamp) -> i64 {
        self.end_time - now
    }

    /// SP the skill holds at `now`, counting back from `dest_sp`
    pub fn live_sp_at(&self, dest_sp: SkillPoints, now: Timestamp) -> Option<SkillPoints> {
        let spps = self.spph? / SECONDS_PER_HOUR;
        let pending = (self.remaining(now).max(0) as f64 * spps) as SkillPoints;
        Some(dest_sp.saturating_sub(pending))
    }
}

/// Extrapolated figures for the skill in training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveProgress {
    pub skill_id: SkillId,
    pub to_level: Level,
    /// Seconds until the level completes
    pub remaining: i64,
    pub spph: f64,
    /// SP of the skill, all levels included
    pub skill_sp: SkillPoints,
    /// SP gained inside the level being trained
    pub level_sp: SkillPoints,
    /// Fraction of the level done, 0.0 to 1.0
    pub level_done: f64,
    /// Character total SP; `None` when the sheet does not know the skill
    pub character_sp: Option<SkillPoints>,
    /// SP within the active skill's group
    pub group_sp: Option<SkillPoints>,
}

/// Result of a live update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveTraining {
    Idle,
    Training(LiveProgress),
    /// Training is running but its rate is unknown (skill missing from the
    /// catalog or no valid sheet); no figures are projected
    RateUnknown {
        skill_id: SkillId,
        to_level: Level,
        remaining: i64,
    },
    /// The active entry just finished and was replayed into the sheet
    Completed { skill_id: SkillId, to_level: Level },
}

/// A character: sheet snapshot, queue, and the live state derived from both
#[derive(Debug, Clone)]
pub struct Character {
    sheet: CharacterSheet,
    queue: TrainingQueue,
    active: Option<ActiveTraining>,
    /// Total SP after the last refresh
    base_sp: SkillPoints,
    /// SP in the active skill's group after the last refresh
    group_base_sp: SkillPoints,
    /// SP of the active skill on the sheet after the last refresh
    active_sheet_sp: Option<SkillPoints>,
}

impl Character {
    pub fn new(sheet: CharacterSheet, queue: TrainingQueue) -> Self {
        Self {
            sheet,
            queue,
            active: None,
            base_sp: 0,
            group_base_sp: 0,
            active_sheet_sp: None,
        }
    }

    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    pub fn queue(&self) -> &TrainingQueue {
        &self.queue
    }

    pub fn active_training(&self) -> Option<&ActiveTraining> {
        self.active.as_ref()
    }

    pub fn is_training(&self) -> bool {
        self.active.is_some()
    }

    pub fn phase(&self, now: Timestamp) -> TrainingPhase {
        match &self.active {
            None => TrainingPhase::NoActiveTraining,
            Some(active) if active.end_time <= now => TrainingPhase::SkillJustCompleted,
            Some(_) => TrainingPhase::Training,
        }
    }

    /// Replace the snapshot after a new sheet arrived
    pub fn set_sheet(&mut self, sheet: CharacterSheet) {
        self.sheet = sheet;
        self.active = None;
    }

    /// Replace the queue after a new queue arrived
    pub fn set_queue(&mut self, queue: TrainingQueue) {
        self.queue = queue;
        self.active = None;
    }

    /// Rebuild the derived state for `now`
    ///
    /// Finished queue entries are replayed into the sheet, the running
    /// entry contributes its previous level, and the active pointer moves
    /// to the first entry ending after `now`.
    pub fn refresh(&mut self, catalog: &SkillCatalog, rules: &dyn GameRules, now: Timestamp) {
        self.active = None;
        self.base_sp = 0;
        self.group_base_sp = 0;
        self.active_sheet_sp = None;

        if self.sheet.valid && self.queue.valid {
            self.replay_queue(catalog, rules, now);
        }
        if self.sheet.valid {
            self.base_sp = self.sheet.total_sp();
        }

        let Some((queue_pos, entry)) = self.queue.active_at(now) else {
            return;
        };
        let Some(end_time) = entry.end_time else {
            return;
        };

        let skill = catalog.skill(entry.skill_id);
        if skill.is_none() {
            tracing::warn!(
                "Skill in training (ID {}) not found in catalog; live figures unavailable",
                entry.skill_id
            );
        }

        let spph = match skill {
            Some(skill) if self.sheet.valid => {
                Some(rules.spph_for_skill(skill, &self.sheet.total_attributes()))
                    .filter(|r| *r > 0.0)
            }
            _ => None,
        };

        if self.sheet.valid {
            if let Some(skill) = skill {
                self.group_base_sp = self.sheet.group_sp(catalog, skill.group);
            }
            self.active_sheet_sp = match self.sheet.skill(entry.skill_id) {
                Some(s) => Some(s.points),
                // A first level may start before the sheet lists the skill
                None if entry.to_level == 1 => Some(0),
                None => None,
            };
            if self.active_sheet_sp.is_none() {
                tracing::warn!(
                    "Skill in training (ID {}) is unknown to {}",
                    entry.skill_id,
                    self.sheet.name
                );
            }
        }

        self.active = Some(ActiveTraining {
            queue_pos,
            skill_id: entry.skill_id,
            to_level: entry.to_level,
            end_time,
            end_sp: entry.end_sp,
            rank: skill.map(|s| s.rank),
            spph,
        });
    }

    fn replay_queue(&mut self, catalog: &SkillCatalog, rules: &dyn GameRules, now: Timestamp) {
        for entry in self.queue.entries() {
            if !entry.has_started(now) {
                break;
            }
            let level = if entry.has_finished(now) {
                entry.to_level
            } else {
                entry.to_level.saturating_sub(1)
            };
            self.sheet.advance_skill(entry.skill_id, level, catalog, rules);
        }
    }

    /// Extrapolate the live figures at `now`
    ///
    /// When the active entry has finished it is replayed into the sheet,
    /// the active pointer is cleared and `Completed` is returned. That is a
    /// state transition: call [`Character::refresh`] before reading live
    /// values again.
    pub fn update_live(
        &mut self,
        catalog: &SkillCatalog,
        rules: &dyn GameRules,
        now: Timestamp,
    ) -> LiveTraining {
        let Some(active) = self.active else {
            return LiveTraining::Idle;
        };

        let remaining = active.remaining(now);
        if remaining <= 0 {
            self.complete_active(catalog, rules, &active);
            return LiveTraining::Completed {
                skill_id: active.skill_id,
                to_level: active.to_level,
            };
        }

        let (Some(spph), Some(rank)) = (active.spph, active.rank) else {
            return LiveTraining::RateUnknown {
                skill_id: active.skill_id,
                to_level: active.to_level,
                remaining,
            };
        };

        let skill_sp = active
            .live_sp_at(active.end_sp, now)
            .unwrap_or(active.end_sp);
        let level_start = rules.sp_required(active.to_level.saturating_sub(1), rank);
        let level_total = active.end_sp.saturating_sub(level_start);
        let level_sp = skill_sp.saturating_sub(level_start);
        let level_done = if level_total == 0 {
            1.0
        } else {
            (level_sp as f64 / level_total as f64).clamp(0.0, 1.0)
        };

        let gained = self
            .active_sheet_sp
            .map(|sheet_sp| skill_sp as i64 - sheet_sp as i64);
        let character_sp = gained.map(|g| (self.base_sp as i64 + g).max(0) as SkillPoints);
        let group_sp = gained.map(|g| (self.group_base_sp as i64 + g).max(0) as SkillPoints);

        LiveTraining::Training(LiveProgress {
            skill_id: active.skill_id,
            to_level: active.to_level,
            remaining,
            spph,
            skill_sp,
            level_sp,
            level_done,
            character_sp,
            group_sp,
        })
    }

    fn complete_active(
        &mut self,
        catalog: &SkillCatalog,
        rules: &dyn GameRules,
        active: &ActiveTraining,
    ) {
        if self.sheet.valid {
            self.sheet
                .advance_skill(active.skill_id, active.to_level, catalog, rules);
            self.base_sp = self.sheet.total_sp();
        }
        self.active = None;
        self.active_sheet_sp = None;
        tracing::debug!(
            "Skill {} level {} completed (queue position {})",
            active.skill_id,
            active.to_level,
            active.queue_pos
        );
    }

    /// "Skill name IV", or a note that nothing trains
    pub fn training_text(&self, catalog: &SkillCatalog) -> String {
        match &self.active {
            Some(active) => {
                let name = catalog
                    .skill(active.skill_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| active.skill_id.to_string());
                format!("{} {}", name, roman_level(active.to_level))
            }
            None => "No skill in training!".to_string(),
        }
    }

    /// Time left on the active skill, or why there is none
    pub fn remaining_text(&self, now: Timestamp, slim: bool) -> String {
        if !self.queue.valid {
            return "No training information!".to_string();
        }
        if self.queue.is_paused() {
            return "Training is paused!".to_string();
        }
        match &self.active {
            Some(active) => crate::core::clock::format_timediff(active.remaining(now), slim),
            None => "No skill in training!".to_string(),
        }
    }
}
