//! Plan timing simulation
//!
//! One forward pass over the plan with a running cursor: each entry starts
//! when the previous one finishes. The result depends only on the plan
//! order, the character, its active training, the attributes passed in and
//! the sampled time.

use super::{EntryStatus, EntryTiming, PlanContext, TrainingPlan};
use crate::attributes::Attributes;
use crate::character::CharacterSheet;
use crate::core::clock::TimeSample;
use crate::core::types::{Level, SkillId, SkillPoints, SECONDS_PER_HOUR};

impl TrainingPlan {
    /// Recompute status and timing of every entry
    ///
    /// With `use_active_rate` the entry in training uses the character's
    /// live rate instead of one derived from `attributes`, and finishes at
    /// its queue end time. Entries whose
    /// rate cannot be determined get no timing and do not move the cursor.
    pub fn calc_details(
        &mut self,
        ctx: &PlanContext,
        now: TimeSample,
        attributes: &Attributes,
        use_active_rate: bool,
    ) {
        let sheet = ctx.sheet();
        let active = ctx.character.active_training();

        let mut cursor: i64 = 0;
        let mut total_sp: SkillPoints = 0;

        for i in 0..self.entries.len() {
            let status = self.entry_status(sheet, i, active.map(|a| (a.skill_id, a.to_level)));

            let entry = &self.entries[i];
            let skill = &entry.skill;
            let level = entry.level;
            let active_here = active.filter(|a| a.skill_id == skill.id && a.to_level == level);

            let spph = match active_here {
                Some(a) if use_active_rate => a.spph,
                _ => Some(ctx.rules.spph_for_skill(skill, attributes)),
            }
            .filter(|r| r.is_finite() && *r > 0.0);

            let ssp = ctx.rules.sp_required(level.saturating_sub(1), skill.rank);
            let dsp = ctx.rules.sp_required(level, skill.rank);
            let live_sp = active_here.and_then(|a| a.live_sp_at(dsp, now.authoritative));
            let csp = match live_sp {
                Some(sp) => sp,
                None => match sheet.skill(skill.id) {
                    Some(s) if s.level >= level => dsp,
                    Some(s) if s.level + 1 == level => s.points,
                    _ => ssp,
                },
            }
            .clamp(ssp, dsp);

            total_sp += dsp - csp;

            let timing = spph.map(|spph| {
                let skill_duration = match active_here {
                    // The running level ends when the queue says it does
                    Some(a) if use_active_rate => a.remaining(now.authoritative).max(0),
                    _ => ((dsp - csp) as f64 * SECONDS_PER_HOUR / spph) as i64,
                };
                let start = cursor;
                cursor += skill_duration;
                EntryTiming {
                    start_sp: csp,
                    dest_sp: dsp,
                    start_time: now.local + start,
                    finish_time: now.local + cursor,
                    skill_duration,
                    train_duration: cursor,
                    completed: if dsp == ssp {
                        1.0
                    } else {
                        (csp - ssp) as f64 / (dsp - ssp) as f64
                    },
                    spph,
                }
            });
            if timing.is_none() {
                tracing::debug!("No training rate for {}; timing unknown", entry.label());
            }

            let entry = &mut self.entries[i];
            entry.status = status;
            entry.timing = timing;
        }

        self.total_plan_sp = total_sp;
        self.total_duration = cursor;
    }

    /// [`TrainingPlan::calc_details`] with the character's own attributes
    /// and live rate
    pub fn calc_details_for_character(&mut self, ctx: &PlanContext, now: TimeSample) {
        let attributes = ctx.sheet().total_attributes();
        self.calc_details(ctx, now, &attributes, true);
    }

    fn entry_status(
        &self,
        sheet: &CharacterSheet,
        index: usize,
        training: Option<(SkillId, Level)>,
    ) -> EntryStatus {
        let entry = &self.entries[index];
        if training == Some((entry.skill.id, entry.level)) {
            EntryStatus::Training
        } else if Self::has_char_skill(sheet, entry.skill.id, entry.level) {
            EntryStatus::Trained
        } else if Self::has_char_dep_skills(sheet, entry) {
            EntryStatus::Trainable
        } else if self.has_plan_dep_skills(sheet, index) {
            EntryStatus::UntrainableButQueued
        } else {
            EntryStatus::MissingDeps
        }
    }

    /// Drop every entry the character has already reached
    pub fn cleanup(&mut self, sheet: &CharacterSheet) -> usize {
        let before = self.entries.len();
        let mut i = self.entries.len();
        while i > 0 {
            i -= 1;
            if Self::has_char_skill(sheet, self.entries[i].skill.id, self.entries[i].level) {
                self.entries.remove(i);
            }
        }
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("Cleanup removed {} trained entries", removed);
        }
        removed
    }

    /// SP left to train, as of the last simulation
    pub fn total_plan_sp(&self) -> SkillPoints {
        self.total_plan_sp
    }

    /// Seconds until the last entry with a known rate finishes
    pub fn total_duration(&self) -> i64 {
        self.total_duration
    }

    /// Average SP/hour over the whole plan
    pub fn spph(&self) -> Option<f64> {
        if self.total_duration <= 0 {
            return None;
        }
        Some(self.total_plan_sp as f64 * SECONDS_PER_HOUR / self.total_duration as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::catalog::{SkillCatalog, SkillDefinition, StandardRules};
    use crate::character::{Character, QueueEntry, TrainingQueue};

    const T0: i64 = 1_000_000;

    fn catalog() -> SkillCatalog {
        let mut catalog = SkillCatalog::new();
        catalog.insert_skill(SkillDefinition::new(SkillId(1), "Science", 1, Attribute::Intelligence, Attribute::Memory));
        catalog.insert_skill(
            SkillDefinition::new(SkillId(2), "Physics", 2, Attribute::Intelligence, Attribute::Memory)
                .with_prerequisite(SkillId(1), 2),
        );
        catalog
    }

    /// 20/20 attributes train at 1800 SP/h
    fn sheet() -> CharacterSheet {
        CharacterSheet::new("Pilot")
            .with_attributes(Attributes::uniform(20), Attributes::default())
            .with_skill(SkillId(1), 1, 600)
    }

    #[test]
    fn test_statuses_and_cursor() {
        let catalog = catalog();
        let character = Character::new(sheet(), TrainingQueue::new(Vec::new()));
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);

        let mut plan = TrainingPlan::new();
        plan.append_skill(&ctx, SkillId(1), 1).unwrap();
        plan.append_skill(&ctx, SkillId(2), 1).unwrap();
        plan.calc_details_for_character(&ctx, TimeSample::at(T0));

        let statuses: Vec<EntryStatus> = plan.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                EntryStatus::Trained,
                EntryStatus::Trainable,
                EntryStatus::UntrainableButQueued,
            ]
        );

        // Science II from 600 of 1415 SP
        let first = plan.entries()[1].timing.unwrap();
        assert_eq!(first.start_sp, 600);
        assert_eq!(first.dest_sp, 1415);
        assert_eq!(first.skill_duration, (815.0 * 3600.0 / 1800.0) as i64);
        assert_eq!(first.start_time, T0);

        let second = plan.entries()[2].timing.unwrap();
        assert_eq!(second.start_time, first.finish_time);
        assert_eq!(second.train_duration, first.skill_duration + second.skill_duration);
        assert_eq!(plan.total_duration(), second.train_duration);
        assert_eq!(plan.total_plan_sp(), 815 + 500);
        assert_eq!(plan.entries()[0].timing.unwrap().completed, 1.0);
    }

    #[test]
    fn test_live_rate_for_active_entry() {
        let catalog = catalog();
        // Science II ends in 1000 s at 1800 SP/h: 500 SP still to go
        let queue = TrainingQueue::new(vec![QueueEntry::new(SkillId(1), 2, T0 - 10, T0 + 1000, 1415)]);
        let mut character = Character::new(sheet(), queue);
        character.refresh(&catalog, &StandardRules, T0);
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);

        let mut plan = TrainingPlan::new();
        plan.append_skill(&ctx, SkillId(1), 2).unwrap();
        plan.calc_details_for_character(&ctx, TimeSample::at(T0));

        let entry = &plan.entries()[0];
        assert_eq!(entry.status, EntryStatus::Training);
        let timing = entry.timing.unwrap();
        assert_eq!(timing.start_sp, 915);
        assert_eq!(timing.skill_duration, 1000);
    }

    #[test]
    fn test_active_finish_holds_as_clock_advances() {
        let catalog = catalog();
        // 1001 s at 0.5 SP/s leaves a half SP pending
        let queue = TrainingQueue::new(vec![QueueEntry::new(SkillId(1), 2, T0 - 10, T0 + 1001, 1415)]);
        let mut character = Character::new(sheet(), queue);
        character.refresh(&catalog, &StandardRules, T0);
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);

        let mut plan = TrainingPlan::new();
        plan.append_skill(&ctx, SkillId(1), 2).unwrap();

        let start = TimeSample::at(T0);
        for step in 0..10 {
            plan.calc_details_for_character(&ctx, start.advanced(step));
            let timing = plan.entries()[0].timing.unwrap();
            assert_eq!(timing.skill_duration, 1001 - step);
            assert_eq!(timing.finish_time, T0 + 1001);
        }
    }

    #[test]
    fn test_zero_rate_leaves_timing_unknown() {
        let catalog = catalog();
        let character = Character::new(sheet(), TrainingQueue::new(Vec::new()));
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);

        let mut plan = TrainingPlan::new();
        plan.append_skill(&ctx, SkillId(1), 2).unwrap();
        plan.calc_details(&ctx, TimeSample::at(T0), &Attributes::default(), false);

        assert!(plan.iter().all(|e| !e.is_rate_known()));
        assert_eq!(plan.total_duration(), 0);
        assert_eq!(plan.spph(), None);
    }

    #[test]
    fn test_cleanup_removes_reached_levels() {
        let catalog = catalog();
        let character = Character::new(sheet(), TrainingQueue::new(Vec::new()));
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);

        let mut plan = TrainingPlan::new();
        plan.append_skill(&ctx, SkillId(1), 1).unwrap();
        plan.append_skill(&ctx, SkillId(1), 3).unwrap();
        assert_eq!(plan.cleanup(ctx.sheet()), 1);
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|e| e.level > 1));
    }
}
