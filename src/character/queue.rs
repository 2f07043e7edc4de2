//! Server-side training queue

use serde::{Deserialize, Serialize};

use crate::core::types::{Level, SkillId, SkillPoints, Timestamp};

/// One committed queue slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub skill_id: SkillId,
    pub to_level: Level,
    /// Absent while the queue is paused
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    /// SP the skill will hold once this entry finishes
    pub end_sp: SkillPoints,
}

impl QueueEntry {
    pub fn new(
        skill_id: SkillId,
        to_level: Level,
        start_time: Timestamp,
        end_time: Timestamp,
        end_sp: SkillPoints,
    ) -> Self {
        Self {
            skill_id,
            to_level,
            start_time: Some(start_time),
            end_time: Some(end_time),
            end_sp,
        }
    }

    pub fn has_started(&self, now: Timestamp) -> bool {
        self.start_time.map_or(false, |t| t <= now)
    }

    pub fn has_finished(&self, now: Timestamp) -> bool {
        self.end_time.map_or(false, |t| t <= now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingQueue {
    pub valid: bool,
    entries: Vec<QueueEntry>,
}

impl TrainingQueue {
    pub fn new(entries: Vec<QueueEntry>) -> Self {
        Self {
            valid: true,
            entries,
        }
    }

    /// Placeholder for a queue that has not been fetched yet
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued skills without a schedule are not training
    pub fn is_paused(&self) -> bool {
        self.entries
            .first()
            .map_or(false, |e| e.start_time.is_none() || e.end_time.is_none())
    }

    /// First entry whose end time lies in the future, with its position
    pub fn active_at(&self, now: Timestamp) -> Option<(usize, &QueueEntry)> {
        if !self.valid || self.is_paused() {
            return None;
        }
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.end_time.map_or(false, |t| t > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_is_first_unfinished_entry() {
        let queue = TrainingQueue::new(vec![
            QueueEntry::new(SkillId(1), 2, 0, 100, 1415),
            QueueEntry::new(SkillId(1), 3, 100, 500, 8000),
            QueueEntry::new(SkillId(2), 1, 500, 600, 250),
        ]);

        let (pos, entry) = queue.active_at(50).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(entry.to_level, 2);

        // End time reached counts as finished
        let (pos, _) = queue.active_at(100).unwrap();
        assert_eq!(pos, 1);

        assert!(queue.active_at(600).is_none());
    }

    #[test]
    fn test_paused_queue_has_no_active_entry() {
        let queue = TrainingQueue::new(vec![QueueEntry {
            skill_id: SkillId(1),
            to_level: 1,
            start_time: None,
            end_time: None,
            end_sp: 250,
        }]);
        assert!(queue.is_paused());
        assert!(queue.active_at(0).is_none());
    }

    #[test]
    fn test_invalid_queue_has_no_active_entry() {
        assert!(TrainingQueue::invalid().active_at(0).is_none());
        assert!(!TrainingQueue::new(Vec::new()).is_paused());
    }
}
