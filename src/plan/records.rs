//! Plan persistence
//!
//! A plan is stored as an ordered list of (skill, level, objective, notes)
//! tuples. Loading resolves each skill against the catalog and skips the
//! rows that cannot be resolved.
//!
//! ```toml
//! [[entries]]
//! skill_id = 3300
//! level = 1
//! objective = false
//!
//! [[entries]]
//! skill_id = 3300
//! level = 2
//! objective = true
//! notes = "before the next remap"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{PlanEntry, TrainingPlan};
use crate::catalog::SkillCatalog;
use crate::core::error::{LoadError, PlanError};
use crate::core::types::{Level, SkillId, MAX_SKILL_LEVEL};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub skill_id: SkillId,
    /// Signed so malformed files are reported rather than rejected wholesale
    pub level: i32,
    pub objective: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl PlanRecord {
    pub fn from_entry(entry: &PlanEntry) -> Self {
        Self {
            skill_id: entry.skill.id,
            level: entry.level as i32,
            objective: entry.objective,
            notes: entry.notes.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TomlPlan {
    #[serde(default)]
    entries: Vec<PlanRecord>,
}

impl TrainingPlan {
    /// Rebuild a plan from stored records
    ///
    /// Records naming an unknown skill or an out of range level are skipped
    /// and reported; the order of the rest is kept as stored.
    pub fn from_records(records: &[PlanRecord], catalog: &SkillCatalog) -> (TrainingPlan, Vec<PlanError>) {
        let mut plan = TrainingPlan::new();
        let mut diagnostics = Vec::new();

        for record in records {
            if record.level < 1 || record.level > MAX_SKILL_LEVEL as i32 {
                tracing::warn!("Skipping skill {} with invalid level {}", record.skill_id, record.level);
                diagnostics.push(PlanError::InvalidLevel {
                    skill: record.skill_id,
                    level: record.level,
                });
                continue;
            }
            let Some(skill) = catalog.skill(record.skill_id) else {
                tracing::warn!("Skipping unknown skill {} in stored plan", record.skill_id);
                diagnostics.push(PlanError::UnknownSkill(record.skill_id));
                continue;
            };

            let entry = PlanEntry::new(skill.clone(), record.level as Level, record.objective)
                .with_notes(record.notes.clone());
            plan.push_entry(entry);
        }

        (plan, diagnostics)
    }

    /// Load a stored plan from a TOML file
    pub fn load_from_toml(path: &Path, catalog: &SkillCatalog) -> Result<(TrainingPlan, Vec<PlanError>), LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content, catalog)
    }

    pub fn parse_toml(content: &str, catalog: &SkillCatalog) -> Result<(TrainingPlan, Vec<PlanError>), LoadError> {
        let data: TomlPlan = toml::from_str(content)?;
        Ok(Self::from_records(&data.entries, catalog))
    }

    pub fn to_toml(&self) -> Result<String, LoadError> {
        let data = TomlPlan {
            entries: self.to_records(),
        };
        Ok(toml::to_string(&data)?)
    }

    pub fn save_to_toml(&self, path: &Path) -> Result<(), LoadError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::catalog::SkillDefinition;

    fn catalog() -> SkillCatalog {
        let mut catalog = SkillCatalog::new();
        catalog.insert_skill(SkillDefinition::new(SkillId(3300), "Gunnery", 1, Attribute::Perception, Attribute::Willpower));
        catalog
    }

    #[test]
    fn test_bad_records_skipped() {
        let records = vec![
            PlanRecord { skill_id: SkillId(3300), level: 1, objective: false, notes: String::new() },
            PlanRecord { skill_id: SkillId(9), level: 1, objective: true, notes: String::new() },
            PlanRecord { skill_id: SkillId(3300), level: 0, objective: true, notes: String::new() },
            PlanRecord { skill_id: SkillId(3300), level: 2, objective: true, notes: "soon".into() },
        ];
        let (plan, diagnostics) = TrainingPlan::from_records(&records, &catalog());

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.entries()[1].notes, "soon");
        assert_eq!(
            diagnostics,
            vec![
                PlanError::UnknownSkill(SkillId(9)),
                PlanError::InvalidLevel { skill: SkillId(3300), level: 0 },
            ]
        );
        assert_eq!(plan.to_records(), vec![records[0].clone(), records[3].clone()]);
    }

    #[test]
    fn test_toml_keeps_order_and_notes() {
        let content = r#"
[[entries]]
skill_id = 3300
level = 1
objective = false

[[entries]]
skill_id = 3300
level = 2
objective = true
notes = "before the next remap"
"#;
        let (plan, diagnostics) = TrainingPlan::parse_toml(content, &catalog()).unwrap();
        assert!(diagnostics.is_empty());

        let written = plan.to_toml().unwrap();
        let (reloaded, _) = TrainingPlan::parse_toml(&written, &catalog()).unwrap();
        assert_eq!(reloaded.to_records(), plan.to_records());
        assert_eq!(reloaded.entries()[1].notes, "before the next remap");
    }
}
