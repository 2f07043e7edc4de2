//! Integration tests for plan building
//!
//! Covers dependency expansion from a TOML catalog, certificate appends,
//! release with pruning, and how failed appends leave the plan.

use skillplan::attributes::Attributes;
use skillplan::catalog::{SkillCatalog, StandardRules};
use skillplan::character::{Character, CharacterSheet, TrainingQueue};
use skillplan::core::types::{CertificateId, Level, SkillId};
use skillplan::core::PlanError;
use skillplan::plan::{PlanContext, TrainingPlan};

const CATALOG: &str = r#"
[[groups]]
id = 255
name = "Gunnery"

[[skills]]
id = 1
name = "Alpha"
group = 255
rank = 1
primary = "perception"
secondary = "willpower"
prerequisites = [{ skill = 2, level = 1 }]

[[skills]]
id = 2
name = "Bravo"
group = 255
rank = 1
primary = "perception"
secondary = "willpower"

[[skills]]
id = 3
name = "Charlie"
group = 255
rank = 3
primary = "memory"
secondary = "intelligence"
prerequisites = [{ skill = 1, level = 3 }, { skill = 2, level = 2 }]

[[certificates]]
id = 100
name = "Cert C"
skill_prerequisites = [{ skill = 1, level = 2 }, { skill = 2, level = 1 }]

[[certificates]]
id = 101
name = "Cert D"
certificate_prerequisites = [100]
skill_prerequisites = [{ skill = 3, level = 1 }]
"#;

fn catalog() -> SkillCatalog {
    SkillCatalog::parse_toml(CATALOG).unwrap().0
}

fn pilot() -> Character {
    let sheet = CharacterSheet::new("Pilot").with_attributes(Attributes::uniform(20), Attributes::default());
    Character::new(sheet, TrainingQueue::new(Vec::new()))
}

fn order(plan: &TrainingPlan) -> Vec<(u32, Level)> {
    plan.iter().map(|e| (e.skill.id.0, e.level)).collect()
}

/// Every (S, L > 1) entry follows (S, L - 1) unless the character holds L - 1
fn levels_in_order(plan: &TrainingPlan, sheet: &CharacterSheet) -> bool {
    plan.iter().enumerate().all(|(i, e)| {
        e.level == 1
            || sheet.level_for(e.skill.id) >= e.level - 1
            || plan.entries()[..i]
                .iter()
                .any(|p| p.skill.id == e.skill.id && p.level == e.level - 1)
    })
}

#[test]
fn test_catalog_fixture_is_consistent() {
    let catalog = catalog();
    assert_eq!(catalog.skill_count(), 3);
    assert_eq!(catalog.certificate_count(), 2);
    assert!(catalog.validate().is_empty());
}

#[test]
fn test_certificate_expansion_never_duplicates() {
    let catalog = catalog();
    let character = pilot();
    let ctx = PlanContext::new(&catalog, &StandardRules, &character);

    let mut plan = TrainingPlan::new();
    let diagnostics = plan.append_cert(&ctx, CertificateId(100)).unwrap();
    assert!(diagnostics.is_empty());

    assert_eq!(order(&plan), vec![(2, 1), (1, 1), (1, 2)]);
    let objectives: Vec<bool> = plan.iter().map(|e| e.objective).collect();
    assert_eq!(objectives, vec![true, false, true]);
}

#[test]
fn test_nested_certificate_expansion() {
    let catalog = catalog();
    let character = pilot();
    let ctx = PlanContext::new(&catalog, &StandardRules, &character);

    let mut plan = TrainingPlan::new();
    plan.append_cert(&ctx, CertificateId(101)).unwrap();

    assert_eq!(
        order(&plan),
        vec![(2, 1), (1, 1), (1, 2), (1, 3), (2, 2), (3, 1)]
    );
    assert!(levels_in_order(&plan, ctx.sheet()));
    assert!(plan.last().unwrap().objective);
}

#[test]
fn test_release_then_prune_is_idempotent() {
    let catalog = catalog();
    let character = pilot();
    let ctx = PlanContext::new(&catalog, &StandardRules, &character);

    let mut plan = TrainingPlan::new();
    plan.append_skill(&ctx, SkillId(3), 1).unwrap();
    plan.append_skill(&ctx, SkillId(2), 1).unwrap();
    let before = plan.len();

    let index = plan.iter().position(|e| e.skill.id == SkillId(3)).unwrap();
    let removed = plan.release(index).unwrap();

    assert_eq!(plan.len(), before - removed);
    assert_eq!(order(&plan), vec![(2, 1)]);
    for i in 0..plan.len() {
        assert!(plan.entries()[i].objective || plan.is_dependency(i));
    }
    assert_eq!(plan.prune(), 0);
}

#[test]
fn test_failed_append_leaves_plan_untouched() {
    let mut catalog = catalog();
    let character = pilot();

    let mut plan = TrainingPlan::new();
    {
        let ctx = PlanContext::new(&catalog, &StandardRules, &character);
        plan.append_skill(&ctx, SkillId(2), 2).unwrap();
    }
    let before = plan.to_records();

    catalog.insert_skill(
        skillplan::catalog::SkillDefinition::new(
            SkillId(4),
            "Delta",
            1,
            skillplan::attributes::Attribute::Charisma,
            skillplan::attributes::Attribute::Willpower,
        )
        .with_prerequisite(SkillId(5), 1),
    );
    catalog.insert_skill(
        skillplan::catalog::SkillDefinition::new(
            SkillId(5),
            "Echo",
            1,
            skillplan::attributes::Attribute::Charisma,
            skillplan::attributes::Attribute::Willpower,
        )
        .with_prerequisite(SkillId(4), 2),
    );
    assert!(!catalog.validate().is_empty());

    let ctx = PlanContext::new(&catalog, &StandardRules, &character);
    let err = plan.append_skill(&ctx, SkillId(5), 1).unwrap_err();
    assert!(matches!(err, PlanError::DependencyCycle { .. }));
    assert!(err.to_string().starts_with("Dependency cycle"));
    assert_eq!(plan.to_records(), before);

    assert_eq!(
        plan.append_skill(&ctx, SkillId(42), 1),
        Err(PlanError::UnknownSkill(SkillId(42)))
    );
    assert_eq!(plan.to_records(), before);
}

#[test]
fn test_trained_prerequisites_are_skipped() {
    let catalog = catalog();
    let sheet = CharacterSheet::new("Veteran")
        .with_attributes(Attributes::uniform(20), Attributes::default())
        .with_skill(SkillId(2), 2, 1415)
        .with_skill(SkillId(1), 2, 1415);
    let character = Character::new(sheet, TrainingQueue::new(Vec::new()));
    let ctx = PlanContext::new(&catalog, &StandardRules, &character);

    let mut plan = TrainingPlan::new();
    plan.append_skill(&ctx, SkillId(3), 2).unwrap();

    assert_eq!(order(&plan), vec![(1, 3), (3, 1), (3, 2)]);
    assert!(levels_in_order(&plan, ctx.sheet()));
}
