//! Skill and certificate catalog
//!
//! Static definitions consumed read-only by the planner. The catalog is
//! handed to every operation that needs it; nothing reaches for a global
//! instance.

pub mod certificate;
pub mod loader;
pub mod rules;
pub mod skill;

pub use certificate::CertificateDefinition;
pub use rules::{GameRules, StandardRules};
pub use skill::{Prerequisite, SkillDefinition, SkillGroup};

use ahash::{AHashMap, AHashSet};
use std::sync::Arc;

use crate::core::error::{CycleNode, PlanError};
use crate::core::types::{CertificateId, GroupId, SkillId};

/// Catalog of all known skills, groups and certificates
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    /// Skills indexed by ID, shared with plan entries
    skills: AHashMap<SkillId, Arc<SkillDefinition>>,
    /// Map from name to ID for lookup by name
    by_name: AHashMap<String, SkillId>,
    groups: AHashMap<GroupId, SkillGroup>,
    certificates: AHashMap<CertificateId, CertificateDefinition>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skill, replacing any previous definition with the same id
    pub fn insert_skill(&mut self, skill: SkillDefinition) {
        self.by_name.insert(skill.name.clone(), skill.id);
        self.skills.insert(skill.id, Arc::new(skill));
    }

    pub fn insert_group(&mut self, group: SkillGroup) {
        self.groups.insert(group.id, group);
    }

    pub fn insert_certificate(&mut self, certificate: CertificateDefinition) {
        self.certificates.insert(certificate.id, certificate);
    }

    pub fn skill(&self, id: SkillId) -> Option<&Arc<SkillDefinition>> {
        self.skills.get(&id)
    }

    pub fn skill_by_name(&self, name: &str) -> Option<&Arc<SkillDefinition>> {
        self.by_name.get(name).and_then(|id| self.skills.get(id))
    }

    pub fn group(&self, id: GroupId) -> Option<&SkillGroup> {
        self.groups.get(&id)
    }

    pub fn certificate(&self, id: CertificateId) -> Option<&CertificateDefinition> {
        self.certificates.get(&id)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn certificate_count(&self) -> usize {
        self.certificates.len()
    }

    /// Skills sorted by id
    pub fn skills(&self) -> Vec<&Arc<SkillDefinition>> {
        let mut skills: Vec<_> = self.skills.values().collect();
        skills.sort_by_key(|s| s.id);
        skills
    }

    /// Check every cross reference and look for prerequisite cycles
    ///
    /// Returns one diagnostic per problem; an empty list means the catalog
    /// is consistent.
    pub fn validate(&self) -> Vec<PlanError> {
        let mut problems = Vec::new();

        for skill in self.skills() {
            for prereq in &skill.prerequisites {
                if !self.skills.contains_key(&prereq.skill) {
                    problems.push(PlanError::UnknownSkill(prereq.skill));
                }
            }
        }

        let mut cert_ids: Vec<_> = self.certificates.keys().copied().collect();
        cert_ids.sort();
        for id in &cert_ids {
            let cert = &self.certificates[id];
            for prereq in &cert.skill_prerequisites {
                if !self.skills.contains_key(&prereq.skill) {
                    problems.push(PlanError::UnknownSkill(prereq.skill));
                }
            }
            for dep in &cert.certificate_prerequisites {
                if !self.certificates.contains_key(dep) {
                    problems.push(PlanError::UnknownCertificate(*dep));
                }
            }
        }

        problems.extend(self.find_skill_cycles());
        problems.extend(self.find_certificate_cycles(&cert_ids));
        problems
    }

    /// Depth-first walk over skill prerequisites with in-progress markers
    fn find_skill_cycles(&self) -> Vec<PlanError> {
        let mut cycles = Vec::new();
        let mut finished: AHashSet<SkillId> = AHashSet::new();

        for root in self.skills() {
            if finished.contains(&root.id) {
                continue;
            }
            // (skill, index of next prerequisite to visit)
            let mut stack: Vec<(SkillId, usize)> = vec![(root.id, 0)];
            let mut on_stack: AHashSet<SkillId> = AHashSet::new();
            on_stack.insert(root.id);

            while let Some(&(current, next)) = stack.last() {
                let prereqs = self
                    .skills
                    .get(&current)
                    .map(|s| s.prerequisites.as_slice())
                    .unwrap_or(&[]);

                match prereqs.get(next) {
                    Some(prereq) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        let child = prereq.skill;
                        if on_stack.contains(&child) {
                            cycles.push(skill_cycle(&stack, child));
                        } else if !finished.contains(&child) && self.skills.contains_key(&child) {
                            on_stack.insert(child);
                            stack.push((child, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        on_stack.remove(&current);
                        finished.insert(current);
                    }
                }
            }
        }
        cycles
    }

    fn find_certificate_cycles(&self, cert_ids: &[CertificateId]) -> Vec<PlanError> {
        let mut cycles = Vec::new();
        let mut finished: AHashSet<CertificateId> = AHashSet::new();

        for &root in cert_ids {
            if finished.contains(&root) {
                continue;
            }
            let mut stack: Vec<(CertificateId, usize)> = vec![(root, 0)];
            let mut on_stack: AHashSet<CertificateId> = AHashSet::new();
            on_stack.insert(root);

            while let Some(&(current, next)) = stack.last() {
                let deps = self
                    .certificates
                    .get(&current)
                    .map(|c| c.certificate_prerequisites.as_slice())
                    .unwrap_or(&[]);

                match deps.get(next) {
                    Some(&child) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        if on_stack.contains(&child) {
                            cycles.push(certificate_cycle(&stack, child));
                        } else if !finished.contains(&child) && self.certificates.contains_key(&child) {
                            on_stack.insert(child);
                            stack.push((child, 0));
                        }
                    }
                    None => {
                        stack.pop();
                        on_stack.remove(&current);
                        finished.insert(current);
                    }
                }
            }
        }
        cycles
    }
}

fn skill_cycle(stack: &[(SkillId, usize)], repeated: SkillId) -> PlanError {
    let start = stack.iter().position(|(id, _)| *id == repeated).unwrap_or(0);
    let mut path: Vec<CycleNode> = stack[start..]
        .iter()
        .map(|(id, _)| CycleNode::Skill { skill: *id, level: 1 })
        .collect();
    path.push(CycleNode::Skill { skill: repeated, level: 1 });
    PlanError::DependencyCycle { path }
}

fn certificate_cycle(stack: &[(CertificateId, usize)], repeated: CertificateId) -> PlanError {
    let start = stack.iter().position(|(id, _)| *id == repeated).unwrap_or(0);
    let mut path: Vec<CycleNode> = stack[start..]
        .iter()
        .map(|(id, _)| CycleNode::Certificate(*id))
        .collect();
    path.push(CycleNode::Certificate(repeated));
    PlanError::DependencyCycle { path }
}
