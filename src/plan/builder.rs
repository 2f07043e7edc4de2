//! Dependency-correct plan construction
//!
//! Appending (skill, level) first appends whatever the character is missing
//! to train it: the previous level for levels above 1, the declared
//! prerequisites for level 1. Resolution runs on an explicit stack with an
//! in-progress marker set so a cyclic catalog is reported instead of
//! recursing forever.

use ahash::AHashSet;
use std::sync::Arc;

use super::{PlanContext, PlanEntry, TrainingPlan};
use crate::catalog::SkillDefinition;
use crate::core::error::{CycleNode, PlanError, Result};
use crate::core::types::{CertificateId, Level, SkillId, MAX_SKILL_LEVEL};

/// A (skill, level) whose requirements are being appended
struct Frame {
    skill: Arc<SkillDefinition>,
    level: Level,
    objective: bool,
    children: Vec<(SkillId, Level)>,
    next: usize,
}

impl Frame {
    fn key(&self) -> (SkillId, Level) {
        (self.skill.id, self.level)
    }
}

impl TrainingPlan {
    /// Append `level` of `skill` as an objective
    pub fn append_skill(&mut self, ctx: &PlanContext, skill: SkillId, level: Level) -> Result<()> {
        self.append(ctx, skill, level, true)
    }

    /// Append (skill, level) after everything it depends on
    ///
    /// On error the plan is left exactly as it was.
    pub fn append(
        &mut self,
        ctx: &PlanContext,
        skill: SkillId,
        level: Level,
        objective: bool,
    ) -> Result<()> {
        let checkpoint = self.entries.len();
        let result = self.resolve(ctx, skill, level, objective);
        if let Err(err) = &result {
            self.entries.truncate(checkpoint);
            tracing::warn!("Could not append skill {} level {}: {}", skill, level, err);
        }
        result
    }

    fn resolve(
        &mut self,
        ctx: &PlanContext,
        skill: SkillId,
        level: Level,
        objective: bool,
    ) -> Result<()> {
        let Some(root) = self.enter(ctx, skill, level, objective)? else {
            return Ok(());
        };

        let mut in_progress: AHashSet<(SkillId, Level)> = AHashSet::new();
        in_progress.insert(root.key());
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            match top.children.get(top.next).copied() {
                Some((child_id, child_level)) => {
                    top.next += 1;
                    if in_progress.contains(&(child_id, child_level)) {
                        return Err(cycle_error(&stack, (child_id, child_level)));
                    }
                    if let Some(frame) = self.enter(ctx, child_id, child_level, false)? {
                        in_progress.insert(frame.key());
                        stack.push(frame);
                    }
                }
                None => {
                    if let Some(frame) = stack.pop() {
                        in_progress.remove(&frame.key());
                        let entry = PlanEntry::new(frame.skill, frame.level, frame.objective);
                        tracing::debug!("Appending {} (objective: {})", entry.label(), entry.objective);
                        self.push_entry(entry);
                    }
                }
            }
        }
        Ok(())
    }

    /// Decide whether (skill, level) needs a new entry and what it needs first
    fn enter(
        &mut self,
        ctx: &PlanContext,
        skill: SkillId,
        level: Level,
        objective: bool,
    ) -> Result<Option<Frame>> {
        if level == 0 {
            return Ok(None);
        }
        if level > MAX_SKILL_LEVEL {
            return Err(PlanError::InvalidLevel {
                skill,
                level: level as i32,
            });
        }
        let definition = ctx
            .catalog
            .skill(skill)
            .cloned()
            .ok_or(PlanError::UnknownSkill(skill))?;

        if self.has_plan_skill(skill, level, objective) {
            return Ok(None);
        }
        if !objective && Self::has_char_skill(ctx.sheet(), skill, level) {
            return Ok(None);
        }

        let children = if level == 1 {
            definition
                .prerequisites
                .iter()
                .map(|p| (p.skill, p.level))
                .collect()
        } else {
            vec![(skill, level - 1)]
        };

        Ok(Some(Frame {
            skill: definition,
            level,
            objective,
            children,
            next: 0,
        }))
    }

    /// Append every skill a certificate needs, prerequisite certificates first
    ///
    /// Skills that cannot be appended are skipped and reported in the
    /// returned list. An unknown root certificate or a certificate cycle
    /// fails the whole call.
    pub fn append_cert(&mut self, ctx: &PlanContext, cert: CertificateId) -> Result<Vec<PlanError>> {
        let mut diagnostics = Vec::new();
        let order = certificate_order(ctx, cert, &mut diagnostics)?;

        for id in order {
            let Some(definition) = ctx.catalog.certificate(id) else {
                continue;
            };
            for prereq in &definition.skill_prerequisites {
                if let Err(err) = self.append(ctx, prereq.skill, prereq.level, true) {
                    diagnostics.push(err);
                }
            }
        }
        Ok(diagnostics)
    }

    /// Clear the objective flag at `index` and prune what is no longer needed
    ///
    /// Returns how many entries were removed.
    pub fn release(&mut self, index: usize) -> Result<usize> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(PlanError::IndexOutOfRange { index, len })?;
        entry.objective = false;
        Ok(self.prune())
    }

    /// Remove non-objective entries nothing depends on, until none are left
    pub fn prune(&mut self) -> usize {
        let mut total = 0;
        loop {
            let mut removed = 0;
            let mut i = self.entries.len();
            while i > 0 {
                i -= 1;
                if !self.entries[i].objective && !self.is_dependency(i) {
                    let entry = self.entries.remove(i);
                    tracing::debug!("Pruned {}", entry.label());
                    removed += 1;
                }
            }
            if removed == 0 {
                break;
            }
            total += removed;
        }
        total
    }
}

fn cycle_error(stack: &[Frame], repeated: (SkillId, Level)) -> PlanError {
    let start = stack
        .iter()
        .position(|f| f.key() == repeated)
        .unwrap_or(0);
    let mut path: Vec<CycleNode> = stack[start..]
        .iter()
        .map(|f| CycleNode::Skill {
            skill: f.skill.id,
            level: f.level,
        })
        .collect();
    path.push(CycleNode::Skill {
        skill: repeated.0,
        level: repeated.1,
    });
    PlanError::DependencyCycle { path }
}

/// Post-order over certificate prerequisites
fn certificate_order(
    ctx: &PlanContext,
    root: CertificateId,
    diagnostics: &mut Vec<PlanError>,
) -> Result<Vec<CertificateId>> {
    if ctx.catalog.certificate(root).is_none() {
        return Err(PlanError::UnknownCertificate(root));
    }

    let mut order = Vec::new();
    let mut finished: AHashSet<CertificateId> = AHashSet::new();
    let mut on_stack: AHashSet<CertificateId> = AHashSet::new();
    let mut stack: Vec<(CertificateId, usize)> = vec![(root, 0)];
    on_stack.insert(root);

    while let Some(&(current, next)) = stack.last() {
        let deps = ctx
            .catalog
            .certificate(current)
            .map(|c| c.certificate_prerequisites.as_slice())
            .unwrap_or(&[]);

        match deps.get(next).copied() {
            Some(child) => {
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if on_stack.contains(&child) {
                    let start = stack.iter().position(|(id, _)| *id == child).unwrap_or(0);
                    let mut path: Vec<CycleNode> = stack[start..]
                        .iter()
                        .map(|(id, _)| CycleNode::Certificate(*id))
                        .collect();
                    path.push(CycleNode::Certificate(child));
                    return Err(PlanError::DependencyCycle { path });
                }
                if finished.contains(&child) {
                    continue;
                }
                if ctx.catalog.certificate(child).is_none() {
                    tracing::warn!("Certificate {} requires unknown certificate {}", current, child);
                    diagnostics.push(PlanError::UnknownCertificate(child));
                    continue;
                }
                on_stack.insert(child);
                stack.push((child, 0));
            }
            None => {
                stack.pop();
                on_stack.remove(&current);
                finished.insert(current);
                order.push(current);
            }
        }
    }
    Ok(order)
}
