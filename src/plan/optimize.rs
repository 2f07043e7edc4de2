//! Attribute remap search
//!
//! Walks every base-attribute allocation the remap rules allow and keeps the
//! one that finishes the plan soonest. Each candidate simulates its own copy
//! of the plan, so candidates are independent and evaluated in parallel
//! once there are enough of them. The lattice is streamed, never collected.

use rayon::prelude::*;
use serde::Serialize;

use super::{PlanContext, TrainingPlan};
use crate::attributes::{AttributeBounds, Attributes};
use crate::core::clock::TimeSample;
use crate::core::config::PlannerConfig;
use crate::core::error::{PlanError, Result};

/// Outcome of an attribute search
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// Plan duration in seconds with the best allocation
    pub duration: i64,
    /// Plan duration with the current allocation, when it has a known rate
    pub current_duration: Option<i64>,
    /// Best base attributes
    pub base: Attributes,
    /// Best base attributes plus implants
    pub total: Attributes,
    /// Average SP/hour of the plan with the best allocation
    pub spph: Option<f64>,
    /// Allocations that produced a known duration
    pub candidates_evaluated: usize,
}

impl OptimizationResult {
    /// Seconds saved compared to the current allocation
    pub fn time_saved(&self) -> Option<i64> {
        self.current_duration.map(|current| current - self.duration)
    }
}

/// Every base allocation spending exactly `pool` points above the minimum
///
/// Intelligence, Memory, Charisma and Perception are enumerated in that
/// order from the minimum upwards; Willpower takes the remainder and
/// combinations pushing it outside the bounds are skipped.
pub fn allocation_lattice(bounds: AttributeBounds, pool: i32) -> impl Iterator<Item = Attributes> {
    let span = bounds.span().max(0);
    let min = bounds.min;

    (0..=span).flat_map(move |int| {
        (0..=span).flat_map(move |mem| {
            (0..=span).flat_map(move |cha| {
                (0..=span).filter_map(move |per| {
                    let wil = pool - int - mem - cha - per;
                    (0..=span)
                        .contains(&wil)
                        .then(|| Attributes::new(min + int, min + mem, min + cha, min + per, min + wil))
                })
            })
        })
    })
}

/// Total plan duration for `attributes`, or `None` when any entry's rate is unknown
fn simulated_duration(
    plan: &TrainingPlan,
    ctx: &PlanContext,
    now: TimeSample,
    attributes: &Attributes,
) -> Option<i64> {
    let mut copy = plan.clone();
    copy.calc_details(ctx, now, attributes, false);
    copy.iter()
        .all(|e| e.is_rate_known())
        .then(|| copy.total_duration())
}

/// Best (duration, enumeration index, base) seen so far
type Candidate = (i64, usize, Attributes);

fn keep_best(a: Option<Candidate>, b: Option<Candidate>) -> Option<Candidate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if (b.0, b.1) < (a.0, a.1) { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn tally((count, best): (usize, Option<Candidate>), candidate: Candidate) -> (usize, Option<Candidate>) {
    (count + 1, keep_best(best, Some(candidate)))
}

fn merge(
    (left, a): (usize, Option<Candidate>),
    (right, b): (usize, Option<Candidate>),
) -> (usize, Option<Candidate>) {
    (left + right, keep_best(a, b))
}

/// Find the base allocation that finishes `plan` soonest
///
/// The current allocation is the baseline: a candidate replaces it only when
/// strictly faster, and among equally fast candidates the first in
/// enumeration order wins. The plan itself is not modified.
pub fn optimize_attributes(
    plan: &TrainingPlan,
    ctx: &PlanContext,
    config: &PlannerConfig,
    now: TimeSample,
) -> Result<OptimizationResult> {
    if plan.is_empty() {
        return Err(PlanError::EmptyPlan);
    }

    let sheet = ctx.sheet();
    let bounds = config.bounds();
    let implant = sheet.implant;
    let current_base = sheet.base;
    let current_duration = simulated_duration(plan, ctx, now, &(current_base + implant));

    let pool = current_base.distributable_points(bounds);
    let lattice_size = allocation_lattice(bounds, pool).count();
    let lattice = allocation_lattice(bounds, pool).enumerate();

    let evaluate = |(index, base): (usize, Attributes)| {
        simulated_duration(plan, ctx, now, &(base + implant)).map(|duration| (duration, index, base))
    };

    let (evaluated, best) = if lattice_size >= config.parallel_threshold {
        tracing::debug!("Evaluating {} allocations in parallel", lattice_size);
        lattice
            .par_bridge()
            .filter_map(evaluate)
            .fold(|| (0, None), tally)
            .reduce(|| (0, None), merge)
    } else {
        tracing::debug!("Evaluating {} allocations", lattice_size);
        lattice.filter_map(evaluate).fold((0, None), tally)
    };
    if evaluated < lattice_size {
        tracing::debug!("{} allocations had no known rate", lattice_size - evaluated);
    }

    let (duration, base) = match (best, current_duration) {
        (Some((duration, _, base)), Some(current)) if duration < current => (duration, base),
        (_, Some(current)) => (current, current_base),
        (Some((duration, _, base)), None) => (duration, base),
        (None, None) => return Err(PlanError::NoViableAllocation),
    };

    let total = base + implant;
    let mut best_plan = plan.clone();
    best_plan.calc_details(ctx, now, &total, false);

    Ok(OptimizationResult {
        duration,
        current_duration,
        base,
        total,
        spph: best_plan.spph(),
        candidates_evaluated: evaluated,
    })
}
