//! Skillplan command line
//!
//! Loads a skill catalog, a character and optionally a stored plan, applies
//! the requested appends, then prints the simulated plan and, on request,
//! the best attribute remap.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use skillplan::catalog::{SkillCatalog, StandardRules};
use skillplan::character::{Character, LiveTraining};
use skillplan::core::types::{roman_level, CertificateId, Level, SkillId, SkillPoints, Timestamp};
use skillplan::core::{format_timediff, Clock, FixedClock, PlannerConfig, SystemClock, TimeSample};
use skillplan::plan::{optimize_attributes, EntryStatus, OptimizationResult, PlanContext, TrainingPlan};

/// Skill training planner
#[derive(Parser, Debug)]
#[command(name = "skillplan")]
#[command(about = "Build, simulate and optimize skill training plans")]
struct Args {
    /// Skill catalog (TOML)
    #[arg(long)]
    catalog: PathBuf,

    /// Character fixture (TOML)
    #[arg(long)]
    character: PathBuf,

    /// Stored plan to start from (TOML)
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Planner configuration (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append a skill objective, written ID:LEVEL (repeatable)
    #[arg(long = "skill", value_parser = parse_skill_target)]
    skills: Vec<(SkillId, Level)>,

    /// Append every skill a certificate needs (repeatable)
    #[arg(long = "cert")]
    certs: Vec<u32>,

    /// Drop entries the character has already trained
    #[arg(long)]
    cleanup: bool,

    /// Search for the fastest attribute remap
    #[arg(long)]
    optimize: bool,

    /// Write the resulting plan to this file (TOML)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Evaluate at this Unix time instead of the system clock
    #[arg(long)]
    now: Option<Timestamp>,

    /// Seconds the server clock runs ahead of the local one
    #[arg(long, default_value_t = 0)]
    server_offset: i64,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

fn parse_skill_target(value: &str) -> Result<(SkillId, Level), String> {
    let (id, level) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ID:LEVEL, got '{}'", value))?;
    let id = id.trim().parse::<u32>().map_err(|e| format!("bad skill id '{}': {}", id, e))?;
    let level = level.trim().parse::<Level>().map_err(|e| format!("bad level '{}': {}", level, e))?;
    Ok((SkillId(id), level))
}

/// JSON output structure
#[derive(Serialize)]
struct PlanReport {
    character: String,
    training: String,
    remaining: String,
    live: Option<LiveReport>,
    entries: Vec<EntryReport>,
    total_sp: SkillPoints,
    total_duration: i64,
    spph: Option<f64>,
    optimization: Option<OptimizationResult>,
}

#[derive(Serialize)]
struct LiveReport {
    skill_sp: SkillPoints,
    level_done: f64,
    spph: f64,
    character_sp: Option<SkillPoints>,
}

#[derive(Serialize)]
struct EntryReport {
    skill_id: SkillId,
    name: String,
    level: Level,
    objective: bool,
    status: EntryStatus,
    start_sp: Option<SkillPoints>,
    dest_sp: Option<SkillPoints>,
    finish_time: Option<Timestamp>,
    duration: Option<i64>,
    notes: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skillplan=info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlannerConfig::load_from_toml(path)?,
        None => PlannerConfig::default(),
    };

    let (catalog, skipped) = SkillCatalog::load_from_toml(&args.catalog)?;
    for problem in skipped {
        tracing::warn!("Catalog: {}", problem);
    }
    for problem in catalog.validate() {
        tracing::warn!("Catalog: {}", problem);
    }
    tracing::info!(
        "Loaded {} skills and {} certificates",
        catalog.skill_count(),
        catalog.certificate_count()
    );

    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock::with_server_offset(now, args.server_offset)),
        None => {
            let mut clock = SystemClock::new();
            if args.server_offset != 0 {
                clock.synchronize(clock.local_time() + args.server_offset);
            }
            Box::new(clock)
        }
    };
    let now = TimeSample::take(clock.as_ref());
    let rules = StandardRules;

    let mut character = Character::load_from_toml(&args.character)?;
    character.refresh(&catalog, &rules, now.authoritative);
    let mut live = character.update_live(&catalog, &rules, now.authoritative);
    if let LiveTraining::Completed { .. } = live {
        character.refresh(&catalog, &rules, now.authoritative);
        live = character.update_live(&catalog, &rules, now.authoritative);
    }

    let ctx = PlanContext::new(&catalog, &rules, &character);
    let mut plan = match &args.plan {
        Some(path) => {
            let (plan, problems) = TrainingPlan::load_from_toml(path, &catalog)?;
            for problem in problems {
                tracing::warn!("Stored plan: {}", problem);
            }
            plan
        }
        None => TrainingPlan::new(),
    };

    for &(skill, level) in &args.skills {
        if let Err(err) = plan.append_skill(&ctx, skill, level) {
            tracing::warn!("Skipped --skill {}:{}: {}", skill, level, err);
        }
    }
    for &cert in &args.certs {
        match plan.append_cert(&ctx, CertificateId(cert)) {
            Ok(problems) => {
                for problem in problems {
                    tracing::warn!("Certificate {}: {}", cert, problem);
                }
            }
            Err(err) => tracing::warn!("Skipped --cert {}: {}", cert, err),
        }
    }

    if args.cleanup {
        let removed = plan.cleanup(ctx.sheet());
        tracing::info!("Cleanup removed {} entries", removed);
    }

    plan.calc_details_for_character(&ctx, now);

    let optimization = if args.optimize {
        match optimize_attributes(&plan, &ctx, &config, now) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!("Optimization skipped: {}", err);
                None
            }
        }
    } else {
        None
    };

    if let Some(path) = &args.save {
        plan.save_to_toml(path)?;
        tracing::info!("Plan saved to {}", path.display());
    }

    let report = PlanReport {
        character: character.sheet().name.clone(),
        training: character.training_text(&catalog),
        remaining: character.remaining_text(now.authoritative, false),
        live: match live {
            LiveTraining::Training(progress) => Some(LiveReport {
                skill_sp: progress.skill_sp,
                level_done: progress.level_done,
                spph: progress.spph,
                character_sp: progress.character_sp,
            }),
            _ => None,
        },
        entries: plan
            .iter()
            .map(|e| EntryReport {
                skill_id: e.skill.id,
                name: e.skill.name.clone(),
                level: e.level,
                objective: e.objective,
                status: e.status,
                start_sp: e.timing.map(|t| t.start_sp),
                dest_sp: e.timing.map(|t| t.dest_sp),
                finish_time: e.timing.map(|t| t.finish_time),
                duration: e.timing.map(|t| t.skill_duration),
                notes: e.notes.clone(),
            })
            .collect(),
        total_sp: plan.total_plan_sp(),
        total_duration: plan.total_duration(),
        spph: plan.spph(),
        optimization,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &PlanReport) {
    println!("{}: {} ({})", report.character, report.training, report.remaining);
    if let Some(live) = &report.live {
        println!(
            "  {} SP in skill, {:.1}% of level, {:.0} SP/h",
            live.skill_sp,
            live.level_done * 100.0,
            live.spph
        );
    }
    println!();

    for (i, entry) in report.entries.iter().enumerate() {
        let marker = if entry.objective { '*' } else { ' ' };
        let duration = entry
            .duration
            .map(|d| format_timediff(d, true))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:>3}{} {} {:<5} {:<22} {}",
            i + 1,
            marker,
            entry.name,
            roman_level(entry.level),
            format!("{:?}", entry.status),
            duration
        );
    }

    println!();
    println!(
        "Total: {} SP in {}{}",
        report.total_sp,
        format_timediff(report.total_duration, false),
        report
            .spph
            .map(|s| format!(" ({:.0} SP/h)", s))
            .unwrap_or_default()
    );

    if let Some(result) = &report.optimization {
        let b = result.base;
        println!(
            "Best remap: Int {} Mem {} Cha {} Per {} Wil {} -> {}",
            b.intelligence,
            b.memory,
            b.charisma,
            b.perception,
            b.willpower,
            format_timediff(result.duration, false)
        );
        if let Some(saved) = result.time_saved() {
            println!("Saves {}", format_timediff(saved, false));
        }
    }
}
