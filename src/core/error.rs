use std::fmt;

use thiserror::Error;

use crate::core::types::{roman_level, CertificateId, Level, SkillId};

/// One node on a detected prerequisite cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleNode {
    Skill { skill: SkillId, level: Level },
    Certificate(CertificateId),
}

impl fmt::Display for CycleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleNode::Skill { skill, level } => write!(f, "skill {} {}", skill, roman_level(*level)),
            CycleNode::Certificate(cert) => write!(f, "certificate {}", cert),
        }
    }
}

fn format_cycle(path: &[CycleNode]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Unknown skill: {0}")]
    UnknownSkill(SkillId),

    #[error("Unknown certificate: {0}")]
    UnknownCertificate(CertificateId),

    #[error("Invalid level {level} for skill {skill}")]
    InvalidLevel { skill: SkillId, level: i32 },

    #[error("Dependency cycle: {}", format_cycle(.path))]
    DependencyCycle { path: Vec<CycleNode> },

    #[error("Plan index {index} out of range (plan has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Plan is empty")]
    EmptyPlan,

    #[error("No attribute allocation yields a known training rate")]
    NoViableAllocation,
}

/// Errors raised while reading fixture or configuration files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] crate::core::config::ConfigError),

    #[error("Invalid data: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_names_every_node() {
        let err = PlanError::DependencyCycle {
            path: vec![
                CycleNode::Skill { skill: SkillId(1), level: 1 },
                CycleNode::Skill { skill: SkillId(2), level: 3 },
                CycleNode::Skill { skill: SkillId(1), level: 1 },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Dependency cycle: skill 1 I -> skill 2 III -> skill 1 I"
        );
    }

    #[test]
    fn test_unknown_reference_message() {
        assert_eq!(PlanError::UnknownSkill(SkillId(42)).to_string(), "Unknown skill: 42");
        assert_eq!(
            PlanError::UnknownCertificate(CertificateId(9)).to_string(),
            "Unknown certificate: 9"
        );
    }
}
