use serde::{Deserialize, Serialize};

use super::skill::Prerequisite;
use crate::core::types::{CertificateId, Level, SkillId};

/// A certificate: a named bundle of skill requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDefinition {
    pub id: CertificateId,
    pub name: String,
    #[serde(default)]
    pub skill_prerequisites: Vec<Prerequisite>,
    #[serde(default)]
    pub certificate_prerequisites: Vec<CertificateId>,
}

impl CertificateDefinition {
    pub fn new(id: CertificateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            skill_prerequisites: Vec::new(),
            certificate_prerequisites: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: SkillId, level: Level) -> Self {
        self.skill_prerequisites.push(Prerequisite::new(skill, level));
        self
    }

    pub fn with_certificate(mut self, certificate: CertificateId) -> Self {
        self.certificate_prerequisites.push(certificate);
        self
    }
}
