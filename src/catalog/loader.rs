//! TOML catalog loading
//!
//! Catalog fixtures list groups, skills and certificates:
//!
//! ```toml
//! [[groups]]
//! id = 255
//! name = "Gunnery"
//!
//! [[skills]]
//! id = 3300
//! name = "Gunnery"
//! group = 255
//! rank = 1
//! primary = "perception"
//! secondary = "willpower"
//!
//! [[skills]]
//! id = 3310
//! name = "Rapid Firing"
//! group = 255
//! rank = 2
//! primary = "perception"
//! secondary = "willpower"
//! prerequisites = [{ skill = 3300, level = 2 }]
//! ```

use serde::Deserialize;
use std::path::Path;

use super::{CertificateDefinition, SkillCatalog, SkillDefinition, SkillGroup};
use crate::core::error::LoadError;

/// TOML representation of a catalog file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    #[serde(default)]
    groups: Vec<SkillGroup>,
    #[serde(default)]
    skills: Vec<SkillDefinition>,
    #[serde(default)]
    certificates: Vec<CertificateDefinition>,
}

impl SkillCatalog {
    /// Load a catalog from a TOML file
    ///
    /// Returns the catalog and the rows that were skipped.
    pub fn load_from_toml(path: &Path) -> Result<(Self, Vec<LoadError>), LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    ///
    /// Skills with rank 0 are left out and reported. Cross references are
    /// not checked here; call [`SkillCatalog::validate`] for that.
    pub fn parse_toml(content: &str) -> Result<(Self, Vec<LoadError>), LoadError> {
        let data: TomlCatalog = toml::from_str(content)?;

        let mut catalog = Self::new();
        let mut skipped = Vec::new();
        for group in data.groups {
            catalog.insert_group(group);
        }
        for skill in data.skills {
            if skill.rank == 0 {
                tracing::warn!("Skipping skill {} ({}): rank 0", skill.id, skill.name);
                skipped.push(LoadError::Invalid(format!(
                    "skill {} ({}) has rank 0",
                    skill.id, skill.name
                )));
                continue;
            }
            catalog.insert_skill(skill);
        }
        for certificate in data.certificates {
            catalog.insert_certificate(certificate);
        }
        Ok((catalog, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::core::types::{CertificateId, GroupId, SkillId};

    const CATALOG: &str = r#"
[[groups]]
id = 255
name = "Gunnery"

[[skills]]
id = 3300
name = "Gunnery"
group = 255
rank = 1
primary = "perception"
secondary = "willpower"

[[skills]]
id = 3310
name = "Rapid Firing"
group = 255
rank = 2
primary = "perception"
secondary = "willpower"
prerequisites = [{ skill = 3300, level = 2 }]

[[certificates]]
id = 1
name = "Basic Gunnery"
skill_prerequisites = [{ skill = 3310, level = 1 }]
"#;

    #[test]
    fn test_parse_catalog() {
        let (catalog, skipped) = SkillCatalog::parse_toml(CATALOG).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(catalog.skill_count(), 2);
        assert_eq!(catalog.certificate_count(), 1);

        let rapid = catalog.skill(SkillId(3310)).unwrap();
        assert_eq!(rapid.rank, 2);
        assert_eq!(rapid.primary, Attribute::Perception);
        assert_eq!(rapid.group, GroupId(255));
        assert_eq!(rapid.requires(SkillId(3300)), Some(2));

        let cert = catalog.certificate(CertificateId(1)).unwrap();
        assert_eq!(cert.skill_prerequisites.len(), 1);
        assert!(cert.certificate_prerequisites.is_empty());
        assert_eq!(catalog.group(GroupId(255)).unwrap().name, "Gunnery");
    }

    #[test]
    fn test_rank_zero_skill_skipped() {
        let content = r#"
[[skills]]
id = 1
name = "Broken"
rank = 0
primary = "memory"
secondary = "intelligence"

[[skills]]
id = 2
name = "Sound"
rank = 1
primary = "memory"
secondary = "intelligence"
"#;
        let (catalog, skipped) = SkillCatalog::parse_toml(content).unwrap();
        assert_eq!(catalog.skill_count(), 1);
        assert!(catalog.skill(SkillId(1)).is_none());
        assert!(catalog.skill(SkillId(2)).is_some());
        assert_eq!(skipped.len(), 1);
        assert!(matches!(&skipped[0], LoadError::Invalid(msg) if msg.contains("Broken")));
    }

    #[test]
    fn test_unknown_attribute_is_parse_error() {
        let content = r#"
[[skills]]
id = 1
name = "Broken"
rank = 1
primary = "luck"
secondary = "intelligence"
"#;
        assert!(matches!(
            SkillCatalog::parse_toml(content),
            Err(LoadError::Toml(_))
        ));
    }
}
