//! Attribute implants

use serde::{Deserialize, Serialize};

use super::Attributes;

/// A plugged implant and the attribute bonus it grants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implant {
    pub type_id: u32,
    pub name: String,
    #[serde(default)]
    pub bonus: Attributes,
}

impl Implant {
    pub fn new(type_id: u32, name: impl Into<String>, bonus: Attributes) -> Self {
        Self {
            type_id,
            name: name.into(),
            bonus,
        }
    }

    /// Look up one of the basic attribute implants by type id
    pub fn standard(type_id: u32) -> Option<Implant> {
        let (name, bonus) = match type_id {
            10226 => ("Limited Social Adaptation Chip", Attributes::new(0, 0, 5, 0, 0)),
            10208 => ("Limited Memory Augmentation", Attributes::new(0, 4, 0, 0, 0)),
            10216 => ("Limited Ocular Filter", Attributes::new(0, 0, 0, 4, 0)),
            10221 => ("Limited Cybernetic Subprocessor", Attributes::new(4, 0, 0, 0, 0)),
            10213 => ("Limited Neural Boost", Attributes::new(0, 0, 0, 0, 5)),
            _ => return None,
        };
        Some(Implant::new(type_id, name, bonus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_implants_known() {
        let chip = Implant::standard(10226).unwrap();
        assert_eq!(chip.bonus.charisma, 5);
        assert!(Implant::standard(1).is_none());
    }

    #[test]
    fn test_implant_bonuses_sum() {
        let implants: Vec<Implant> = [10208, 10216, 10221]
            .iter()
            .filter_map(|id| Implant::standard(*id))
            .collect();
        let bonus = Attributes::from_implants(&implants);
        assert_eq!(bonus, Attributes::new(4, 4, 0, 4, 0));
    }
}
