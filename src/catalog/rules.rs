//! Game rules: SP cost per level and training speed

use crate::attributes::{Attribute, Attributes};
use crate::catalog::skill::SkillDefinition;
use crate::core::types::{Level, SkillPoints};

/// Base SP of a rank 1 skill at level 1
const BASE_LEVEL_SP: f64 = 250.0;

/// Growth factor of SP cost between levels two apart
const LEVEL_GROWTH: f64 = 32.0;

/// Rules the planner needs from the game
///
/// `Sync` so one rule set can be shared by parallel optimizer candidates.
pub trait GameRules: Send + Sync {
    /// Total SP needed to reach `level` of a skill of `rank`
    ///
    /// Monotone non-decreasing in `level`; level 0 costs nothing.
    fn sp_required(&self, level: Level, rank: u32) -> SkillPoints;

    /// Training speed in SP/hour
    fn training_rate(
        &self,
        primary: Attribute,
        secondary: Attribute,
        rank: u32,
        attributes: &Attributes,
    ) -> f64;

    fn spph_for_skill(&self, skill: &SkillDefinition, attributes: &Attributes) -> f64 {
        self.training_rate(skill.primary, skill.secondary, skill.rank, attributes)
    }
}

/// The game's published formulas
///
/// `sp = ceil(250 * rank * 32^((level - 1) / 2))` and
/// `spph = (primary + secondary / 2) * 60`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl GameRules for StandardRules {
    fn sp_required(&self, level: Level, rank: u32) -> SkillPoints {
        if level == 0 {
            return 0;
        }
        let exponent = (level as f64 - 1.0) / 2.0;
        (BASE_LEVEL_SP * rank as f64 * LEVEL_GROWTH.powf(exponent)).ceil() as SkillPoints
    }

    fn training_rate(
        &self,
        primary: Attribute,
        secondary: Attribute,
        _rank: u32,
        attributes: &Attributes,
    ) -> f64 {
        let primary = attributes.get(primary) as f64;
        let secondary = attributes.get(secondary) as f64;
        ((primary + secondary / 2.0) * 60.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sp_table_rank_one() {
        let rules = StandardRules;
        assert_eq!(rules.sp_required(0, 1), 0);
        assert_eq!(rules.sp_required(1, 1), 250);
        assert_eq!(rules.sp_required(2, 1), 1415);
        assert_eq!(rules.sp_required(3, 1), 8000);
        assert_eq!(rules.sp_required(4, 1), 45255);
        assert_eq!(rules.sp_required(5, 1), 256000);
    }

    #[test]
    fn test_sp_scales_with_rank() {
        let rules = StandardRules;
        assert_eq!(rules.sp_required(1, 3), 750);
        assert_eq!(rules.sp_required(5, 8), 2_048_000);
    }

    #[test]
    fn test_sp_monotone_in_level() {
        let rules = StandardRules;
        for rank in 1..=16 {
            for level in 0..5 {
                assert!(rules.sp_required(level, rank) <= rules.sp_required(level + 1, rank));
            }
        }
    }

    #[test]
    fn test_training_rate() {
        let rules = StandardRules;
        let attrs = Attributes::new(27, 21, 17, 17, 17);
        // (27 + 21/2) * 60 = 2250
        let spph = rules.training_rate(Attribute::Intelligence, Attribute::Memory, 1, &attrs);
        assert!((spph - 2250.0).abs() < 1e-9);
    }
}
