//! Planner configuration with documented constants
//!
//! Values come from the game's attribute rules. They are passed explicitly
//! to the optimizer rather than read from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attributes::AttributeBounds;
use crate::core::error::LoadError;

/// Lowest value a base attribute may be remapped to
pub const DEFAULT_ATTRIBUTE_MIN: i32 = 17;

/// Highest value a base attribute may be remapped to
pub const DEFAULT_ATTRIBUTE_MAX: i32 = 27;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("attribute_min ({min}) must be below attribute_max ({max})")]
    InvertedBounds { min: i32, max: i32 },

    #[error("attribute_min must not be negative (got {0})")]
    NegativeMinimum(i32),

    #[error("parallel_threshold must be at least 1")]
    ZeroParallelThreshold,
}

/// Configuration for the planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Minimum value of every base attribute
    ///
    /// The optimizer never assigns less than this to any attribute, and the
    /// distributable pool is counted above it.
    pub attribute_min: i32,

    /// Maximum value of every base attribute
    ///
    /// `attribute_max - attribute_min + 1` is the per-attribute range the
    /// optimizer walks. The search is O(range^4), so this must stay small.
    pub attribute_max: i32,

    /// Minimum candidate count before the optimizer evaluates in parallel
    ///
    /// Below this threshold rayon's fan-out costs more than it saves.
    pub parallel_threshold: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            attribute_min: DEFAULT_ATTRIBUTE_MIN,
            attribute_max: DEFAULT_ATTRIBUTE_MAX,
            parallel_threshold: 512,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(&self) -> AttributeBounds {
        AttributeBounds::new(self.attribute_min, self.attribute_max)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute_min < 0 {
            return Err(ConfigError::NegativeMinimum(self.attribute_min));
        }
        if self.attribute_min >= self.attribute_max {
            return Err(ConfigError::InvertedBounds {
                min: self.attribute_min,
                max: self.attribute_max,
            });
        }
        if self.parallel_threshold == 0 {
            return Err(ConfigError::ZeroParallelThreshold);
        }
        Ok(())
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    ///
    /// Missing keys fall back to their defaults.
    pub fn parse_toml(content: &str) -> Result<Self, LoadError> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
