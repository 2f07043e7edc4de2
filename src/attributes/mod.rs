//! Training attributes
//!
//! Every character has five attributes. The pair named by a skill decides
//! how fast that skill trains. Base values are assignable within fixed
//! bounds, implants add a read-only bonus, and the total is their sum.

pub mod implant;

pub use implant::Implant;

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

use crate::core::config::{DEFAULT_ATTRIBUTE_MAX, DEFAULT_ATTRIBUTE_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Intelligence,
    Memory,
    Charisma,
    Perception,
    Willpower,
}

impl Attribute {
    /// All attributes, in the order the optimizer enumerates them
    pub const ALL: [Attribute; 5] = [
        Attribute::Intelligence,
        Attribute::Memory,
        Attribute::Charisma,
        Attribute::Perception,
        Attribute::Willpower,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Intelligence => "Intelligence",
            Attribute::Memory => "Memory",
            Attribute::Charisma => "Charisma",
            Attribute::Perception => "Perception",
            Attribute::Willpower => "Willpower",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Attribute::Intelligence => "Int",
            Attribute::Memory => "Mem",
            Attribute::Charisma => "Cha",
            Attribute::Perception => "Per",
            Attribute::Willpower => "Wil",
        }
    }
}

/// Inclusive per-attribute bounds for base values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBounds {
    pub min: i32,
    pub max: i32,
}

impl AttributeBounds {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Points a single attribute can hold above the minimum
    pub fn span(&self) -> i32 {
        self.max - self.min
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for AttributeBounds {
    fn default() -> Self {
        Self::new(DEFAULT_ATTRIBUTE_MIN, DEFAULT_ATTRIBUTE_MAX)
    }
}

/// One value per attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub intelligence: i32,
    pub memory: i32,
    pub charisma: i32,
    pub perception: i32,
    pub willpower: i32,
}

impl Attributes {
    pub fn new(intelligence: i32, memory: i32, charisma: i32, perception: i32, willpower: i32) -> Self {
        Self {
            intelligence,
            memory,
            charisma,
            perception,
            willpower,
        }
    }

    /// Same value for every attribute
    pub fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value)
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Intelligence => self.intelligence,
            Attribute::Memory => self.memory,
            Attribute::Charisma => self.charisma,
            Attribute::Perception => self.perception,
            Attribute::Willpower => self.willpower,
        }
    }

    pub fn set(&mut self, attribute: Attribute, value: i32) {
        match attribute {
            Attribute::Intelligence => self.intelligence = value,
            Attribute::Memory => self.memory = value,
            Attribute::Charisma => self.charisma = value,
            Attribute::Perception => self.perception = value,
            Attribute::Willpower => self.willpower = value,
        }
    }

    pub fn sum(&self) -> i32 {
        Attribute::ALL.iter().map(|a| self.get(*a)).sum()
    }

    /// Clamp a single attribute into the bounds
    pub fn clamp_attribute(&mut self, attribute: Attribute, bounds: AttributeBounds) {
        let value = self.get(attribute).clamp(bounds.min, bounds.max);
        self.set(attribute, value);
    }

    /// Copy with every attribute clamped into the bounds
    pub fn clamped(mut self, bounds: AttributeBounds) -> Self {
        for attribute in Attribute::ALL {
            self.clamp_attribute(attribute, bounds);
        }
        self
    }

    pub fn within(&self, bounds: AttributeBounds) -> bool {
        Attribute::ALL.iter().all(|a| bounds.contains(self.get(*a)))
    }

    /// Points available for redistribution above the per-attribute minimum
    pub fn distributable_points(&self, bounds: AttributeBounds) -> i32 {
        self.sum() - 5 * bounds.min
    }

    /// Sum of the bonuses of every plugged implant
    pub fn from_implants<'a, I>(implants: I) -> Self
    where
        I: IntoIterator<Item = &'a Implant>,
    {
        implants
            .into_iter()
            .fold(Attributes::default(), |acc, implant| acc + implant.bonus)
    }
}

impl Add for Attributes {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            intelligence: self.intelligence + rhs.intelligence,
            memory: self.memory + rhs.memory,
            charisma: self.charisma + rhs.charisma,
            perception: self.perception + rhs.perception,
            willpower: self.willpower + rhs.willpower,
        }
    }
}

impl AddAssign for Attributes {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Attributes {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            intelligence: self.intelligence - rhs.intelligence,
            memory: self.memory - rhs.memory,
            charisma: self.charisma - rhs.charisma,
            perception: self.perception - rhs.perception,
            willpower: self.willpower - rhs.willpower,
        }
    }
}
