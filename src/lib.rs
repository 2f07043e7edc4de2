//! Skillplan - skill training planner
//!
//! Builds dependency-correct training plans from a skill catalog, simulates
//! their timing against a character's attributes and live training state,
//! and searches for the attribute remap that finishes a plan soonest.

pub mod attributes;
pub mod catalog;
pub mod character;
pub mod core;
pub mod plan;
