//! Character state: sheet snapshot, training queue and live progress

pub mod live;
pub mod loader;
pub mod queue;
pub mod sheet;

pub use live::{ActiveTraining, Character, LiveProgress, LiveTraining, TrainingPhase};
pub use queue::{QueueEntry, TrainingQueue};
pub use sheet::{CharacterSheet, CharacterSkill};
