pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{format_timediff, Clock, FixedClock, SystemClock, TimeSample};
pub use config::{ConfigError, PlannerConfig};
pub use error::{CycleNode, LoadError, PlanError, Result};
