//! Clocks and time sampling
//!
//! Training end times come from the game server, so live values are computed
//! against the server-synchronized (authoritative) clock. Estimated start and
//! finish times in a plan are shown in local time.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::types::Timestamp;

/// Source of the current time
pub trait Clock {
    /// Local wall clock
    fn local_time(&self) -> Timestamp;

    /// Server-synchronized time, falling back to the local clock
    fn authoritative_time(&self) -> Timestamp;
}

/// Wall clock with an optional offset learned from the server
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    server_offset: i64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a server timestamp; later authoritative readings follow it
    pub fn synchronize(&mut self, server_time: Timestamp) {
        self.server_offset = server_time - self.local_time();
    }

    pub fn server_offset(&self) -> i64 {
        self.server_offset
    }
}

impl Clock for SystemClock {
    fn local_time(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as Timestamp)
            .unwrap_or(0)
    }

    fn authoritative_time(&self) -> Timestamp {
        self.local_time() + self.server_offset
    }
}

/// Clock frozen at a given instant, advanced by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    local: Timestamp,
    authoritative: Timestamp,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            local: now,
            authoritative: now,
        }
    }

    pub fn with_server_offset(now: Timestamp, offset: i64) -> Self {
        Self {
            local: now,
            authoritative: now + offset,
        }
    }

    pub fn advance(&mut self, seconds: i64) {
        self.local += seconds;
        self.authoritative += seconds;
    }
}

impl Clock for FixedClock {
    fn local_time(&self) -> Timestamp {
        self.local
    }

    fn authoritative_time(&self) -> Timestamp {
        self.authoritative
    }
}

/// Both clock readings, taken once and held for a whole recomputation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSample {
    pub local: Timestamp,
    pub authoritative: Timestamp,
}

impl TimeSample {
    pub fn take(clock: &dyn Clock) -> Self {
        Self {
            local: clock.local_time(),
            authoritative: clock.authoritative_time(),
        }
    }

    /// Sample where local and server time agree
    pub fn at(now: Timestamp) -> Self {
        Self {
            local: now,
            authoritative: now,
        }
    }

    pub fn advanced(self, seconds: i64) -> Self {
        Self {
            local: self.local + seconds,
            authoritative: self.authoritative + seconds,
        }
    }
}

/// Human readable duration, e.g. "2d 5h 13m 20s"
///
/// The slim form drops seconds once the duration reaches an hour.
pub fn format_timediff(seconds: i64, slim: bool) -> String {
    if seconds <= 0 {
        return "0s".to_string();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if !(slim && (days > 0 || hours > 0)) {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_advances_both_readings() {
        let mut clock = FixedClock::with_server_offset(1_000, 30);
        clock.advance(60);
        assert_eq!(clock.local_time(), 1_060);
        assert_eq!(clock.authoritative_time(), 1_090);
    }

    #[test]
    fn test_sample_holds_clock_values() {
        let clock = FixedClock::with_server_offset(500, -20);
        let sample = TimeSample::take(&clock);
        assert_eq!(sample.local, 500);
        assert_eq!(sample.authoritative, 480);
        assert_eq!(sample.advanced(10).authoritative, 490);
    }

    #[test]
    fn test_system_clock_synchronize() {
        let mut clock = SystemClock::new();
        let local = clock.local_time();
        clock.synchronize(local + 120);
        // Allow for the second boundary ticking over during the test
        let diff = clock.authoritative_time() - clock.local_time();
        assert!((118..=121).contains(&diff));
    }

    #[test]
    fn test_format_timediff() {
        assert_eq!(format_timediff(0, false), "0s");
        assert_eq!(format_timediff(59, false), "59s");
        assert_eq!(format_timediff(61, false), "1m 1s");
        assert_eq!(format_timediff(3 * 86_400 + 2 * 3600 + 5, false), "3d 2h 0m 5s");
        assert_eq!(format_timediff(3 * 86_400 + 2 * 3600 + 5, true), "3d 2h 0m");
        assert_eq!(format_timediff(125, true), "2m 5s");
    }
}
