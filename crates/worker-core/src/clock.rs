//! Wall-clock time sources.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time as fractional seconds since the Unix epoch.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in seconds.
    fn now(&self) -> f64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        unix_seconds(SystemTime::now())
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}

/// Timestamp captured once when the process booted.
///
/// Used as the start of the request when no start-time marker was
/// supplied, i.e. when the process really does serve a single request.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProcessStart(f64);

impl ProcessStart {
    /// Capture the current system time.
    pub fn capture() -> Self {
        Self(SystemClock.now())
    }

    /// Use an already known boot timestamp.
    pub fn at(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Boot timestamp in seconds since the Unix epoch.
    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ProcessStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

fn unix_seconds(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
