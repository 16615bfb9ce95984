//! Elapsed-time baseline for stateless workers.
//!
//! A long-lived worker cannot measure a request from the moment the process
//! booted: that instant is stale after the first job. The dispatcher instead
//! stamps each unit of work with its start time, and every measurement is
//! taken relative to that marker.

use crate::clock::ProcessStart;
use crate::error::DebugError;

/// Parse a start-time marker as fractional seconds since the Unix epoch.
pub fn parse_marker(marker: &str) -> Result<f64, DebugError> {
    let trimmed = marker.trim();
    if trimmed.is_empty() {
        return Err(DebugError::InvalidMarker(marker.to_string()));
    }

    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() => Ok(seconds),
        _ => Err(DebugError::InvalidMarker(marker.to_string())),
    }
}

/// Resolves the start of the current unit of work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartTimeResolver {
    fallback: ProcessStart,
}

impl StartTimeResolver {
    /// Create a resolver falling back to the given process start.
    pub fn new(fallback: ProcessStart) -> Self {
        Self { fallback }
    }

    /// The process start used when no usable marker is present.
    pub fn fallback(&self) -> ProcessStart {
        self.fallback
    }

    /// Resolve the start timestamp from an optional marker.
    ///
    /// A missing marker or one that does not parse as a finite number
    /// resolves to the process start.
    pub fn resolve(&self, marker: Option<&str>) -> f64 {
        let Some(marker) = marker else {
            return self.fallback.seconds();
        };

        match parse_marker(marker) {
            Ok(seconds) => seconds,
            Err(err) => {
                tracing::warn!(error = %err, fallback = %self.fallback, "ignoring start-time marker");
                self.fallback.seconds()
            }
        }
    }

    /// Seconds elapsed between the resolved start and `now`, never negative.
    pub fn elapsed(&self, marker: Option<&str>, now: f64) -> f64 {
        (now - self.resolve(marker)).max(0.0)
    }

    /// Milliseconds elapsed, rounded up to the next whole millisecond.
    pub fn elapsed_ms(&self, marker: Option<&str>, now: f64) -> u64 {
        duration_ms(self.resolve(marker), now)
    }
}

/// Whole milliseconds between `start` and `now`, rounded up and clamped at 0.
pub fn duration_ms(start: f64, now: f64) -> u64 {
    let ms = ((now - start) * 1000.0).ceil();
    if ms > 0.0 {
        ms as u64
    } else {
        0
    }
}
