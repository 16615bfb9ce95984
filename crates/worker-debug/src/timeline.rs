//! Timeline panel for stateless workers.

use serde::Serialize;
use worker_core::RequestContext;

use crate::panel::{Instrumentation, Panel};

/// Data saved by the timeline panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSnapshot {
    /// Start of the unit of work, seconds since the Unix epoch.
    pub start: f64,
    /// Time of collection, seconds since the Unix epoch.
    pub end: f64,
    /// Peak memory usage in bytes.
    pub memory: u64,
}

impl TimelineSnapshot {
    /// Seconds between start and end.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Timeline panel spanning the current unit of work.
#[derive(Debug, Clone)]
pub struct WorkerTimelinePanel {
    instrumentation: Instrumentation,
}

impl WorkerTimelinePanel {
    /// Create the panel.
    pub fn new(instrumentation: Instrumentation) -> Self {
        Self { instrumentation }
    }

    /// Collect the timeline snapshot.
    pub fn snapshot(&self, ctx: &RequestContext) -> TimelineSnapshot {
        let start = self.instrumentation.start(ctx);

        TimelineSnapshot {
            start,
            // A marker ahead of the worker clock must not invert the span.
            end: self.instrumentation.now().max(start),
            memory: self.instrumentation.peak_memory(),
        }
    }
}

impl Panel for WorkerTimelinePanel {
    fn id(&self) -> &'static str {
        "timeline"
    }

    fn name(&self) -> &'static str {
        "WorkerTimelinePanel"
    }

    fn save(&self, ctx: &RequestContext) -> serde_json::Value {
        let snapshot = self.snapshot(ctx);
        tracing::debug!(
            start = snapshot.start,
            end = snapshot.end,
            memory = snapshot.memory,
            "timeline panel saved"
        );
        serde_json::to_value(snapshot).unwrap_or_default()
    }
}
