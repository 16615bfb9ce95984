//! Profiling panel for stateless workers.

use std::sync::Arc;

use serde::Serialize;
use worker_core::RequestContext;

use crate::logging::{LogLevel, LogMessage, MessageSource};
use crate::panel::{Instrumentation, Panel};

/// Data saved by the profiling panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilingSnapshot {
    /// Peak memory usage in bytes.
    pub memory: u64,
    /// Seconds elapsed since the unit of work started.
    pub time: f64,
    /// Profiling messages, in recording order.
    pub messages: Vec<LogMessage>,
}

/// Profiling panel measuring from the start of the current unit of work.
#[derive(Debug, Clone)]
pub struct WorkerProfilingPanel {
    instrumentation: Instrumentation,
    messages: Arc<dyn MessageSource>,
}

impl WorkerProfilingPanel {
    /// Create the panel.
    pub fn new(instrumentation: Instrumentation, messages: Arc<dyn MessageSource>) -> Self {
        Self {
            instrumentation,
            messages,
        }
    }

    /// Collect the profiling snapshot.
    pub fn snapshot(&self, ctx: &RequestContext) -> ProfilingSnapshot {
        let start = self.instrumentation.start(ctx);

        ProfilingSnapshot {
            memory: self.instrumentation.peak_memory(),
            time: (self.instrumentation.now() - start).max(0.0),
            messages: self.messages.messages(LogLevel::Profile.bits()),
        }
    }
}

impl Panel for WorkerProfilingPanel {
    fn id(&self) -> &'static str {
        "profiling"
    }

    fn name(&self) -> &'static str {
        "WorkerProfilingPanel"
    }

    fn save(&self, ctx: &RequestContext) -> serde_json::Value {
        let snapshot = self.snapshot(ctx);
        tracing::debug!(
            time = snapshot.time,
            memory = snapshot.memory,
            messages = snapshot.messages.len(),
            "profiling panel saved"
        );
        serde_json::to_value(snapshot).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MessageStore;
    use crate::memory::FixedMemory;
    use worker_core::{FixedClock, ProcessStart, StartTimeResolver, START_TIME_HEADER};

    fn panel(now: f64, store: &MessageStore) -> WorkerProfilingPanel {
        WorkerProfilingPanel::new(
            Instrumentation {
                clock: Arc::new(FixedClock(now)),
                memory: Arc::new(FixedMemory(4 * 1024 * 1024)),
                resolver: StartTimeResolver::new(ProcessStart::at(100.0)),
                start_time_header: START_TIME_HEADER.to_string(),
            },
            Arc::new(store.clone()),
        )
    }

    #[test]
    fn test_snapshot_with_marker() {
        let store = MessageStore::new();
        let ctx = RequestContext::new("/").with_header(START_TIME_HEADER, "1000.25");

        let snapshot = panel(1001.0, &store).snapshot(&ctx);

        assert!((snapshot.time - 0.75).abs() < 1e-9);
        assert_eq!(snapshot.memory, 4 * 1024 * 1024);
        assert!(snapshot.messages.is_empty());
    }

    #[test]
    fn test_snapshot_without_marker_uses_process_start() {
        let store = MessageStore::new();

        let snapshot = panel(102.5, &store).snapshot(&RequestContext::new("/"));

        assert_eq!(snapshot.time, 2.5);
    }

    #[test]
    fn test_snapshot_only_profile_messages() {
        let store = MessageStore::new();
        store.record(LogMessage::new(LogLevel::Info, "request", "app", 100.1));
        store.record(LogMessage::new(LogLevel::ProfileBegin, "sql", "db", 100.2));
        store.record(LogMessage::new(LogLevel::ProfileEnd, "sql", "db", 100.3));

        let snapshot = panel(101.0, &store).snapshot(&RequestContext::new("/"));

        assert_eq!(snapshot.messages.len(), 2);
        assert!(snapshot.messages.iter().all(|m| m.category == "db"));
    }

    #[test]
    fn test_time_never_negative() {
        let store = MessageStore::new();
        let ctx = RequestContext::new("/").with_header(START_TIME_HEADER, "5000");

        assert_eq!(panel(101.0, &store).snapshot(&ctx).time, 0.0);
    }

    #[test]
    fn test_save_shape() {
        let store = MessageStore::new();
        let value = panel(101.0, &store).save(&RequestContext::new("/"));

        assert!(value["memory"].is_u64());
        assert!(value["time"].is_f64());
        assert!(value["messages"].is_array());
    }
}
