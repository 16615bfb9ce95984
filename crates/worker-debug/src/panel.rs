//! Debug panels and the core panel registry.

use std::fmt;
use std::sync::Arc;

use worker_core::{Clock, RequestContext, StartTimeResolver};

use crate::memory::MemoryProbe;

/// A debug panel that collects data at the end of a unit of work.
pub trait Panel: Send + Sync + fmt::Debug {
    /// Registry key of the panel (e.g. "timeline").
    fn id(&self) -> &'static str;

    /// Display name of the panel.
    fn name(&self) -> &'static str;

    /// Collect the panel data for the unit of work described by `ctx`.
    fn save(&self, ctx: &RequestContext) -> serde_json::Value;
}

/// Entry of the core panel registry.
#[derive(Debug, Clone)]
pub enum PanelDescriptor {
    /// A panel implemented and persisted by the host framework.
    Host(&'static str),
    /// A panel collected by this crate.
    Collector(Arc<dyn Panel>),
}

impl PanelDescriptor {
    /// Name of the implementation behind this entry.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Host(class) => *class,
            Self::Collector(panel) => panel.name(),
        }
    }

    /// The collector, if this entry is one.
    pub fn collector(&self) -> Option<&Arc<dyn Panel>> {
        match self {
            Self::Host(_) => None,
            Self::Collector(panel) => Some(panel),
        }
    }
}

/// Ordered panel registry.
pub type PanelMap = Vec<(String, PanelDescriptor)>;

/// The host framework's default panels, in display order.
pub const HOST_CORE_PANELS: [(&str, &str); 12] = [
    ("config", "ConfigPanel"),
    ("log", "LogPanel"),
    ("profiling", "ProfilingPanel"),
    ("db", "DbPanel"),
    ("event", "EventPanel"),
    ("mail", "MailPanel"),
    ("timeline", "TimelinePanel"),
    ("dump", "DumpPanel"),
    ("router", "RouterPanel"),
    ("request", "RequestPanel"),
    ("user", "UserPanel"),
    ("asset", "AssetPanel"),
];

/// The host framework's default panel registry.
pub fn host_core_panels() -> PanelMap {
    HOST_CORE_PANELS
        .iter()
        .map(|&(key, class)| (key.to_string(), PanelDescriptor::Host(class)))
        .collect()
}

/// Merge `overrides` into `panels`.
///
/// An override replaces the entry with the same key in place; keys not
/// present yet are appended in order.
pub fn merge_panels(mut panels: PanelMap, overrides: PanelMap) -> PanelMap {
    for (key, descriptor) in overrides {
        match panels.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = descriptor,
            None => panels.push((key, descriptor)),
        }
    }
    panels
}

/// Time and memory sources shared by the collectors.
#[derive(Debug, Clone)]
pub struct Instrumentation {
    /// Wall clock.
    pub clock: Arc<dyn Clock>,
    /// Peak memory probe.
    pub memory: Arc<dyn MemoryProbe>,
    /// Start-of-work resolver.
    pub resolver: StartTimeResolver,
    /// Request header carrying the start-time marker.
    pub start_time_header: String,
}

impl Instrumentation {
    /// Start of the unit of work described by `ctx`.
    ///
    /// Re-derived on every call from the request's marker.
    pub fn start(&self, ctx: &RequestContext) -> f64 {
        self.resolver
            .resolve(ctx.start_marker(&self.start_time_header))
    }

    /// Current time.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Peak memory usage.
    pub fn peak_memory(&self) -> u64 {
        self.memory.peak_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stub(&'static str);

    impl Panel for Stub {
        fn id(&self) -> &'static str {
            self.0
        }

        fn name(&self) -> &'static str {
            "Stub"
        }

        fn save(&self, _ctx: &RequestContext) -> serde_json::Value {
            serde_json::Value::Null
        }
    }

    fn keys(panels: &PanelMap) -> Vec<&str> {
        panels.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_host_core_panels_order() {
        let panels = host_core_panels();

        assert_eq!(
            keys(&panels),
            vec![
                "config", "log", "profiling", "db", "event", "mail", "timeline", "dump",
                "router", "request", "user", "asset"
            ]
        );
        assert!(panels.iter().all(|(_, d)| d.collector().is_none()));
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let merged = merge_panels(
            host_core_panels(),
            vec![(
                "timeline".to_string(),
                PanelDescriptor::Collector(Arc::new(Stub("timeline"))),
            )],
        );

        assert_eq!(merged.len(), HOST_CORE_PANELS.len());
        assert_eq!(merged[6].0, "timeline");
        assert_eq!(merged[6].1.class(), "Stub");
        assert_eq!(merged[2].1.class(), "ProfilingPanel");
    }

    #[test]
    fn test_merge_appends_new_keys() {
        let merged = merge_panels(
            vec![("config".to_string(), PanelDescriptor::Host("ConfigPanel"))],
            vec![(
                "profiling".to_string(),
                PanelDescriptor::Collector(Arc::new(Stub("profiling"))),
            )],
        );

        assert_eq!(keys(&merged), vec!["config", "profiling"]);
    }
}
