//! The worker debug module.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;
use worker_core::{
    duration_ms, Clock, DebugConfig, DebugError, ProcessStart, RequestContext, StartTimeResolver,
    SystemClock,
};

use crate::access::{AccessCheck, IpAllowlist};
use crate::headers::{DebugHeaders, EventSender};
use crate::logging::MessageStore;
use crate::memory::{MemoryProbe, ProcessMemory};
use crate::panel::{
    host_core_panels, merge_panels, Instrumentation, Panel, PanelDescriptor, PanelMap,
};
use crate::profiling::WorkerProfilingPanel;
use crate::timeline::WorkerTimelinePanel;
use crate::url::DebugUrl;

/// A live debug session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTarget {
    tag: String,
}

impl SessionTarget {
    /// Start a session with a fresh tag.
    pub fn start() -> Self {
        Self {
            tag: Uuid::new_v4().simple().to_string(),
        }
    }

    /// Resume a session with a known tag.
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Opaque session tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Where debug data of the current unit of work goes.
#[derive(Debug, Clone, PartialEq)]
pub enum LogTarget {
    /// An active session; debug output is produced.
    Session(SessionTarget),
    /// Target named but not instantiated; debug output is off.
    Reference(String),
    /// Target definition not instantiated yet; debug output is off.
    Definition(Map<String, Value>),
}

impl LogTarget {
    /// The session, if debug output is active.
    pub fn session(&self) -> Option<&SessionTarget> {
        match self {
            Self::Session(session) => Some(session),
            Self::Reference(_) | Self::Definition(_) => None,
        }
    }
}

/// Debug module for workers that serve many units of work per process.
///
/// Timing is measured from the start-time marker each unit of work carries,
/// falling back to the process start when a request arrives without one.
#[derive(Debug)]
pub struct WorkerDebugModule {
    config: DebugConfig,
    access: Arc<dyn AccessCheck>,
    log_target: LogTarget,
    instrumentation: Instrumentation,
    messages: MessageStore,
    url: DebugUrl,
}

impl WorkerDebugModule {
    /// Create a module with system clock, process memory probe, an IP
    /// allowlist from the config and a fresh session.
    pub fn new(config: DebugConfig, process_start: ProcessStart) -> Result<Self, DebugError> {
        config.validate()?;

        let instrumentation = Instrumentation {
            clock: Arc::new(SystemClock),
            memory: Arc::new(ProcessMemory),
            resolver: StartTimeResolver::new(process_start),
            start_time_header: config.start_time_header.clone(),
        };

        Ok(Self {
            access: Arc::new(IpAllowlist::new(config.allowed_ips.clone())),
            log_target: LogTarget::Session(SessionTarget::start()),
            instrumentation,
            messages: MessageStore::new(),
            url: DebugUrl::new(config.module_id.clone(), config.url_format.clone()),
            config,
        })
    }

    /// Replace the access check.
    pub fn with_access(mut self, access: Arc<dyn AccessCheck>) -> Self {
        self.access = access;
        self
    }

    /// Replace the log target.
    pub fn with_log_target(mut self, target: LogTarget) -> Self {
        self.log_target = target;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.instrumentation.clock = clock;
        self
    }

    /// Replace the memory probe.
    pub fn with_memory(mut self, memory: Arc<dyn MemoryProbe>) -> Self {
        self.instrumentation.memory = memory;
        self
    }

    /// Share an existing message store.
    pub fn with_message_store(mut self, messages: MessageStore) -> Self {
        self.messages = messages;
        self
    }

    /// Unique id of the module.
    pub fn unique_id(&self) -> &str {
        &self.config.module_id
    }

    /// Module configuration.
    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    /// Current log target.
    pub fn log_target(&self) -> &LogTarget {
        &self.log_target
    }

    /// Message store the profiling panel reads from.
    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    /// Begin a new unit of work: fresh session tag, empty message store.
    pub fn start_session(&mut self) -> SessionTarget {
        self.messages.flush();
        let session = SessionTarget::start();
        self.log_target = LogTarget::Session(session.clone());
        session
    }

    /// Whether the request may receive debug output.
    pub fn check_access(&self, ctx: &RequestContext) -> bool {
        self.access.check_access(ctx)
    }

    /// Headers describing `session` for the request in `ctx`.
    pub fn debug_headers(&self, session: &SessionTarget, ctx: &RequestContext) -> DebugHeaders {
        let start = self.instrumentation.start(ctx);

        DebugHeaders {
            tag: session.tag().to_string(),
            duration_ms: duration_ms(start, self.instrumentation.now()),
            link: self.url.session_view(session.tag()),
        }
    }

    /// Decorate a response that is about to be sent with the debug headers.
    ///
    /// Does nothing unless access is granted, a session is active and the
    /// event was sent by a response.
    pub fn on_response_send(&self, ctx: &RequestContext, sender: EventSender<'_>) {
        if !self.check_access(ctx) {
            tracing::trace!(path = %ctx.path, "debug headers skipped: access denied");
            return;
        }

        let Some(session) = self.log_target.session() else {
            tracing::trace!(path = %ctx.path, "debug headers skipped: no active session");
            return;
        };

        let EventSender::Response(response) = sender else {
            tracing::trace!(path = %ctx.path, "debug headers skipped: sender is not a response");
            return;
        };

        let headers = self.debug_headers(session, ctx);
        headers.apply(response.headers_mut());

        tracing::debug!(
            path = %ctx.path,
            tag = %headers.tag,
            duration_ms = headers.duration_ms,
            "debug headers set"
        );
    }

    /// The host's core panels with profiling and timeline measured per unit
    /// of work.
    pub fn core_panels(&self) -> PanelMap {
        let profiling = WorkerProfilingPanel::new(
            self.instrumentation.clone(),
            Arc::new(self.messages.clone()),
        );
        let timeline = WorkerTimelinePanel::new(self.instrumentation.clone());

        merge_panels(
            host_core_panels(),
            vec![
                (
                    "profiling".to_string(),
                    PanelDescriptor::Collector(Arc::new(profiling)),
                ),
                (
                    "timeline".to_string(),
                    PanelDescriptor::Collector(Arc::new(timeline)),
                ),
            ],
        )
    }

    /// Collect the data of every panel implemented by this crate.
    pub fn save_panels(&self, ctx: &RequestContext) -> Vec<(String, Value)> {
        self.core_panels()
            .into_iter()
            .filter_map(|(key, descriptor)| {
                let panel = descriptor.collector()?;
                Some((key, panel.save(ctx)))
            })
            .collect()
    }
}
