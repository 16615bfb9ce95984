//! Debug headers and data panels for stateless workers.
//!
//! Workers that handle many requests or jobs per process cannot time a
//! request from process start. This crate measures each unit of work from
//! the start-time marker its dispatcher supplies and provides:
//! - `WorkerDebugModule` - Debug header injection and panel registry
//! - `WorkerProfilingPanel` / `WorkerTimelinePanel` - Per-unit timing and memory
//! - `MessageStore` - Log messages read by the profiling panel
//! - `IpAllowlist` - Access control for debug output

mod access;
mod headers;
mod logging;
mod memory;
mod module;
mod panel;
mod profiling;
mod timeline;
mod url;

pub use access::*;
pub use headers::*;
pub use logging::*;
pub use memory::*;
pub use module::*;
pub use panel::*;
pub use profiling::*;
pub use timeline::*;
pub use url::*;

// Re-export the core types for convenience
pub use worker_core::{
    DebugConfig, DebugError, ProcessStart, RequestContext, StartTimeResolver, UrlFormat,
    START_TIME_HEADER,
};
