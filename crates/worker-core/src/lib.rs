//! Core abstractions for debugging requests served by stateless workers.
//!
//! This crate provides the fundamental types:
//! - `RequestContext` - Per-unit-of-work request data (headers, remote address)
//! - `Clock` / `ProcessStart` - Wall-clock time sources
//! - `StartTimeResolver` - Elapsed-time baseline from the start-time marker
//! - `DebugConfig` - Module configuration

mod clock;
mod config;
mod context;
mod error;
mod resolver;

pub use clock::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use resolver::*;
