//! Log messages collected for the debug panels.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Log level of a collected message.
///
/// Levels are bit flags so panels can query several at once; the profile
/// begin/end markers share the [`LogLevel::Profile`] bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Trace,
    Profile,
    ProfileBegin,
    ProfileEnd,
}

impl LogLevel {
    /// Bit value of the level.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Error => 0x01,
            Self::Warning => 0x02,
            Self::Info => 0x04,
            Self::Trace => 0x08,
            Self::Profile => 0x40,
            Self::ProfileBegin => 0x50,
            Self::ProfileEnd => 0x60,
        }
    }

    /// Whether the level falls within a mask of level bits.
    pub const fn matches(self, mask: u32) -> bool {
        self.bits() & mask != 0
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
            Self::Trace => write!(f, "TRACE"),
            Self::Profile => write!(f, "PROFILE"),
            Self::ProfileBegin => write!(f, "PROFILE_BEGIN"),
            Self::ProfileEnd => write!(f, "PROFILE_END"),
        }
    }
}

/// A collected log message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogMessage {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Category (usually the emitting component).
    pub category: String,
    /// Wall-clock timestamp in seconds.
    pub timestamp: f64,
    /// Memory usage in bytes when the message was recorded.
    pub memory: u64,
}

impl LogMessage {
    /// Create a new message.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        category: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            category: category.into(),
            timestamp,
            memory: 0,
        }
    }

    /// Set the memory usage recorded with the message.
    pub fn with_memory(mut self, memory: u64) -> Self {
        self.memory = memory;
        self
    }

    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        format!(
            "[{}][{}] {} @{:.4}",
            self.level, self.category, self.message, self.timestamp
        )
    }
}

/// Source of collected log messages for the panels.
pub trait MessageSource: Send + Sync + fmt::Debug {
    /// Messages whose level matches `mask`, in recording order.
    fn messages(&self, mask: u32) -> Vec<LogMessage>;
}

/// In-memory store of log messages for the current unit of work.
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Arc<Mutex<Vec<LogMessage>>>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message.
    pub fn record(&self, message: LogMessage) {
        self.messages.lock().push(message);
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Remove and return every stored message.
    ///
    /// Workers flush between units of work so messages never leak into the
    /// next job's panels.
    pub fn flush(&self) -> Vec<LogMessage> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl MessageSource for MessageStore {
    fn messages(&self, mask: u32) -> Vec<LogMessage> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.level.matches(mask))
            .cloned()
            .collect()
    }
}
