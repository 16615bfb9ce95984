//! Request context for a single unit of work.

use std::collections::HashMap;
use std::net::IpAddr;

/// Header carrying the start time of the current unit of work.
pub const START_TIME_HEADER: &str = "statelessAppStartTime";

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// Request data visible to the debug module for one unit of work.
///
/// A worker builds a fresh context for every job or request it handles, so
/// nothing derived from it outlives the unit of work.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request path.
    pub path: String,
    /// HTTP headers.
    pub headers: Headers,
    /// Address of the client, if known.
    pub remote_addr: Option<IpAddr>,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the client address.
    pub fn with_remote_addr(mut self, addr: IpAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw start-time marker supplied by the dispatcher, if any.
    pub fn start_marker(&self, header: &str) -> Option<&str> {
        self.header(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let ctx = RequestContext::new("/").with_header("X-Custom", "value");

        assert_eq!(ctx.header("x-custom"), Some("value"));
        assert_eq!(ctx.header("X-CUSTOM"), Some("value"));
        assert_eq!(ctx.header("missing"), None);
    }

    #[test]
    fn test_start_marker() {
        let ctx = RequestContext::new("/jobs/42").with_header("statelessappstarttime", "1.25");

        assert_eq!(ctx.start_marker(START_TIME_HEADER), Some("1.25"));
        assert_eq!(RequestContext::new("/").start_marker(START_TIME_HEADER), None);
    }

    #[test]
    fn test_remote_addr() {
        let ctx = RequestContext::new("/").with_remote_addr("127.0.0.1".parse().unwrap());

        assert_eq!(ctx.remote_addr, Some("127.0.0.1".parse().unwrap()));
    }
}
