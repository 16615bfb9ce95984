//! Debug response headers.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

/// Header names written on debugged responses.
pub mod header_names {
    /// Debug session tag.
    pub const X_DEBUG_TAG: &str = "X-Debug-Tag";
    /// Request duration in whole milliseconds.
    pub const X_DEBUG_DURATION: &str = "X-Debug-Duration";
    /// Link to the debug view of the session.
    pub const X_DEBUG_LINK: &str = "X-Debug-Link";
}

/// Writable header collection of an outgoing response.
pub trait ResponseHeaders {
    /// Set a header, replacing any previous value.
    fn set(&mut self, name: &str, value: &str);
}

/// An outgoing response the debug module can decorate.
pub trait DebugResponse {
    /// Access the response headers.
    fn headers_mut(&mut self) -> &mut dyn ResponseHeaders;
}

/// Sender of a response-send event.
///
/// The event bus is shared with other components, so the sender is not
/// always a response.
pub enum EventSender<'a> {
    /// A response about to be sent.
    Response(&'a mut dyn DebugResponse),
    /// Any other component.
    Other,
}

impl<'a> EventSender<'a> {
    /// Wrap a response.
    pub fn response(response: &'a mut dyn DebugResponse) -> Self {
        Self::Response(response)
    }
}

impl std::fmt::Debug for EventSender<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response(_) => f.write_str("EventSender::Response"),
            Self::Other => f.write_str("EventSender::Other"),
        }
    }
}

impl ResponseHeaders for HeaderMap {
    fn set(&mut self, name: &str, value: &str) {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!(header = name, "skipping invalid debug header name");
                return;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.insert(name, value);
            }
            Err(_) => tracing::warn!(header = %name, "skipping invalid debug header value"),
        }
    }
}

impl<B> DebugResponse for http::Response<B> {
    fn headers_mut(&mut self) -> &mut dyn ResponseHeaders {
        http::Response::headers_mut(self)
    }
}

/// The debug headers of one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugHeaders {
    /// Debug session tag.
    pub tag: String,
    /// Duration in whole milliseconds, rounded up.
    pub duration_ms: u64,
    /// Link to the debug view.
    pub link: String,
}

impl DebugHeaders {
    /// Convert to HTTP headers, in the order they are written.
    pub fn to_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (header_names::X_DEBUG_TAG, self.tag.clone()),
            (header_names::X_DEBUG_DURATION, self.duration_ms.to_string()),
            (header_names::X_DEBUG_LINK, self.link.clone()),
        ]
    }

    /// Write the headers onto a response.
    pub fn apply(&self, headers: &mut dyn ResponseHeaders) {
        for (name, value) in self.to_headers() {
            headers.set(name, &value);
        }
    }
}
