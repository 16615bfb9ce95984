//! Access control for debug output.

use std::fmt;

use worker_core::RequestContext;

/// Decides whether a request may receive debug output.
pub trait AccessCheck: Send + Sync + fmt::Debug {
    /// Whether debug output is allowed for this request.
    fn check_access(&self, ctx: &RequestContext) -> bool;
}

/// Allows every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AccessCheck for AllowAll {
    fn check_access(&self, _ctx: &RequestContext) -> bool {
        true
    }
}

/// Denies every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AccessCheck for DenyAll {
    fn check_access(&self, _ctx: &RequestContext) -> bool {
        false
    }
}

/// Allows requests from a list of client addresses.
///
/// An entry of `*` allows everyone; an entry containing `*` matches any
/// address that starts with the text before it (e.g. `192.168.*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAllowlist {
    filters: Vec<String>,
}

impl IpAllowlist {
    /// Create an allowlist from address filters.
    pub fn new(filters: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `ip` matches any filter.
    pub fn allows(&self, ip: &str) -> bool {
        self.filters.iter().any(|filter| match filter.find('*') {
            Some(pos) => ip.starts_with(&filter[..pos]),
            None => filter == ip,
        })
    }
}

impl AccessCheck for IpAllowlist {
    fn check_access(&self, ctx: &RequestContext) -> bool {
        let Some(addr) = ctx.remote_addr else {
            tracing::trace!("debug access denied: unknown client address");
            return false;
        };

        let ip = addr.to_string();
        let allowed = self.allows(&ip);
        if !allowed {
            tracing::trace!(ip = %ip, "debug access denied");
        }
        allowed
    }
}
