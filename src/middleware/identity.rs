//! Host identity lookup used for the `by` field and the `Via` hop entry.
//!
//! The lookup is a [`HostnameLookup`] capability so tests (and embedders)
//! can substitute a deterministic name or simulate a host without one.
//! Any closure `Fn() -> Option<String>` implements the trait.

use std::borrow::Cow;

/// Identity used when the host reports no hostname. Downstream services
/// match on this literal, so it must not change.
pub const FALLBACK_HOST_IDENTITY: &str = "traefik";

pub trait HostnameLookup: Send + Sync + 'static {
    /// Returns the local hostname, or `None` when it cannot be determined.
    fn hostname(&self) -> Option<String>;
}

impl<F> HostnameLookup for F
where
    F: Fn() -> Option<String> + Send + Sync + 'static,
{
    fn hostname(&self) -> Option<String> {
        self()
    }
}

/// Reads the hostname from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameLookup for SystemHostname {
    fn hostname(&self) -> Option<String> {
        match hostname::get() {
            Ok(name) => Some(name.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::debug!(error = %e, "hostname lookup failed");
                None
            }
        }
    }
}

/// Resolve the identity string, substituting [`FALLBACK_HOST_IDENTITY`]
/// for a missing or empty hostname.
pub fn resolve_host_identity(lookup: &dyn HostnameLookup) -> Cow<'static, str> {
    match lookup.hostname() {
        Some(name) if !name.is_empty() => Cow::Owned(name),
        _ => Cow::Borrowed(FALLBACK_HOST_IDENTITY),
    }
}
