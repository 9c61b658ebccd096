//! Value sources for the `by` and `for` fields of the `Forwarded` header.
//!
//! Each field is backed by exactly one [`FieldSource`], chosen once at
//! construction from an ordered candidate list. The first *configured*
//! candidate wins; resolving it may still produce an empty value (an
//! absent header, for example), in which case the field is omitted.
//!
//! Values are raw bytes. Header-sourced values are copied from the wire
//! unchanged apart from trimming, so obs-text bytes survive.

use std::borrow::Cow;
use std::net::SocketAddr;

use http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// The resolved host identity (hostname or fallback).
    HostIdentity,
    /// The peer address of the inbound connection, as `ip:port`.
    RemoteAddr,
    /// The trimmed value of the named inbound header.
    Header(String),
    /// A fixed literal.
    Static(String),
    /// Field is never emitted.
    None,
}

/// Per-request inputs a [`FieldSource`] can draw from.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub headers: &'a HeaderMap,
    pub remote_addr: Option<SocketAddr>,
    pub host_identity: &'a str,
}

impl FieldSource {
    /// Pick the first configured candidate, or [`FieldSource::None`].
    pub fn select<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Option<Self>>,
    {
        candidates.into_iter().flatten().next().unwrap_or(Self::None)
    }

    /// Candidate list for `by`: hostname flag, then header, then static.
    #[must_use]
    pub fn for_by(from_hostname: bool, header: &str, literal: &str) -> Self {
        Self::select([
            from_hostname.then_some(Self::HostIdentity),
            non_empty(header).map(Self::Header),
            non_empty(literal).map(Self::Static),
        ])
    }

    /// Candidate list for `for`: remote address flag, then header, then static.
    #[must_use]
    pub fn for_for(from_remote: bool, header: &str, literal: &str) -> Self {
        Self::select([
            from_remote.then_some(Self::RemoteAddr),
            non_empty(header).map(Self::Header),
            non_empty(literal).map(Self::Static),
        ])
    }

    /// Resolve to a possibly empty value. Never fails.
    pub fn resolve<'a>(&'a self, ctx: &ResolveContext<'a>) -> Cow<'a, [u8]> {
        match self {
            Self::HostIdentity => Cow::Borrowed(ctx.host_identity.as_bytes()),
            Self::RemoteAddr => ctx.remote_addr.map_or(Cow::Borrowed(&[][..]), |addr| {
                Cow::Owned(addr.to_string().into_bytes())
            }),
            Self::Header(name) => Cow::Borrowed(header_value(ctx.headers, name)),
            Self::Static(value) => Cow::Borrowed(value.as_bytes()),
            Self::None => Cow::Borrowed(&[][..]),
        }
    }

    /// Short human-readable description, used by `validate` reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::HostIdentity => "host identity".into(),
            Self::RemoteAddr => "remote address".into(),
            Self::Header(name) => format!("header '{name}'"),
            Self::Static(value) => format!("static '{value}'"),
            Self::None => "not set".into(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed value of `name`. Invalid names and absent headers read as empty.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a [u8] {
    headers
        .get(name)
        .map_or(&[][..], |value| value.as_bytes().trim_ascii())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn resolved(source: &FieldSource, ctx: &ResolveContext<'_>) -> String {
        String::from_utf8(source.resolve(ctx).into_owned()).unwrap()
    }

    fn ctx<'a>(headers: &'a HeaderMap, remote: Option<SocketAddr>) -> ResolveContext<'a> {
        ResolveContext {
            headers,
            remote_addr: remote,
            host_identity: "edge-1",
        }
    }

    #[test]
    fn hostname_flag_wins_over_header_and_static() {
        let source = FieldSource::for_by(true, "X-Proxy", "static-proxy");
        assert_eq!(source, FieldSource::HostIdentity);

        let mut headers = HeaderMap::new();
        headers.insert("x-proxy", "from-header".parse().unwrap());
        assert_eq!(resolved(&source, &ctx(&headers, None)), "edge-1");
    }

    #[test]
    fn header_wins_over_static() {
        let source = FieldSource::for_by(false, "X-Proxy", "static-proxy");
        assert_eq!(source, FieldSource::Header("X-Proxy".into()));
    }

    #[test]
    fn static_used_when_nothing_else_configured() {
        let source = FieldSource::for_for(false, "", "  203.0.113.9 ");
        assert_eq!(source, FieldSource::Static("203.0.113.9".into()));
    }

    #[test]
    fn blank_options_select_none() {
        assert_eq!(FieldSource::for_by(false, "   ", ""), FieldSource::None);
        assert_eq!(FieldSource::for_for(false, "", "\t"), FieldSource::None);
    }

    #[test]
    fn absent_header_resolves_empty_without_falling_through() {
        let source = FieldSource::for_for(false, "X-Client", "198.51.100.1");
        let headers = HeaderMap::new();
        assert_eq!(resolved(&source, &ctx(&headers, None)), "");
    }

    #[test]
    fn header_value_is_trimmed() {
        let source = FieldSource::for_for(false, "x-client", "");
        let mut headers = HeaderMap::new();
        headers.insert("x-client", "  10.0.0.1  ".parse().unwrap());
        assert_eq!(resolved(&source, &ctx(&headers, None)), "10.0.0.1");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let source = FieldSource::Header("X-Client-IP".into());
        let mut headers = HeaderMap::new();
        headers.insert("x-client-ip", "10.1.1.1".parse().unwrap());
        assert_eq!(resolved(&source, &ctx(&headers, None)), "10.1.1.1");
    }

    #[test]
    fn invalid_header_name_resolves_empty() {
        let source = FieldSource::Header("not a header".into());
        let headers = HeaderMap::new();
        assert_eq!(resolved(&source, &ctx(&headers, None)), "");
    }

    #[test]
    fn remote_addr_renders_ip_and_port() {
        let source = FieldSource::for_for(true, "x-client", "");
        let headers = HeaderMap::new();
        let v4: SocketAddr = "192.0.2.10:51234".parse().unwrap();
        let v6: SocketAddr = "[2001:db8::1]:443".parse().unwrap();
        assert_eq!(resolved(&source, &ctx(&headers, Some(v4))), "192.0.2.10:51234");
        assert_eq!(resolved(&source, &ctx(&headers, Some(v6))), "[2001:db8::1]:443");
        assert_eq!(resolved(&source, &ctx(&headers, None)), "");
    }

    #[test]
    fn header_value_keeps_obs_text_bytes() {
        let source = FieldSource::Header("x-client".into());
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-client",
            HeaderValue::from_bytes(b" caf\xe9 ").unwrap(),
        );
        assert_eq!(
            source.resolve(&ctx(&headers, None)).as_ref(),
            b"caf\xe9"
        );
    }
}
