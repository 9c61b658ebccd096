//! Upstream URL and header construction, and hop-by-hop stripping.
//!
//! [`build_upstream_headers`] clones the (already annotated) client
//! headers, strips hop-by-hop headers when enabled, and rewrites `Host`
//! to the upstream authority. `Forwarded` and `Via` are left exactly as
//! the annotation layer wrote them.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri};
use url::Url;

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Strip hop-by-hop headers and `content-length` from an upstream response.
///
/// The body has already been fully collected, so `transfer-encoding` and
/// `content-length` from the origin are no longer accurate. Axum sets the
/// correct `content-length` from the actual body bytes.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove(hyper::header::CONTENT_LENGTH);
}

/// Join the upstream base path with the request path and carry the query over.
#[must_use]
pub fn upstream_url(base: &Url, uri: &Uri) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{}", uri.path()));
    url.set_query(uri.query());
    url
}

pub fn build_upstream_headers(
    original: &HeaderMap,
    target_url: &Url,
    strip_hop_by_hop: bool,
) -> HeaderMap {
    let mut headers = original.clone();

    if strip_hop_by_hop {
        for header_name in HOP_BY_HOP.iter() {
            headers.remove(header_name);
        }
    }

    // Rewrite Host
    if let Some(host) = target_url.host_str() {
        let host_value = target_url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        if let Ok(val) = HeaderValue::from_str(&host_value) {
            headers.insert("host", val);
        }
    }

    headers
}
