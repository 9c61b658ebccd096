//! Single-upstream HTTP forwarding.
//!
//! [`forward_handler`] is the Axum fallback that receives every
//! non-`/health` request after the annotation layer has stamped it, and
//! relays it to the configured upstream. Header construction lives in
//! [`headers`].

pub mod headers;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, Full};
use url::Url;

use crate::error::ForwardmarkError;
use crate::server::{AppState, HttpClient};

pub struct UpstreamRequest<'a> {
    pub client: &'a HttpClient,
    pub method: Method,
    pub url: &'a Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
}

/// Send one request upstream and collect the full response.
/// The timeout covers both the response head and the body.
pub async fn send_upstream(
    req: UpstreamRequest<'_>,
) -> Result<(StatusCode, HeaderMap, Bytes), ForwardmarkError> {
    let client = req.client;
    let timeout = req.timeout;
    let mut builder = hyper::Request::builder()
        .method(req.method)
        .uri(req.url.as_str());
    if let Some(headers) = builder.headers_mut() {
        *headers = req.headers;
    }
    let upstream_req = builder
        .body(Full::new(req.body))
        .map_err(|e| ForwardmarkError::HttpRequest {
            source: Box::new(e),
        })?;

    let exchange = async {
        let response = client
            .request(upstream_req)
            .await
            .map_err(|e| ForwardmarkError::HttpRequest {
                source: Box::new(e),
            })?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ForwardmarkError::HttpRequest {
                source: Box::new(e),
            })?
            .to_bytes();
        Ok::<_, ForwardmarkError>((status, headers, body))
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ForwardmarkError::UpstreamTimeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        })?
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let target = headers::upstream_url(&state.upstream, &uri);
    let upstream_headers =
        headers::build_upstream_headers(&req_headers, &target, state.config.strip_hop_by_hop);

    tracing::info!(
        method = %method,
        path = %uri.path(),
        upstream = %target,
        "request received"
    );

    let result = send_upstream(UpstreamRequest {
        client: &state.http_client,
        method: method.clone(),
        url: &target,
        headers: upstream_headers,
        body,
        timeout: Duration::from_millis(state.config.timeout),
    })
    .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok((status, mut resp_headers, body_bytes)) => {
            state.stats.record_forwarded();
            tracing::info!(
                method = %method,
                upstream = %target,
                status = status.as_u16(),
                latency_ms,
                "upstream responded"
            );
            headers::strip_response_hop_by_hop(&mut resp_headers);
            let mut builder = Response::builder().status(status);
            if let Some(headers) = builder.headers_mut() {
                *headers = resp_headers;
            }
            builder
                .body(axum::body::Body::from(body_bytes))
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "failed to build response");
                    StatusCode::BAD_GATEWAY.into_response()
                })
        }
        Err(e) => {
            state.stats.record_failed();
            tracing::warn!(
                method = %method,
                upstream = %target,
                error = %e,
                latency_ms,
                "upstream request failed"
            );
            match e {
                ForwardmarkError::UpstreamTimeout { .. } => {
                    StatusCode::GATEWAY_TIMEOUT.into_response()
                }
                _ => StatusCode::BAD_GATEWAY.into_response(),
            }
        }
    }
}
