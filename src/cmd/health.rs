//! `forwardmark health` - query a running instance.
//!
//! Fetches `GET /health` from the given base URL and prints either the raw
//! JSON or a summary that includes the `by`/`for` sources the instance is
//! annotating with.

use std::fmt::Write as _;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::ForwardmarkError;
use crate::health::HealthResponse;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), ForwardmarkError> {
    let body = fetch(&args.url, HEALTH_TIMEOUT).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => print!("{}", render(&args.url, &health)),
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }
    Ok(())
}

/// Fetch the raw `/health` body of the instance at `base_url`.
/// Any non-2xx status is reported as [`ForwardmarkError::HealthCheckFailed`].
pub async fn fetch(base_url: &str, timeout: Duration) -> Result<Bytes, ForwardmarkError> {
    let url = format!("{}/health", base_url.trim_end_matches('/'));
    let uri: hyper::Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
        ForwardmarkError::UriParse {
            source: Box::new(e),
        }
    })?;

    let client: Client<HttpConnector, Empty<Bytes>> =
        Client::builder(TokioExecutor::new()).build_http();

    let exchange = async {
        let response = client.get(uri).await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForwardmarkError::HealthCheckFailed(status));
        }
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(request_error)?
            .to_bytes();
        Ok::<_, ForwardmarkError>(body)
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ForwardmarkError::HttpRequest {
            source: format!("health check timed out after {}ms", timeout.as_millis()).into(),
        })?
}

fn request_error(e: impl std::error::Error + Send + Sync + 'static) -> ForwardmarkError {
    ForwardmarkError::HttpRequest {
        source: Box::new(e),
    }
}

/// Human-readable summary of a health response.
#[must_use]
pub fn render(url: &str, health: &HealthResponse) -> String {
    let instance = &health.instance;
    let rows = [
        ("version", health.version.clone()),
        ("uptime", format_uptime(health.uptime_seconds)),
        ("instance", instance.name.clone()),
        ("upstream", instance.upstream.clone()),
        ("host identity", instance.host_identity.clone()),
        ("by", instance.by_source.clone()),
        ("for", instance.for_source.clone()),
        (
            "requests",
            format!(
                "{} forwarded, {} failed",
                health.stats.requests_forwarded, health.stats.requests_failed
            ),
        ),
    ];

    let mut out = format!("\u{2713} forwardmark is healthy ({url})\n");
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<15} {value}", format!("{label}:"));
    }
    out
}

fn format_uptime(seconds: u64) -> String {
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    match (hours, minutes) {
        (0, 0) => format!("{secs}s"),
        (0, _) => format!("{minutes}m {secs}s"),
        _ => format!("{hours}h {minutes}m {secs}s"),
    }
}
