//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding config, HTTP
//! client, stats, and uptime), [`build_router`] for constructing the
//! Axum router with the annotation layer, [`build_http_client`] for the
//! connection-pooled hyper client, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::handler::Handler;
use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::{Layer, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::model::Config;
use crate::health::{health_handler, StatsResponse};
use crate::middleware::ForwardedHeadersLayer;
use crate::proxy;

/// Outcome counters for forwarded requests.
#[derive(Debug, Default)]
pub struct Stats {
    forwarded: AtomicU64,
    failed: AtomicU64,
}

impl Stats {
    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsResponse {
        StatsResponse {
            requests_forwarded: self.forwarded.load(Ordering::Relaxed),
            requests_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: Arc<Config>,
    pub upstream: url::Url,
    pub http_client: HttpClient,
    pub forwarded: ForwardedHeadersLayer,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    /// Build state for a validated config. Fails only if `config.upstream`
    /// does not parse as a URL.
    pub fn new(
        config: Config,
        forwarded: ForwardedHeadersLayer,
    ) -> Result<Self, url::ParseError> {
        let upstream = url::Url::parse(&config.upstream)?;
        Ok(Self {
            config: Arc::new(config),
            upstream,
            http_client: build_http_client(),
            forwarded,
            start_time: Instant::now(),
            stats: Stats::default(),
        })
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // Only `ring` is compiled in, but rustls still needs it installed as the
    // process default. A second install attempt is harmless.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

/// `/health` is served locally; everything else is annotated and forwarded.
pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    let forward = state
        .forwarded
        .layer(proxy::forward_handler.with_state(Arc::clone(&state)));

    Router::new()
        .route("/health", get(health_handler))
        .fallback_service(forward)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM. A handler that cannot be
/// installed is logged and never fires.
pub async fn shutdown_signal() {
    let received = tokio::select! {
        () = ctrl_c() => "Ctrl+C",
        () = terminate() => "SIGTERM",
    };
    tracing::info!(signal = received, "shutdown signal received, draining connections");
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
