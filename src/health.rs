//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, instance name, upstream, the host identity currently
//! stamped into `Via`, the `by`/`for` sources in effect, and cumulative
//! request statistics.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub instance: InstanceHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct InstanceHealth {
    pub name: String,
    pub upstream: String,
    pub host_identity: String,
    pub by_source: String,
    pub for_source: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let annotator = state.forwarded.annotator();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        instance: InstanceHealth {
            name: annotator.name().to_string(),
            upstream: state.config.upstream.clone(),
            host_identity: annotator.host_identity().into_owned(),
            by_source: annotator.by_source().describe(),
            for_source: annotator.for_source().describe(),
        },
        stats: state.stats.snapshot(),
    })
}
