//! `forwardmark run` - start the proxy server.
//!
//! Loads and validates the config file, builds the annotation layer,
//! and serves the Axum router with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config;
use crate::error::ForwardmarkError;
use crate::logging;
use crate::middleware::ForwardedHeadersLayer;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), ForwardmarkError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let path = config::resolve_path(args.config.as_deref()).await?;
    let mut config = config::load_file(&path).await?;

    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }

    let forwarded = ForwardedHeadersLayer::new(&config.forwarded, config.name.clone());
    let annotator = forwarded.annotator();
    tracing::info!(
        name = %annotator.name(),
        by_source = %annotator.by_source().describe(),
        for_source = %annotator.for_source().describe(),
        host_identity = %annotator.host_identity(),
        "forwarded header annotation configured"
    );

    let state = AppState::new(config, forwarded).map_err(|e| ForwardmarkError::UriParse {
        source: Box::new(e),
    })?;
    let upstream = state.upstream.clone();
    let state = Arc::new(state);

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        upstream = %upstream,
        config = %path.display(),
        "forwardmark started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("forwardmark stopped");
    Ok(())
}
