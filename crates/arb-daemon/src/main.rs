//! arb-daemon entry point.
//!
//! Thin by design: bootstrap shared state, then run the queue consumer loop
//! and the status server side by side until shutdown.

use std::net::SocketAddr;

use anyhow::Context;
use arb_daemon::{bootstrap, routes};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist — production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    bootstrap::init_tracing();

    let shutdown = tokio_util::sync::CancellationToken::new();
    let state = bootstrap::bootstrap(shutdown.clone()).await?;

    let app = routes::build_router(state.clone()).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let addr = bind_addr_from_env().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8899)));
    info!("arb-daemon status server listening on http://{addr}");

    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
    });

    let consumer_shutdown = shutdown.clone();
    let consumer = tokio::spawn(bootstrap::run_consumer(state, consumer_shutdown));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
        result = consumer => {
            error!(?result, "queue consumer loop exited unexpectedly");
        }
    }

    shutdown.cancel();
    server.await.context("status server task panicked")?.context("status server crashed")?;

    Ok(())
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("ARB_DAEMON_ADDR").ok()?.parse().ok()
}
