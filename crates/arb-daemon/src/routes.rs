//! Axum router and handlers for arb-daemon's ambient status surface.
//!
//! This is observability only: uptime, queue name, and hydrated-cooldown
//! count. There is no control plane here — nothing to arm or disarm, no run
//! lifecycle to start or stop. The engine's only inbound interface is the
//! work queue consumed in `main.rs`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/v1/status", get(status))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    version: &'static str,
}

pub(crate) async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: "arb-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

#[derive(Serialize)]
struct StatusResponse {
    daemon_uptime_secs: u64,
    queue_name: String,
    cooldowns_hydrated: usize,
    exposure_count: usize,
}

pub(crate) async fn status(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = st.status.read().await.clone();
    let exposure_count = st.exposures.snapshot().await.len();
    Json(StatusResponse {
        daemon_uptime_secs: st.uptime_secs(),
        queue_name: snap.queue_name,
        cooldowns_hydrated: snap.cooldowns_hydrated,
        exposure_count,
    })
}
