//! Shared start-up sequence: connect collaborators, hydrate cooldowns, wire
//! `AppState`. Used by both the `arb-daemon` binary (status server + queue
//! loop) and `arb-cli run` (queue loop only, no HTTP server).

use crate::queue::RedisWorkQueue;
use crate::state::AppState;
use anyhow::Context;
use arb_execution::WorkQueue;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn bootstrap(shutdown: CancellationToken) -> anyhow::Result<Arc<AppState>> {
    let config = arb_config::EngineConfig::from_env().context("loading configuration")?;

    let kv = Arc::new(
        arb_kv::RedisKvStore::connect(&config.redis_url)
            .await
            .context("connecting to the KV store — this is fatal, the engine cannot run without it")?,
    );
    info!("connected to KV store");

    let cooldowns = Arc::new(arb_cooldown::CooldownRegistry::new(kv.clone(), arb_schemas::SystemClock));
    let hydrated = cooldowns.hydrate().await.context("hydrating cooldown registry from KV store")?;
    info!(hydrated, "cooldown registry hydrated from KV store");

    let reporter = Arc::new(arb_reporter::HttpReporterSink::new(config.api_base.clone()));
    let exposures = Arc::new(arb_exposure::ExposureRecorder::new(kv.clone(), reporter.clone(), arb_schemas::SystemClock));

    let queue: Arc<dyn WorkQueue> = Arc::new(
        RedisWorkQueue::connect(&config.redis_url, config.queue_name.clone())
            .await
            .context("connecting the work queue consumer")?,
    );

    tracing::warn!(
        "wiring a scripted provider adapter and an always-ready session registry — \
         real provider automation and session establishment are external collaborators \
         not provided by this binary"
    );

    Ok(Arc::new(AppState::new(
        kv,
        cooldowns,
        exposures,
        reporter,
        queue,
        config.queue_name,
        hydrated,
        shutdown,
    )))
}

/// Pulls `PairRequest`s off the queue with a ~1s blocking receive, checking
/// shutdown between attempts. Each request is handed to its own task so a
/// slow settlement watch on one pair never delays picking up the next.
pub async fn run_consumer(state: Arc<AppState>, shutdown: CancellationToken) {
    const RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

    while !shutdown.is_cancelled() {
        match state.queue.receive(RECEIVE_TIMEOUT).await {
            Ok(Some(request)) => {
                let coordinator = state.coordinator.clone();
                let arb_id = request.arb_id.clone();
                tokio::spawn(async move {
                    let outcome = coordinator.execute(request).await;
                    info!(arb_id, ?outcome, "pair execution finished");
                });
            }
            Ok(None) => {}
            Err(err) => {
                error!(error = %err, "work queue receive failed, retrying");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
    info!("queue consumer loop stopped");
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
