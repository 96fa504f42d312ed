//! Shared runtime state for arb-daemon.

use arb_cooldown::CooldownRegistry;
use arb_execution::{AlwaysReadySessionRegistry, PairCoordinator, WorkQueue};
use arb_exposure::ExposureRecorder;
use arb_gateway::{MockProviderAdapter, SerializedGateway};
use arb_kv::RedisKvStore;
use arb_reporter::HttpReporterSink;
use arb_schemas::SystemClock;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

pub type Coordinator = PairCoordinator<
    MockProviderAdapter,
    RedisKvStore,
    HttpReporterSink,
    SystemClock,
    AlwaysReadySessionRegistry,
>;

/// Point-in-time snapshot returned by `GET /v1/status`.
#[derive(Clone, Debug, Serialize)]
pub struct StatusSnapshot {
    pub daemon_uptime_secs: u64,
    pub queue_name: String,
    pub cooldowns_hydrated: usize,
}

/// Cloneable (Arc) handle shared across Axum handlers and the queue consumer
/// loop.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub cooldowns: Arc<CooldownRegistry<RedisKvStore, SystemClock>>,
    pub exposures: Arc<ExposureRecorder<RedisKvStore, HttpReporterSink, SystemClock>>,
    pub queue: Arc<dyn WorkQueue>,
    pub shutdown: CancellationToken,
    pub status: Arc<RwLock<StatusSnapshot>>,
    started_at: Instant,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kv: Arc<RedisKvStore>,
        cooldowns: Arc<CooldownRegistry<RedisKvStore, SystemClock>>,
        exposures: Arc<ExposureRecorder<RedisKvStore, HttpReporterSink, SystemClock>>,
        reporter: Arc<HttpReporterSink>,
        queue: Arc<dyn WorkQueue>,
        queue_name: String,
        cooldowns_hydrated: usize,
        shutdown: CancellationToken,
    ) -> Self {
        let gateway = Arc::new(SerializedGateway::new(
            MockProviderAdapter::new(),
            std::time::Duration::from_secs(30),
        ));
        let sessions = Arc::new(AlwaysReadySessionRegistry::new());

        let coordinator = Arc::new(PairCoordinator::new(
            gateway,
            kv,
            cooldowns.clone(),
            reporter,
            exposures.clone(),
            sessions,
            SystemClock,
            shutdown.clone(),
        ));

        let status = Arc::new(RwLock::new(StatusSnapshot {
            daemon_uptime_secs: 0,
            queue_name,
            cooldowns_hydrated,
        }));

        Self {
            coordinator,
            cooldowns,
            exposures,
            queue,
            shutdown,
            status,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
