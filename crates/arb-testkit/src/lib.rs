//! arb-testkit — shared fakes and an end-to-end harness over the whole
//! engine, grounded on the teacher's `mqk-testkit` (`PaperBroker`,
//! `Orchestrator`) role: a single place scenario tests wire a fake KV
//! store, fake gateway, and capturing reporter together instead of each
//! crate's own tests reinventing the plumbing.

mod queue;

pub use queue::InMemoryWorkQueue;

use arb_cooldown::CooldownRegistry;
use arb_execution::{AlwaysReadySessionRegistry, ExecutionOutcome, PairCoordinator};
use arb_exposure::ExposureRecorder;
use arb_gateway::{MockProviderAdapter, SerializedGateway};
use arb_kv::InMemoryKvStore;
use arb_reporter::CapturingReporterSink;
use arb_schemas::{BetLeg, PairRequest, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

type Coordinator = PairCoordinator<MockProviderAdapter, InMemoryKvStore, CapturingReporterSink, SystemClock, AlwaysReadySessionRegistry>;

/// Bundles a full fake-backed engine: `arb-gateway`'s scriptable adapter,
/// `arb-kv`'s in-memory store, `arb-reporter`'s capturing sink, and the
/// real `arb-cooldown`/`arb-exposure`/`arb-execution`/`arb-settlement`
/// logic wired together exactly as `arb-daemon` wires the production
/// versions.
pub struct Harness {
    pub coordinator: Coordinator,
    pub gateway: Arc<SerializedGateway<MockProviderAdapter>>,
    pub kv: Arc<InMemoryKvStore>,
    pub reporter: Arc<CapturingReporterSink>,
    pub cooldown: Arc<CooldownRegistry<InMemoryKvStore, SystemClock>>,
    pub exposure: Arc<ExposureRecorder<InMemoryKvStore, CapturingReporterSink, SystemClock>>,
    pub sessions: Arc<AlwaysReadySessionRegistry>,
    pub shutdown: CancellationToken,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_adapter(MockProviderAdapter::new())
    }

    pub fn with_adapter(adapter: MockProviderAdapter) -> Self {
        let gateway = Arc::new(SerializedGateway::new(adapter, Duration::from_secs(30)));
        let kv = Arc::new(InMemoryKvStore::new());
        let reporter = Arc::new(CapturingReporterSink::new());
        let cooldown = Arc::new(CooldownRegistry::new(kv.clone(), SystemClock));
        let exposure = Arc::new(ExposureRecorder::new(kv.clone(), reporter.clone(), SystemClock));
        let sessions = Arc::new(AlwaysReadySessionRegistry::new());
        let shutdown = CancellationToken::new();

        let coordinator = PairCoordinator::new(
            gateway.clone(),
            kv.clone(),
            cooldown.clone(),
            reporter.clone(),
            exposure.clone(),
            sessions.clone(),
            SystemClock,
            shutdown.clone(),
        );

        Self { coordinator, gateway, kv, reporter, cooldown, exposure, sessions, shutdown }
    }

    pub async fn execute(&self, request: PairRequest) -> ExecutionOutcome {
        self.coordinator.execute(request).await
    }

    /// Polls `pred` on a cooperative yield loop until it's satisfied or a
    /// bounded number of iterations elapse. Used to let a `spawn_watch`ed
    /// settlement task — which runs detached from `execute`'s return —
    /// finish before a test inspects its effects. Scenario scripts resolve
    /// on the watcher's first poll (no `Pending`), so this converges in a
    /// handful of iterations without needing paused virtual time.
    pub async fn wait_for(&self, pred: impl Fn() -> bool) {
        for _ in 0..10_000 {
            if pred() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition did not become true before the iteration budget ran out");
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// The S1-shaped request used throughout the end-to-end scenarios.
pub fn s1_request() -> PairRequest {
    PairRequest {
        arb_id: "ARB1".into(),
        whitelabel: "WL".into(),
        positive_provider: "P1".into(),
        hedge_provider: "P2".into(),
        positive_bet: BetLeg::new("BET_POS_1", "A1", "P1", "Team A vs Team B", "FT_HDP", 2.10, 100).unwrap(),
        hedge_bet: BetLeg::new("BET_HEDGE_1", "A2", "P2", "Team A vs Team B", "FT_HDP", 1.95, 105).unwrap(),
    }
}
