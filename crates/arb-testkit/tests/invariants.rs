//! End-to-end checks for cross-cutting invariants that don't
//! belong to a single literal scenario.

use arb_cooldown::CooldownRegistry;
use arb_execution::{AlwaysReadySessionRegistry, ExecutionOutcome, PairCoordinator};
use arb_exposure::ExposureRecorder;
use arb_gateway::{MockProviderAdapter, SerializedGateway};
use arb_kv::InMemoryKvStore;
use arb_reporter::CapturingReporterSink;
use arb_schemas::{BetOutcome, SystemClock};
use arb_testkit::s1_request;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn coordinator_over(
    kv: Arc<InMemoryKvStore>,
    cooldown: Arc<CooldownRegistry<InMemoryKvStore, SystemClock>>,
    adapter: MockProviderAdapter,
) -> (PairCoordinator<MockProviderAdapter, InMemoryKvStore, CapturingReporterSink, SystemClock, AlwaysReadySessionRegistry>, Arc<CapturingReporterSink>) {
    let gateway = Arc::new(SerializedGateway::new(adapter, Duration::from_secs(30)));
    let reporter = Arc::new(CapturingReporterSink::new());
    let exposure = Arc::new(ExposureRecorder::new(kv.clone(), reporter.clone(), SystemClock));
    let sessions = Arc::new(AlwaysReadySessionRegistry::new());

    let coordinator = PairCoordinator::new(
        gateway,
        kv,
        cooldown,
        reporter.clone(),
        exposure,
        sessions,
        SystemClock,
        CancellationToken::new(),
    );
    (coordinator, reporter)
}

/// Invariant 5: two concurrent workers racing on the same `arb_id` — exactly
/// one proceeds past the idempotency check, the other is blocked.
#[tokio::test]
async fn concurrent_workers_racing_same_arb_id_yield_exactly_one_winner() {
    let kv = Arc::new(InMemoryKvStore::new());
    let cooldown = Arc::new(CooldownRegistry::new(kv.clone(), SystemClock));

    let adapter_a = MockProviderAdapter::new();
    adapter_a.queue_outcome("BET_POS_1", BetOutcome::Accepted { ticket_id: "TKT_P1_1".into(), at: 0.0 });
    adapter_a.queue_outcome("BET_HEDGE_1", BetOutcome::Accepted { ticket_id: "TKT_P2_1".into(), at: 0.0 });
    let (worker_a, _reporter_a) = coordinator_over(kv.clone(), cooldown.clone(), adapter_a);

    let adapter_b = MockProviderAdapter::new();
    adapter_b.queue_outcome("BET_POS_1", BetOutcome::Accepted { ticket_id: "TKT_P1_2".into(), at: 0.0 });
    adapter_b.queue_outcome("BET_HEDGE_1", BetOutcome::Accepted { ticket_id: "TKT_P2_2".into(), at: 0.0 });
    let (worker_b, _reporter_b) = coordinator_over(kv.clone(), cooldown.clone(), adapter_b);

    let (outcome_a, outcome_b) = tokio::join!(worker_a.execute(s1_request()), worker_b.execute(s1_request()));

    let successes = [&outcome_a, &outcome_b]
        .into_iter()
        .filter(|o| matches!(o, ExecutionOutcome::Success { .. }))
        .count();
    let blocked = [&outcome_a, &outcome_b]
        .into_iter()
        .filter(|o| matches!(o, ExecutionOutcome::BlockedAlreadyExecuted))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(blocked, 1);
}

/// Invariant 4: after a simulated restart (fresh `CooldownRegistry`,
/// re-hydrated from the KV store) an unexpired cooldown still blocks.
#[tokio::test]
async fn cooldown_survives_simulated_restart_via_rehydration() {
    let kv = Arc::new(InMemoryKvStore::new());
    let cooldown = Arc::new(CooldownRegistry::new(kv.clone(), SystemClock));
    cooldown.acquire("cooldown:WL:P1:A1").await.unwrap();

    // Simulate a restart: drop the in-memory registry, build a new one over
    // the same KV store, and hydrate it.
    let restarted = CooldownRegistry::new(kv.clone(), SystemClock);
    let loaded = restarted.hydrate().await.unwrap();
    assert_eq!(loaded, 1);
    assert!(restarted.is_active_for("WL", "P1", "A1").await);
}

/// Invariant 8: cooldown for account A is independent of account B under
/// the same (tenant, provider).
#[tokio::test]
async fn cooldown_keys_are_independent_per_account() {
    let kv = Arc::new(InMemoryKvStore::new());
    let cooldown = Arc::new(CooldownRegistry::new(kv, SystemClock));

    cooldown.acquire("cooldown:WL:P1:A1").await.unwrap();
    assert!(cooldown.is_active_for("WL", "P1", "A1").await);
    assert!(!cooldown.is_active_for("WL", "P1", "A2").await);
}
