use arb_gateway::MockProviderAdapter;
use arb_kv::KvStore;
use arb_schemas::{BetOutcome, SettlementStatus};
use arb_testkit::{s1_request, Harness};

#[tokio::test]
async fn s1_happy_path_reconciles_as_expected_with_no_exposure() {
    let adapter = MockProviderAdapter::new();
    adapter.queue_outcome("BET_POS_1", BetOutcome::Accepted { ticket_id: "TKT_P1_1".into(), at: 0.0 });
    adapter.queue_outcome("BET_HEDGE_1", BetOutcome::Accepted { ticket_id: "TKT_P2_1".into(), at: 0.0 });
    adapter.queue_statuses("TKT_P1_1", vec![SettlementStatus::Won]);
    adapter.queue_statuses("TKT_P2_1", vec![SettlementStatus::Lost]);

    let harness = Harness::with_adapter(adapter);
    let outcome = harness.execute(s1_request()).await;
    assert!(matches!(outcome, arb_execution::ExecutionOutcome::Success { .. }));

    harness.wait_for(|| harness.reporter.kinds().len() >= 4).await;

    assert_eq!(
        harness.reporter.kinds(),
        vec!["bet_executed", "bet_executed", "arb_success", "pair_reconciled"]
    );

    let ttl = harness.kv.ttl("cooldown:WL:P1:A1").await.unwrap();
    assert!((59..=60).contains(&ttl));
    assert!(harness.kv.scan_prefix("exposure:").await.unwrap().is_empty());
}
