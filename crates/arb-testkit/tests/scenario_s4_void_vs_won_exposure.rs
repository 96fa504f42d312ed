use arb_gateway::MockProviderAdapter;
use arb_kv::KvStore;
use arb_schemas::{BetOutcome, SettlementStatus};
use arb_testkit::{s1_request, Harness};

#[tokio::test]
async fn s4_void_vs_won_routes_to_exposure_and_leaves_cooldown_intact() {
    let adapter = MockProviderAdapter::new();
    adapter.queue_outcome("BET_POS_1", BetOutcome::Accepted { ticket_id: "TKT_P1_1".into(), at: 0.0 });
    adapter.queue_outcome("BET_HEDGE_1", BetOutcome::Accepted { ticket_id: "TKT_P2_1".into(), at: 0.0 });
    adapter.queue_statuses("TKT_P1_1", vec![SettlementStatus::Void]);
    adapter.queue_statuses("TKT_P2_1", vec![SettlementStatus::Won]);

    let harness = Harness::with_adapter(adapter);
    harness.execute(s1_request()).await;

    harness.wait_for(|| harness.reporter.kinds().contains(&"exposure_alert")).await;

    let events = harness.reporter.events();
    let alert = events
        .iter()
        .find(|e| e.kind.as_wire_str() == "exposure_alert")
        .expect("exposure_alert was emitted");
    assert_eq!(alert.data["exposureReason"], "positive_void_hedge_active");
    assert_eq!(alert.data["severity"], "high");
    assert_eq!(alert.data["requiresManualReview"], true);
    assert_eq!(alert.data["autoRebetDisabled"], true);

    let rows = harness.kv.scan_prefix("exposure:").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].0.starts_with("exposure:WL:P1:"));

    // Invariant 9: exposure detection leaves cooldown untouched.
    let ttl = harness.kv.ttl("cooldown:WL:P1:A1").await.unwrap();
    assert!(ttl >= 0);
}
