//! `SerializedGateway` — the single choke-point for all provider operations.
//!
//! # Invariant
//!
//! Bet placements against the same account must be serialized: the
//! provider's own session/page is single-threaded from the engine's point of
//! view, and two concurrent stake inputs on one account's page would race.
//! Cross-account placements proceed fully concurrently — each account gets
//! its own `tokio::sync::Mutex`, held only for the duration of `place`.

use crate::ProviderAdapter;
use arb_schemas::{BetLeg, BetOutcome, SettlementStatus};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct SerializedGateway<A: ProviderAdapter> {
    adapter: A,
    account_locks: DashMap<String, Arc<Mutex<()>>>,
    call_timeout: Duration,
}

impl<A: ProviderAdapter> SerializedGateway<A> {
    pub fn new(adapter: A, call_timeout: Duration) -> Self {
        Self {
            adapter,
            account_locks: DashMap::new(),
            call_timeout,
        }
    }

    /// Direct access to the wrapped adapter, chiefly so tests can inspect a
    /// scriptable fake's recorded calls without the gateway needing to
    /// expose that itself.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn lock_for(&self, account_id: &str) -> Arc<Mutex<()>> {
        self.account_locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Place a single wager, serialized against any other in-flight
    /// placement on the same account. A soft timeout collapses a stuck
    /// provider call into `BetOutcome::TransportError`.
    pub async fn place(&self, leg: &BetLeg) -> BetOutcome {
        let lock = self.lock_for(&leg.account_id);
        let _guard = lock.lock().await;

        match tokio::time::timeout(self.call_timeout, self.adapter.place(leg)).await {
            Ok(outcome) => outcome,
            Err(_) => BetOutcome::TransportError {
                detail: format!("place() exceeded {:?} timeout", self.call_timeout),
            },
        }
    }

    /// Poll a ticket's settlement status. Not serialized — polling is
    /// read-only and the provider's own page navigation for status checks
    /// does not race with a stake input.
    pub async fn poll_status(
        &self,
        provider_id: &str,
        ticket_id: &str,
        account_id: &str,
    ) -> SettlementStatus {
        match tokio::time::timeout(
            self.call_timeout,
            self.adapter.poll_status(provider_id, ticket_id, account_id),
        )
        .await
        {
            Ok(status) => status,
            Err(_) => SettlementStatus::Error,
        }
    }
}

#[cfg(all(test, feature = "testkit"))]
mod tests {
    use super::*;
    use crate::MockProviderAdapter;
    use arb_schemas::BetLeg;

    #[tokio::test]
    async fn cross_account_placements_do_not_block_each_other() {
        let mock = MockProviderAdapter::new();
        mock.queue_outcome(
            "BET1",
            BetOutcome::Accepted { ticket_id: "TKT1".into(), at: 0.0 },
        );
        mock.queue_outcome(
            "BET2",
            BetOutcome::Accepted { ticket_id: "TKT2".into(), at: 0.0 },
        );
        let gw = SerializedGateway::new(mock, Duration::from_secs(5));

        let leg1 = BetLeg::new("BET1", "A1", "P1", "M", "FT_HDP", 2.0, 100).unwrap();
        let leg2 = BetLeg::new("BET2", "A2", "P2", "M", "FT_HDP", 2.0, 100).unwrap();

        let (o1, o2) = tokio::join!(gw.place(&leg1), gw.place(&leg2));
        assert!(o1.is_accepted());
        assert!(o2.is_accepted());
    }
}
