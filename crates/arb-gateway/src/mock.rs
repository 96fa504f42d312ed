//! Scriptable fake `ProviderAdapter`, grounded on the teacher's
//! `mqk-testkit::PaperBroker` deterministic ack/fill queue.

use crate::ProviderAdapter;
use arb_schemas::{BetLeg, BetOutcome, SettlementStatus};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockProviderAdapter {
    outcomes: Mutex<HashMap<String, BetOutcome>>,
    statuses: Mutex<HashMap<String, VecDeque<SettlementStatus>>>,
    placed: Mutex<Vec<String>>,
}

impl MockProviderAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome `place()` returns for a given `bet_id`.
    pub fn queue_outcome(&self, bet_id: impl Into<String>, outcome: BetOutcome) {
        self.outcomes.lock().unwrap().insert(bet_id.into(), outcome);
    }

    /// Script the sequence of statuses `poll_status()` returns for a given
    /// `ticket_id`, popped front-first. Once exhausted, returns `Pending`
    /// forever (drives a watcher to its poll-budget timeout).
    pub fn queue_statuses(&self, ticket_id: impl Into<String>, statuses: Vec<SettlementStatus>) {
        self.statuses
            .lock()
            .unwrap()
            .insert(ticket_id.into(), statuses.into());
    }

    /// `bet_id`s observed by `place()`, in call order — used to assert the
    /// hedge leg was never placed.
    pub fn placed_bet_ids(&self) -> Vec<String> {
        self.placed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockProviderAdapter {
    async fn place(&self, leg: &BetLeg) -> BetOutcome {
        self.placed.lock().unwrap().push(leg.bet_id.clone());
        self.outcomes
            .lock()
            .unwrap()
            .get(&leg.bet_id)
            .cloned()
            .unwrap_or_else(|| BetOutcome::Rejected {
                reason: format!("no scripted outcome for bet_id {}", leg.bet_id),
            })
    }

    async fn poll_status(&self, _provider_id: &str, ticket_id: &str, _account_id: &str) -> SettlementStatus {
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(ticket_id) {
            Some(queue) => queue.pop_front().unwrap_or(SettlementStatus::Pending),
            None => SettlementStatus::Pending,
        }
    }
}
