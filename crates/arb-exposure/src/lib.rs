//! arb-exposure — C8, the exposure recorder.
//!
//! # Invariant
//!
//! This crate never links against `arb-cooldown`. Exposure and cooldown are
//! orthogonal: whatever cooldown a pair's placement acquired stays active
//! for its full window regardless of how the pair settles.

use arb_kv::KvStore;
use arb_reporter::ReporterSink;
use arb_schemas::{Clock, ExposureRecord, PairRecord, ReporterEvent, ReporterEventKind, SettlementStatus};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

const DEFAULT_CAP: usize = 10_000;

/// Records an `ExposureRecord` for any pair that settles outside its
/// expected outcome. KV persistence, the in-memory mirror, and the
/// reporter emission all happen even if an earlier step failed — only the
/// KV write's failure is logged rather than propagated.
pub struct ExposureRecorder<K: KvStore, R: ReporterSink, C: Clock> {
    kv: Arc<K>,
    reporter: Arc<R>,
    clock: C,
    cap: usize,
    records: Mutex<VecDeque<ExposureRecord>>,
}

impl<K: KvStore, R: ReporterSink, C: Clock> ExposureRecorder<K, R, C> {
    pub fn new(kv: Arc<K>, reporter: Arc<R>, clock: C) -> Self {
        Self::with_cap(kv, reporter, clock, DEFAULT_CAP)
    }

    pub fn with_cap(kv: Arc<K>, reporter: Arc<R>, clock: C, cap: usize) -> Self {
        Self {
            kv,
            reporter,
            clock,
            cap,
            records: Mutex::new(VecDeque::new()),
        }
    }

    /// Records one exposure: persists to the KV store, mirrors in memory
    /// (oldest-evict beyond `cap`), and emits `exposure_alert`.
    pub async fn record(&self, pair: &PairRecord, pos: SettlementStatus, hedge: SettlementStatus, reason: impl Into<String>) {
        let record = ExposureRecord::new(pair, pos, hedge, reason, self.clock.now_secs());

        let key = record.exposure_key();
        let serialized = serde_json::to_string(&record).expect("ExposureRecord always serializes");
        if let Err(err) = self.kv.set_with_ttl(&key, &serialized, 86_400).await {
            tracing::warn!(error = %err, %key, "failed to persist exposure record");
        }

        {
            let mut guard = self.records.lock().await;
            guard.push_back(record.clone());
            while guard.len() > self.cap {
                guard.pop_front();
            }
        }

        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::ExposureAlert,
            serde_json::json!({
                "severity": "high",
                "arbId": record.arb_id,
                "betPairId": record.bet_pair_id,
                "exposureKey": key,
                "exposureReason": record.exposure_reason,
                "positiveTicketId": record.positive_ticket_id,
                "hedgeTicketId": record.hedge_ticket_id,
                "positiveStatus": record.positive_status.as_wire_str(),
                "hedgeStatus": record.hedge_status.as_wire_str(),
                "requiresManualReview": true,
                "autoRebetDisabled": true,
            }),
        ));
    }

    /// Point-in-time snapshot of the in-memory mirror, oldest first.
    pub async fn snapshot(&self) -> Vec<ExposureRecord> {
        self.records.lock().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_kv::InMemoryKvStore;
    use arb_reporter::CapturingReporterSink;
    use arb_schemas::SystemClock;

    fn sample_pair() -> PairRecord {
        PairRecord {
            bet_pair_id: "ARB1_1700000000".into(),
            arb_id: "ARB1".into(),
            tenant_id: "WL".into(),
            positive_provider: "P1".into(),
            hedge_provider: "P2".into(),
            positive_ticket_id: "TKT_P1_1".into(),
            hedge_ticket_id: "TKT_P2_1".into(),
            positive_account_id: "A1".into(),
            hedge_account_id: "A2".into(),
            created_at: 1_700_000_000.0,
            expected_outcome: arb_schemas::EXPECTED_OUTCOME.to_string(),
        }
    }

    #[tokio::test]
    async fn record_persists_mirrors_and_emits() {
        let kv = Arc::new(InMemoryKvStore::new());
        let reporter = Arc::new(CapturingReporterSink::new());
        let recorder = ExposureRecorder::new(kv.clone(), reporter.clone(), SystemClock);

        let pair = sample_pair();
        recorder
            .record(&pair, SettlementStatus::Void, SettlementStatus::Won, "positive_void_hedge_active")
            .await;

        let key = pair.exposure_key();
        assert!(kv.get(&key).await.unwrap().is_some());
        assert_eq!(recorder.snapshot().await.len(), 1);
        assert_eq!(reporter.kinds(), vec!["exposure_alert"]);
    }

    #[tokio::test]
    async fn mirror_evicts_oldest_beyond_cap() {
        let kv = Arc::new(InMemoryKvStore::new());
        let reporter = Arc::new(CapturingReporterSink::new());
        let recorder = ExposureRecorder::with_cap(kv, reporter, SystemClock, 2);

        for i in 0..3 {
            let mut pair = sample_pair();
            pair.bet_pair_id = format!("ARB{i}_1700000000");
            recorder
                .record(&pair, SettlementStatus::Lost, SettlementStatus::Lost, "both_lost_unexpected")
                .await;
        }

        let snapshot = recorder.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].bet_pair_id, "ARB1_1700000000");
        assert_eq!(snapshot[1].bet_pair_id, "ARB2_1700000000");
    }
}
