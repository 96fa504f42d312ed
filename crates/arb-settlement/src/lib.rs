//! arb-settlement — C6, the settlement watcher.
//!
//! Spawned once per successful pair, independent of C5. Polls both legs
//! concurrently on a fixed interval up to a hard budget, then hands the two
//! terminal statuses to C7 (and, on exposure, C8).

use arb_exposure::ExposureRecorder;
use arb_gateway::{ProviderAdapter, SerializedGateway};
use arb_kv::KvStore;
use arb_reconcile::{classify, Classification};
use arb_reporter::ReporterSink;
use arb_schemas::{Clock, PairRecord, ReporterEvent, ReporterEventKind, SettlementStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_POLLS: u32 = 120;

pub struct SettlementWatcher<A: ProviderAdapter, K: KvStore, R: ReporterSink, C: Clock> {
    gateway: Arc<SerializedGateway<A>>,
    exposure: Arc<ExposureRecorder<K, R, C>>,
    reporter: Arc<R>,
}

impl<A, K, R, C> SettlementWatcher<A, K, R, C>
where
    A: ProviderAdapter + 'static,
    K: KvStore + 'static,
    R: ReporterSink + 'static,
    C: Clock + 'static,
{
    pub fn new(gateway: Arc<SerializedGateway<A>>, exposure: Arc<ExposureRecorder<K, R, C>>, reporter: Arc<R>) -> Self {
        Self { gateway, exposure, reporter }
    }

    /// Runs the watch to completion in the caller's task. `spawn_watch` is
    /// the usual entry point; this is exposed directly for tests.
    pub async fn watch(&self, pair: PairRecord, cancel: CancellationToken) {
        let pos = poll_leg(
            &self.gateway,
            &pair.positive_provider,
            &pair.positive_ticket_id,
            &pair.positive_account_id,
            cancel.clone(),
        );
        let hedge = poll_leg(
            &self.gateway,
            &pair.hedge_provider,
            &pair.hedge_ticket_id,
            &pair.hedge_account_id,
            cancel.clone(),
        );
        let (pos, hedge) = tokio::join!(pos, hedge);

        // A cancelled watcher does not reconcile — the partial state is
        // intentionally lost.
        let (pos, hedge) = match (pos, hedge) {
            (Some(p), Some(h)) => (p, h),
            _ => return,
        };

        match classify(pos, hedge) {
            Classification::Expected => {
                self.reporter.emit(ReporterEvent::new(
                    ReporterEventKind::PairReconciled,
                    serde_json::json!({
                        "outcome": "expected",
                        "betPairId": pair.bet_pair_id,
                        "arbId": pair.arb_id,
                    }),
                ));
            }
            Classification::Exposure { reason } => {
                self.exposure.record(&pair, pos, hedge, reason).await;
            }
        }
    }

    /// Spawns the watch as an independent task and returns its handle. The
    /// caller may abandon the handle — an abandoned watcher simply never
    /// reconciles, which is an accepted trade-off.
    pub fn spawn_watch(self: Arc<Self>, pair: PairRecord, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.watch(pair, cancel).await })
    }
}

/// Polls one leg until it yields a terminal status or the poll budget is
/// exhausted (120 attempts), in which case it yields `Timeout`. Errors from
/// the gateway surface as `SettlementStatus::Error`, which counts as a poll
/// attempt and is followed by the usual sleep before retrying — it never
/// short-circuits the budget. Returns `None` if cancelled mid-poll.
async fn poll_leg<A: ProviderAdapter>(
    gateway: &SerializedGateway<A>,
    provider_id: &str,
    ticket_id: &str,
    account_id: &str,
    cancel: CancellationToken,
) -> Option<SettlementStatus> {
    for _ in 0..MAX_POLLS {
        let status = tokio::select! {
            _ = cancel.cancelled() => return None,
            status = gateway.poll_status(provider_id, ticket_id, account_id) => status,
        };
        if status.is_terminal() {
            return Some(status);
        }
        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }
    }
    Some(SettlementStatus::Timeout)
}
