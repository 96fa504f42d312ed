//! `PairCoordinator` — C5, the ordered two-leg placement state machine.

use crate::session::SessionRegistry;
use crate::ExecutionOutcome;
use arb_cooldown::CooldownRegistry;
use arb_exposure::ExposureRecorder;
use arb_gateway::{ProviderAdapter, SerializedGateway};
use arb_kv::KvStore;
use arb_reporter::ReporterSink;
use arb_schemas::{BetOutcome, Clock, PairRecord, PairRequest, ReporterEvent, ReporterEventKind};
use arb_settlement::SettlementWatcher;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const IDEMPOTENCY_TTL_SECS: u64 = 3600;

pub struct PairCoordinator<A, K, R, C, S>
where
    A: ProviderAdapter + 'static,
    K: KvStore + 'static,
    R: ReporterSink + 'static,
    C: Clock + Clone + 'static,
    S: SessionRegistry + 'static,
{
    gateway: Arc<SerializedGateway<A>>,
    kv: Arc<K>,
    cooldown: Arc<CooldownRegistry<K, C>>,
    reporter: Arc<R>,
    watcher: Arc<SettlementWatcher<A, K, R, C>>,
    sessions: Arc<S>,
    clock: C,
    shutdown: CancellationToken,
}

impl<A, K, R, C, S> PairCoordinator<A, K, R, C, S>
where
    A: ProviderAdapter + 'static,
    K: KvStore + 'static,
    R: ReporterSink + 'static,
    C: Clock + Clone + 'static,
    S: SessionRegistry + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Arc<SerializedGateway<A>>,
        kv: Arc<K>,
        cooldown: Arc<CooldownRegistry<K, C>>,
        reporter: Arc<R>,
        exposure: Arc<ExposureRecorder<K, R, C>>,
        sessions: Arc<S>,
        clock: C,
        shutdown: CancellationToken,
    ) -> Self {
        let watcher = Arc::new(SettlementWatcher::new(gateway.clone(), exposure, reporter.clone()));
        Self {
            gateway,
            kv,
            cooldown,
            reporter,
            watcher,
            sessions,
            clock,
            shutdown,
        }
    }

    /// Drives one `PairRequest` through the full placement sequence. Never
    /// retries internally — retry policy belongs to the caller that
    /// enqueues `PairRequest`s.
    pub async fn execute(&self, request: PairRequest) -> ExecutionOutcome {
        // Precondition 1: idempotency claim.
        let executed_key = request.executed_key();
        match self.kv.set_if_absent(&executed_key, "claimed", IDEMPOTENCY_TTL_SECS).await {
            Ok(true) => {}
            Ok(false) => {
                self.reporter.emit(ReporterEvent::new(
                    ReporterEventKind::ArbBlocked,
                    serde_json::json!({ "arbId": request.arb_id, "reason": "already_executed" }),
                ));
                return ExecutionOutcome::BlockedAlreadyExecuted;
            }
            Err(err) => {
                tracing::error!(error = %err, arb_id = %request.arb_id, "idempotency claim transport failure");
                self.reporter.emit(ReporterEvent::new(
                    ReporterEventKind::ArbBlocked,
                    serde_json::json!({ "arbId": request.arb_id, "reason": "idempotency_store_unavailable" }),
                ));
                return ExecutionOutcome::BlockedIdempotencyUnavailable;
            }
        }

        // Precondition 2: cooldown.
        let cooldown_key = request.cooldown_key();
        if let Some(remaining) = self.cooldown.remaining_seconds(&cooldown_key).await {
            self.reporter.emit(ReporterEvent::new(
                ReporterEventKind::ArbBlocked,
                serde_json::json!({
                    "arbId": request.arb_id,
                    "reason": "cooldown",
                    "remainingSeconds": remaining,
                }),
            ));
            return ExecutionOutcome::BlockedCooldown { remaining_seconds: remaining };
        }

        // Precondition 3: session readiness.
        if !self.sessions.is_ready(&request.positive_bet.account_id).await {
            self.reporter.emit(ReporterEvent::new(
                ReporterEventKind::ArbFailed,
                serde_json::json!({
                    "arbId": request.arb_id,
                    "reason": "not_logged_in",
                    "failedBet": "positive",
                }),
            ));
            return ExecutionOutcome::FailedNotLoggedIn;
        }

        // Leg 1: positive placement. Strictly happens-before leg 2.
        let positive_outcome = self.gateway.place(&request.positive_bet).await;
        let positive_ticket_id = match positive_outcome {
            BetOutcome::Accepted { ticket_id, .. } => {
                self.reporter.emit(ReporterEvent::new(
                    ReporterEventKind::BetExecuted,
                    serde_json::json!({
                        "arbId": request.arb_id,
                        "leg": "positive",
                        "betId": request.positive_bet.bet_id,
                        "ticketId": ticket_id,
                    }),
                ));
                ticket_id
            }
            BetOutcome::Rejected { reason } => {
                self.emit_positive_leg_failure(&request, &reason);
                return ExecutionOutcome::FailedPositiveRejected;
            }
            BetOutcome::TransportError { detail } => {
                self.emit_positive_leg_failure(&request, &detail);
                return ExecutionOutcome::FailedPositiveRejected;
            }
        };

        // Leg 2: hedge placement.
        let hedge_outcome = self.gateway.place(&request.hedge_bet).await;
        let hedge_ticket_id = match hedge_outcome {
            BetOutcome::Accepted { ticket_id, .. } => {
                self.reporter.emit(ReporterEvent::new(
                    ReporterEventKind::BetExecuted,
                    serde_json::json!({
                        "arbId": request.arb_id,
                        "leg": "hedge",
                        "betId": request.hedge_bet.bet_id,
                        "ticketId": ticket_id,
                    }),
                ));
                ticket_id
            }
            BetOutcome::Rejected { ref reason } => {
                self.emit_hedge_leg_emergency(&request, &positive_ticket_id, reason);
                // Acquire cooldown anyway to prevent immediate re-attempt.
                self.acquire_cooldown_best_effort(&cooldown_key).await;
                return ExecutionOutcome::Emergency;
            }
            BetOutcome::TransportError { ref detail } => {
                self.emit_hedge_leg_emergency(&request, &positive_ticket_id, detail);
                self.acquire_cooldown_best_effort(&cooldown_key).await;
                return ExecutionOutcome::Emergency;
            }
        };

        // Success finalization. Cooldown write strictly happens-before the
        // arb_success emission that mentions cooldownUntil.
        let now = self.clock.now_secs();
        self.acquire_cooldown_best_effort(&cooldown_key).await;

        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::ArbSuccess,
            serde_json::json!({
                "arbId": request.arb_id,
                "cooldownKey": cooldown_key,
                "cooldownUntil": now + arb_config::COOLDOWN_SECONDS,
            }),
        ));

        let bet_pair_id = PairRecord::derive_bet_pair_id(&request.arb_id, now as i64);
        let pair = PairRecord {
            bet_pair_id: bet_pair_id.clone(),
            arb_id: request.arb_id.clone(),
            tenant_id: request.tenant_id().to_string(),
            positive_provider: request.positive_provider.clone(),
            hedge_provider: request.hedge_provider.clone(),
            positive_ticket_id,
            hedge_ticket_id,
            positive_account_id: request.positive_bet.account_id.clone(),
            hedge_account_id: request.hedge_bet.account_id.clone(),
            created_at: now,
            expected_outcome: arb_schemas::EXPECTED_OUTCOME.to_string(),
        };

        self.watcher.clone().spawn_watch(pair, self.shutdown.clone());

        ExecutionOutcome::Success { bet_pair_id }
    }

    fn emit_positive_leg_failure(&self, request: &PairRequest, detail: &str) {
        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::BetFailed,
            serde_json::json!({
                "arbId": request.arb_id,
                "leg": "positive",
                "betId": request.positive_bet.bet_id,
                "reason": detail,
            }),
        ));
        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::ArbFailed,
            serde_json::json!({
                "arbId": request.arb_id,
                "reason": "positive_bet_rejected",
                "hedgeBetStatus": "cancelled",
            }),
        ));
    }

    fn emit_hedge_leg_emergency(&self, request: &PairRequest, positive_ticket_id: &str, detail: &str) {
        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::BetFailed,
            serde_json::json!({
                "arbId": request.arb_id,
                "leg": "hedge",
                "betId": request.hedge_bet.bet_id,
                "reason": detail,
            }),
        ));
        self.reporter.emit(ReporterEvent::new(
            ReporterEventKind::ArbEmergency,
            serde_json::json!({
                "arbId": request.arb_id,
                "severity": "critical",
                "action_required": "manual_hedge",
                "positiveBetResult": "accepted",
                "positiveTicketId": positive_ticket_id,
                "hedgeBetResult": "failed",
            }),
        ));
    }

    async fn acquire_cooldown_best_effort(&self, cooldown_key: &str) {
        if let Err(err) = self.cooldown.acquire(cooldown_key).await {
            tracing::warn!(error = %err, %cooldown_key, "failed to persist cooldown to KV store");
        }
    }
}
