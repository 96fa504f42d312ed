use serde::{Deserialize, Serialize};

/// The eight event kinds the core is responsible for. `login_success`,
/// `login_failed`, and `scan_result` are emitted by external collaborators
/// (session registry, odds scanner) and are not modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReporterEventKind {
    BetExecuted,
    BetFailed,
    ArbBlocked,
    ArbFailed,
    ArbEmergency,
    ArbSuccess,
    PairReconciled,
    ExposureAlert,
}

impl ReporterEventKind {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            ReporterEventKind::BetExecuted => "bet_executed",
            ReporterEventKind::BetFailed => "bet_failed",
            ReporterEventKind::ArbBlocked => "arb_blocked",
            ReporterEventKind::ArbFailed => "arb_failed",
            ReporterEventKind::ArbEmergency => "arb_emergency",
            ReporterEventKind::ArbSuccess => "arb_success",
            ReporterEventKind::PairReconciled => "pair_reconciled",
            ReporterEventKind::ExposureAlert => "exposure_alert",
        }
    }
}

/// Outbound envelope matching the `{type, data}` wire shape POSTed to
/// `<api_base>/api/worker/result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterEvent {
    #[serde(rename = "type")]
    pub kind: ReporterEventKind,
    pub data: serde_json::Value,
}

impl ReporterEvent {
    pub fn new(kind: ReporterEventKind, data: serde_json::Value) -> Self {
        Self { kind, data }
    }
}
