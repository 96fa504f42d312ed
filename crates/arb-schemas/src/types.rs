use serde::{Deserialize, Serialize};

/// Marker written into every `PairRecord`/`ExposureRecord`: the outcome an
/// arbitrage pair is expected to reach (one leg wins, one loses — or both
/// void). Never anything else; it exists as a named constant instead of a
/// free string so call sites can't typo it.
pub const EXPECTED_OUTCOME: &str = "arb_profit";

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    InvalidOdds(f64),
    InvalidStake(i64),
    EmptyField(&'static str),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::InvalidOdds(o) => write!(f, "odds must be >= 1.00, got {o}"),
            SchemaError::InvalidStake(s) => write!(f, "stake must be a positive integer, got {s}"),
            SchemaError::EmptyField(name) => write!(f, "field `{name}` must not be empty"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// An instruction to place one wager.
///
/// `bet_id` is unique within its enclosing `PairRequest`; `odds` and `stake`
/// are passed through verbatim — this crate never re-rounds a stake.
///
/// `provider_id` is optional on the wire (`provider`, not `providerId`) and
/// defaults to `"unknown"` when absent, matching the inbound producer, which
/// reads it via a plain dictionary `.get("provider", "unknown")` rather than
/// requiring it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetLeg {
    pub bet_id: String,
    pub account_id: String,
    #[serde(rename = "provider", default = "default_provider")]
    pub provider_id: String,
    pub match_name: String,
    pub market_type: String,
    pub odds: f64,
    pub stake: i64,
}

fn default_provider() -> String {
    "unknown".to_string()
}

impl BetLeg {
    pub fn new(
        bet_id: impl Into<String>,
        account_id: impl Into<String>,
        provider_id: impl Into<String>,
        match_name: impl Into<String>,
        market_type: impl Into<String>,
        odds: f64,
        stake: i64,
    ) -> Result<Self, SchemaError> {
        if odds < 1.0 {
            return Err(SchemaError::InvalidOdds(odds));
        }
        if stake <= 0 {
            return Err(SchemaError::InvalidStake(stake));
        }
        let bet_id = bet_id.into();
        if bet_id.is_empty() {
            return Err(SchemaError::EmptyField("bet_id"));
        }
        Ok(Self {
            bet_id,
            account_id: account_id.into(),
            provider_id: provider_id.into(),
            match_name: match_name.into(),
            market_type: market_type.into(),
            odds,
            stake,
        })
    }
}

/// A unit of work submitted to the pair execution coordinator.
///
/// The positive leg must be placed first; the hedge leg is the compensating
/// leg and is placed only if the positive leg is accepted.
///
/// Deserializes via `WirePairRequest`: the inbound message carries a single
/// top-level `provider` (optional) rather than separate `positiveProvider`/
/// `hedgeProvider` fields. Each leg's own `provider` overrides it for that
/// leg; absent both, the provider is `"unknown"`. `positive_provider` and
/// `hedge_provider` on this type are resolved once at construction so the
/// rest of the codebase can keep reading them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WirePairRequest")]
pub struct PairRequest {
    pub arb_id: String,
    /// Source term: "whitelabel".
    pub whitelabel: String,
    pub positive_provider: String,
    pub hedge_provider: String,
    pub positive_bet: BetLeg,
    pub hedge_bet: BetLeg,
}

impl PairRequest {
    pub fn tenant_id(&self) -> &str {
        &self.whitelabel
    }

    pub fn cooldown_key(&self) -> String {
        cooldown_key(&self.whitelabel, &self.positive_provider, &self.positive_bet.account_id)
    }

    pub fn executed_key(&self) -> String {
        executed_key(&self.arb_id)
    }
}

/// Wire shape of an inbound `PairRequest`: a single optional top-level
/// `provider`, used for the cooldown key, independent of each leg's own
/// optional `provider`, used for bookkeeping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePairRequest {
    arb_id: String,
    whitelabel: String,
    #[serde(default)]
    provider: Option<String>,
    positive_bet: BetLeg,
    hedge_bet: BetLeg,
}

impl TryFrom<WirePairRequest> for PairRequest {
    type Error = SchemaError;

    fn try_from(wire: WirePairRequest) -> Result<Self, Self::Error> {
        let top_level_provider = wire.provider.as_deref();
        let positive_provider = leg_provider(&wire.positive_bet, top_level_provider);
        let hedge_provider = leg_provider(&wire.hedge_bet, top_level_provider);
        Ok(PairRequest {
            arb_id: wire.arb_id,
            whitelabel: wire.whitelabel,
            positive_provider,
            hedge_provider,
            positive_bet: wire.positive_bet,
            hedge_bet: wire.hedge_bet,
        })
    }
}

/// A leg's own `provider` wins over the top-level `provider`; absent both,
/// `"unknown"`.
fn leg_provider(leg: &BetLeg, top_level: Option<&str>) -> String {
    if leg.provider_id != default_provider() {
        leg.provider_id.clone()
    } else {
        top_level.unwrap_or("unknown").to_string()
    }
}

/// `cooldown:<tenant>:<provider>:<account>`.
pub fn cooldown_key(tenant_id: &str, provider_id: &str, account_id: &str) -> String {
    format!("cooldown:{tenant_id}:{provider_id}:{account_id}")
}

/// `executed:<arb_id>` — the idempotency sentinel key.
pub fn executed_key(arb_id: &str) -> String {
    format!("executed:{arb_id}")
}

/// `exposure:<tenant>:<positive_provider>:<bet_pair_id>`.
pub fn exposure_key(tenant_id: &str, positive_provider: &str, bet_pair_id: &str) -> String {
    format!("exposure:{tenant_id}:{positive_provider}:{bet_pair_id}")
}

/// Result of a single placement call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BetOutcome {
    Accepted { ticket_id: String, at: f64 },
    Rejected { reason: String },
    TransportError { detail: String },
}

impl BetOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BetOutcome::Accepted { .. })
    }

    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            BetOutcome::Accepted { ticket_id, .. } => Some(ticket_id),
            _ => None,
        }
    }
}

/// A leg's settlement status. Only the terminal variants are ever handed to
/// the reconciliation classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Won,
    Lost,
    Void,
    HalfWon,
    HalfLost,
    Timeout,
    Error,
}

impl SettlementStatus {
    /// `Pending` and `Error` both mean "no settled answer yet" — `Error`
    /// folds in a gateway transport failure on that particular poll
    /// attempt, not a provider-reported terminal outcome. Only a genuine
    /// settled/void/half/timeout status exits a poll loop.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SettlementStatus::Pending | SettlementStatus::Error)
    }

    pub fn is_half(&self) -> bool {
        matches!(self, SettlementStatus::HalfWon | SettlementStatus::HalfLost)
    }

    /// Lowercase `snake_case` name, used when composing `actual_outcome`
    /// strings and exposure reasons (`partial_settlement_<pos>_<hedge>`).
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Won => "won",
            SettlementStatus::Lost => "lost",
            SettlementStatus::Void => "void",
            SettlementStatus::HalfWon => "half_won",
            SettlementStatus::HalfLost => "half_lost",
            SettlementStatus::Timeout => "timeout",
            SettlementStatus::Error => "error",
        }
    }
}

/// Created when both legs of a pair are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRecord {
    pub bet_pair_id: String,
    pub arb_id: String,
    pub tenant_id: String,
    pub positive_provider: String,
    pub hedge_provider: String,
    pub positive_ticket_id: String,
    pub hedge_ticket_id: String,
    pub positive_account_id: String,
    pub hedge_account_id: String,
    pub created_at: f64,
    pub expected_outcome: String,
}

impl PairRecord {
    /// `bet_pair_id = arb_id || "_" || wallclock_seconds`.
    pub fn derive_bet_pair_id(arb_id: &str, wallclock_seconds: i64) -> String {
        format!("{arb_id}_{wallclock_seconds}")
    }

    pub fn exposure_key(&self) -> String {
        exposure_key(&self.tenant_id, &self.positive_provider, &self.bet_pair_id)
    }
}

/// A `(cooldown_key, acquired_at)` pair. Must be identically reconstructable
/// from the persisted KV value (a decimal string of `acquired_at`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownEntry {
    pub acquired_at: f64,
}

impl CooldownEntry {
    pub fn to_kv_value(&self) -> String {
        self.acquired_at.to_string()
    }

    pub fn from_kv_value(value: &str) -> Option<Self> {
        value.parse::<f64>().ok().map(|acquired_at| CooldownEntry { acquired_at })
    }
}

/// Created by the exposure recorder on any non-expected terminal outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureRecord {
    pub bet_pair_id: String,
    pub arb_id: String,
    pub tenant_id: String,
    pub positive_provider: String,
    pub hedge_provider: String,
    pub positive_ticket_id: String,
    pub hedge_ticket_id: String,
    pub positive_status: SettlementStatus,
    pub hedge_status: SettlementStatus,
    pub exposure_reason: String,
    pub detected_at: f64,
    pub expected_outcome: String,
    pub actual_outcome: String,
}

impl ExposureRecord {
    pub fn new(
        pair: &PairRecord,
        positive_status: SettlementStatus,
        hedge_status: SettlementStatus,
        exposure_reason: impl Into<String>,
        detected_at: f64,
    ) -> Self {
        let actual_outcome = format!(
            "{}_{}",
            positive_status.as_wire_str(),
            hedge_status.as_wire_str()
        );
        Self {
            bet_pair_id: pair.bet_pair_id.clone(),
            arb_id: pair.arb_id.clone(),
            tenant_id: pair.tenant_id.clone(),
            positive_provider: pair.positive_provider.clone(),
            hedge_provider: pair.hedge_provider.clone(),
            positive_ticket_id: pair.positive_ticket_id.clone(),
            hedge_ticket_id: pair.hedge_ticket_id.clone(),
            positive_status,
            hedge_status,
            exposure_reason: exposure_reason.into(),
            detected_at,
            expected_outcome: EXPECTED_OUTCOME.to_string(),
            actual_outcome,
        }
    }

    pub fn exposure_key(&self) -> String {
        exposure_key(&self.tenant_id, &self.positive_provider, &self.bet_pair_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_leg_rejects_sub_even_odds() {
        let err = BetLeg::new("b1", "a1", "p1", "M", "FT_HDP", 0.99, 100).unwrap_err();
        assert_eq!(err, SchemaError::InvalidOdds(0.99));
    }

    #[test]
    fn bet_leg_rejects_nonpositive_stake() {
        let err = BetLeg::new("b1", "a1", "p1", "M", "FT_HDP", 2.0, 0).unwrap_err();
        assert_eq!(err, SchemaError::InvalidStake(0));
    }

    #[test]
    fn cooldown_key_is_four_colon_parts() {
        let key = cooldown_key("WL", "P1", "A1");
        assert_eq!(key, "cooldown:WL:P1:A1");
        assert_eq!(key.split(':').count(), 4);
    }

    #[test]
    fn pair_request_round_trips_wire_json() {
        let req = PairRequest {
            arb_id: "ARB1".into(),
            whitelabel: "WL".into(),
            positive_provider: "P1".into(),
            hedge_provider: "P2".into(),
            positive_bet: BetLeg::new("BET_POS_1", "A1", "P1", "Team A vs Team B", "FT_HDP", 2.10, 100)
                .unwrap(),
            hedge_bet: BetLeg::new("BET_HEDGE_1", "A2", "P2", "Team A vs Team B", "FT_HDP", 1.95, 105)
                .unwrap(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"arbId\":\"ARB1\""));
        assert!(json.contains("\"whitelabel\":\"WL\""));
        let back: PairRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn deserializes_real_wire_shape_with_no_leg_provider_and_top_level_provider() {
        let json = r#"{
            "arbId": "ARB1",
            "whitelabel": "WL",
            "provider": "P1",
            "positiveBet": {"betId": "BET_POS_1", "accountId": "A1", "matchName": "Team A vs Team B", "marketType": "FT_HDP", "odds": 2.10, "stake": 100},
            "hedgeBet": {"betId": "BET_HEDGE_1", "accountId": "A2", "matchName": "Team A vs Team B", "marketType": "FT_HDP", "odds": 1.95, "stake": 105}
        }"#;
        let req: PairRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.positive_provider, "P1");
        assert_eq!(req.hedge_provider, "P1");
        assert_eq!(req.positive_bet.provider_id, "unknown");
        assert_eq!(req.cooldown_key(), "cooldown:WL:P1:A1");
    }

    #[test]
    fn deserializes_with_no_provider_anywhere() {
        let json = r#"{
            "arbId": "ARB1",
            "whitelabel": "WL",
            "positiveBet": {"betId": "BET_POS_1", "accountId": "A1", "matchName": "M", "marketType": "FT_HDP", "odds": 2.10, "stake": 100},
            "hedgeBet": {"betId": "BET_HEDGE_1", "accountId": "A2", "matchName": "M", "marketType": "FT_HDP", "odds": 1.95, "stake": 105}
        }"#;
        let req: PairRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.positive_provider, "unknown");
        assert_eq!(req.hedge_provider, "unknown");
    }

    #[test]
    fn leg_level_provider_overrides_top_level() {
        let json = r#"{
            "arbId": "ARB1",
            "whitelabel": "WL",
            "provider": "FALLBACK",
            "positiveBet": {"betId": "BET_POS_1", "accountId": "A1", "provider": "P_POS", "matchName": "M", "marketType": "FT_HDP", "odds": 2.10, "stake": 100},
            "hedgeBet": {"betId": "BET_HEDGE_1", "accountId": "A2", "matchName": "M", "marketType": "FT_HDP", "odds": 1.95, "stake": 105}
        }"#;
        let req: PairRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.positive_provider, "P_POS");
        assert_eq!(req.hedge_provider, "FALLBACK");
    }

    #[test]
    fn bet_pair_id_is_arb_id_underscore_seconds() {
        assert_eq!(PairRecord::derive_bet_pair_id("ARB1", 1_700_000_000), "ARB1_1700000000");
    }

    #[test]
    fn cooldown_entry_round_trips_kv_value() {
        let entry = CooldownEntry { acquired_at: 1_700_000_000.5 };
        let value = entry.to_kv_value();
        let back = CooldownEntry::from_kv_value(&value).unwrap();
        assert_eq!(back, entry);
    }
}
