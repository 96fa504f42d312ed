//! arb-gateway — C2, the provider gateway.
//!
//! `ProviderAdapter` is the abstract interface the core invokes to place a
//! bet and to query a ticket's settlement status. Real adapters (browser
//! automation against a sportsbook) are external collaborators and live
//! outside this crate; `SerializedGateway` is the single choke-point through
//! which every placement call is serialized per account.

mod gateway;

#[cfg(feature = "testkit")]
mod mock;

pub use gateway::SerializedGateway;

#[cfg(feature = "testkit")]
pub use mock::MockProviderAdapter;

use arb_schemas::{BetLeg, BetOutcome, SettlementStatus};
use async_trait::async_trait;

/// Abstract interface to a single sportsbook provider (C2).
///
/// Both methods are infallible at the trait boundary: transport failures are
/// folded into `BetOutcome::TransportError` / `SettlementStatus::Error`
/// rather than propagated as `Result::Err`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn place(&self, leg: &BetLeg) -> BetOutcome;

    async fn poll_status(&self, provider_id: &str, ticket_id: &str, account_id: &str) -> SettlementStatus;
}
