//! arb-schemas
//!
//! Data model shared by every crate in the bet-pair execution engine.
//! Plain records with `serde` derives — no I/O, no business logic.

mod clock;
mod events;
mod types;

pub use clock::{Clock, SystemClock};
pub use events::{ReporterEvent, ReporterEventKind};
pub use types::{
    cooldown_key, executed_key, exposure_key, BetLeg, BetOutcome, CooldownEntry, ExposureRecord,
    PairRecord, PairRequest, SchemaError, SettlementStatus, EXPECTED_OUTCOME,
};
