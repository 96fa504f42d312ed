//! arb-execution — C5, the pair execution coordinator.
//!
//! The ordered two-leg placement state machine: enforces the idempotency,
//! cooldown, and leg-ordering invariants, then hands successful pairs off
//! to the settlement watcher (C6).

mod coordinator;
mod outcome;
mod queue;
mod session;

pub use coordinator::PairCoordinator;
pub use outcome::ExecutionOutcome;
pub use queue::{QueueError, WorkQueue};
pub use session::SessionRegistry;

#[cfg(feature = "testkit")]
pub use session::AlwaysReadySessionRegistry;
