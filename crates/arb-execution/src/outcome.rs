/// Terminal result of one `execute` call. Mirrors the branches of the
/// precondition checks and two-leg placement sequence — useful mostly for
/// tests; production callers drive behavior entirely off reporter events.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    BlockedAlreadyExecuted,
    /// The idempotency claim itself could not be attempted durably — the KV
    /// store's `set_if_absent` returned a transport error. Fails safe: the
    /// pair is blocked rather than risking a double execution.
    BlockedIdempotencyUnavailable,
    BlockedCooldown { remaining_seconds: f64 },
    FailedNotLoggedIn,
    FailedPositiveRejected,
    Emergency,
    Success { bet_pair_id: String },
}
