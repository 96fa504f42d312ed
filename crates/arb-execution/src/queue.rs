use arb_schemas::PairRequest;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    Transport(String),
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::Transport(detail) => write!(f, "queue transport error: {detail}"),
        }
    }
}

impl std::error::Error for QueueError {}

/// The inbound side of the engine: a named channel of `PairRequest`s the
/// daemon drains one at a time. Production backend is a Redis list polled
/// with a blocking pop; tests and `arb-cli dry-run` use an in-memory fake.
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Waits up to `timeout` for the next request. `Ok(None)` means the
    /// timeout elapsed with nothing to receive — callers loop and try again,
    /// checking shutdown between attempts.
    async fn receive(&self, timeout: Duration) -> Result<Option<PairRequest>, QueueError>;
}
