//! Redis-backed `WorkQueue`: `BLPOP` against the configured queue name.
//!
//! Grounded on `arb-kv::RedisKvStore`'s pooling shape, but kept as its own
//! small client rather than routed through `KvStore` — `BLPOP` blocks for up
//! to the given timeout and doesn't fit that trait's key/value contract.

use arb_execution::{QueueError, WorkQueue};
use arb_schemas::PairRequest;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct RedisWorkQueue {
    conn: Mutex<redis::aio::MultiplexedConnection>,
    queue_name: String,
}

impl RedisWorkQueue {
    pub async fn connect(redis_url: &str, queue_name: impl Into<String>) -> Result<Self, QueueError> {
        let client = redis::Client::open(redis_url).map_err(|e| QueueError::Transport(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;
        Ok(Self { conn: Mutex::new(conn), queue_name: queue_name.into() })
    }
}

#[async_trait]
impl WorkQueue for RedisWorkQueue {
    async fn receive(&self, timeout: Duration) -> Result<Option<PairRequest>, QueueError> {
        let mut conn = self.conn.lock().await;
        // BLPOP timeout is whole seconds; round up so callers' requested
        // timeout is always honored, never undershot.
        let timeout_secs = timeout.as_secs_f64().ceil();
        let reply: Option<(String, String)> = conn
            .blpop(&self.queue_name, timeout_secs)
            .await
            .map_err(|e| QueueError::Transport(e.to_string()))?;

        let Some((_key, payload)) = reply else {
            return Ok(None);
        };
        serde_json::from_str(&payload)
            .map(Some)
            .map_err(|e| QueueError::Transport(format!("malformed PairRequest payload: {e}")))
    }
}
