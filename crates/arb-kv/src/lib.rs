//! arb-kv — C1, the durable KV store adapter.
//!
//! `KvStore` is the only contract the rest of the engine depends on; the
//! actual key store may be Redis (`RedisKvStore`, this crate's production
//! implementation) or an in-memory fake (`testkit` feature) — tests target
//! the trait, never the backend.

mod redis_store;

#[cfg(feature = "testkit")]
mod mem;

pub use redis_store::{connect_from_env, RedisKvStore, ENV_REDIS_URL};

#[cfg(feature = "testkit")]
pub use mem::InMemoryKvStore;

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    Transport(String),
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Transport(detail) => write!(f, "KV transport error: {detail}"),
        }
    }
}

impl std::error::Error for KvError {}

/// Typed access to the shared key-value store.
///
/// `ttl` returns seconds remaining, or `-1` if the key is absent or has no
/// TTL. `set_if_absent` returns `true` only if the key was newly set; a
/// `false` return means the key already existed — callers must never treat
/// a transport failure (an `Err`) the same as a `false` (key taken).
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;
    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool, KvError>;
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError>;
    async fn ttl(&self, key: &str) -> Result<i64, KvError>;
    async fn delete(&self, key: &str) -> Result<(), KvError>;
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, KvError>;
    async fn ping(&self) -> Result<(), KvError>;
}
