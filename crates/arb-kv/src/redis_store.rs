//! Redis-backed `KvStore`. Connection pooling mirrors the way the teacher's
//! `mqk-db::connect_from_env` pooled Postgres via `PgPoolOptions`.

use crate::{KvError, KvStore};
use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

pub const ENV_REDIS_URL: &str = "REDIS_URL";

pub struct RedisKvStore {
    pool: Pool,
}

/// Connect to Redis using `REDIS_URL`. Fails fast — the daemon treats this
/// as a fatal start-up error (non-zero exit on KV unreachable).
pub async fn connect_from_env() -> Result<RedisKvStore, KvError> {
    let url = std::env::var(ENV_REDIS_URL)
        .map_err(|_| KvError::Transport(format!("missing env var {ENV_REDIS_URL}")))?;
    RedisKvStore::connect(&url).await
}

impl RedisKvStore {
    pub async fn connect(redis_url: &str) -> Result<Self, KvError> {
        let cfg = Config::from_url(redis_url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| KvError::Transport(e.to_string()))?;
        let store = Self { pool };
        store.ping().await?;
        Ok(store)
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, KvError> {
        self.pool.get().await.map_err(|e| KvError::Transport(e.to_string()))
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.get(key).await.map_err(|e| KvError::Transport(e.to_string()))
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        // SET key value EX ttl NX — atomic conditional set with TTL in one round trip.
        let result: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_secs)
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(|e| KvError::Transport(e.to_string()))?;
        Ok(result.is_some())
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| KvError::Transport(e.to_string()))
    }

    async fn ttl(&self, key: &str) -> Result<i64, KvError> {
        let mut conn = self.conn().await?;
        conn.ttl(key).await.map_err(|e| KvError::Transport(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key).await.map_err(|e| KvError::Transport(e.to_string()))
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, KvError> {
        let mut conn = self.conn().await?;
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut out = Vec::new();
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| KvError::Transport(e.to_string()))?;
            for key in keys {
                if let Some(value) = self.get(&key).await? {
                    out.push((key, value));
                }
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(out)
    }

    async fn ping(&self) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| KvError::Transport(e.to_string()))
    }
}
