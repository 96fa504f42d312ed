//! In-memory `KvStore` fake for tests (`testkit` feature).
//!
//! TTL is tracked as an absolute deadline computed at insertion time, not
//! derived from wall-clock seconds on every read, so scenario tests stay
//! deterministic and fast.

use crate::{KvError, KvStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    deadline: Option<Instant>,
}

#[derive(Default)]
pub struct InMemoryKvStore {
    data: Mutex<HashMap<String, Entry>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_live(entry: &Entry, now: Instant) -> bool {
        entry.deadline.map(|d| d > now).unwrap_or(true)
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let now = Instant::now();
        let map = self.data.lock().unwrap();
        Ok(map
            .get(key)
            .filter(|e| Self::is_live(e, now))
            .map(|e| e.value.clone()))
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool, KvError> {
        let now = Instant::now();
        let mut map = self.data.lock().unwrap();
        if map.get(key).is_some_and(|e| Self::is_live(e, now)) {
            return Ok(false);
        }
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Some(now + Duration::from_secs(ttl_secs)),
            },
        );
        Ok(true)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), KvError> {
        let now = Instant::now();
        let mut map = self.data.lock().unwrap();
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline: Some(now + Duration::from_secs(ttl_secs)),
            },
        );
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<i64, KvError> {
        let now = Instant::now();
        let map = self.data.lock().unwrap();
        match map.get(key) {
            Some(e) if Self::is_live(e, now) => match e.deadline {
                Some(d) => Ok((d - now).as_secs() as i64),
                None => Ok(-1),
            },
            _ => Ok(-1),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, KvError> {
        let now = Instant::now();
        let map = self.data.lock().unwrap();
        Ok(map
            .iter()
            .filter(|(k, e)| k.starts_with(prefix) && Self::is_live(e, now))
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), KvError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_if_absent_blocks_second_claimant() {
        let kv = InMemoryKvStore::new();
        assert!(kv.set_if_absent("executed:ARB1", "claimed", 3600).await.unwrap());
        assert!(!kv.set_if_absent("executed:ARB1", "claimed", 3600).await.unwrap());
    }

    #[tokio::test]
    async fn ttl_reports_minus_one_when_absent() {
        let kv = InMemoryKvStore::new();
        assert_eq!(kv.ttl("missing").await.unwrap(), -1);
    }

    #[tokio::test]
    async fn scan_prefix_finds_only_matching_live_keys() {
        let kv = InMemoryKvStore::new();
        kv.set_with_ttl("cooldown:WL:P1:A1", "100.0", 60).await.unwrap();
        kv.set_with_ttl("cooldown:WL:P1:A2", "200.0", 60).await.unwrap();
        kv.set_with_ttl("executed:ARB1", "claimed", 3600).await.unwrap();

        let mut found = kv.scan_prefix("cooldown:").await.unwrap();
        found.sort();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "cooldown:WL:P1:A1");
    }

    #[tokio::test]
    async fn expired_entry_is_absent_on_read() {
        let kv = InMemoryKvStore::new();
        kv.set_with_ttl("k", "v", 0).await.unwrap();
        // TTL of 0 secs means the deadline is "now"; a moment later it's expired.
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(kv.get("k").await.unwrap(), None);
    }
}
