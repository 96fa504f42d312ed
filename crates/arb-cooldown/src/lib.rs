//! arb-cooldown — C4, the per-(tenant, provider, account) cooldown registry.
//!
//! Cooldowns exist to stop the engine from re-entering execution for an
//! account that just finished a pair: provider session state (open bet
//! slips, page navigation) needs a beat to settle. The 60s window is a hard
//! constant, not configuration — see `arb_config::COOLDOWN_SECONDS`.

use arb_config::COOLDOWN_SECONDS;
use arb_kv::{KvError, KvStore};
use arb_schemas::{cooldown_key, Clock, CooldownEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const COOLDOWN_PREFIX: &str = "cooldown:";

/// In-memory mirror of the cooldown keys held in the KV store, refreshed at
/// start-up via `hydrate` and kept current by `acquire`. Reads never touch
/// the KV store — only `acquire` and `hydrate` do.
pub struct CooldownRegistry<K: KvStore, C: Clock> {
    kv: Arc<K>,
    clock: C,
    entries: RwLock<HashMap<String, f64>>,
}

impl<K: KvStore, C: Clock> CooldownRegistry<K, C> {
    pub fn new(kv: Arc<K>, clock: C) -> Self {
        Self {
            kv,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Loads every live `cooldown:*` key from the KV store into the
    /// in-memory mirror. Run once at start-up so a restart doesn't forget
    /// cooldowns the previous process had just acquired.
    pub async fn hydrate(&self) -> Result<usize, KvError> {
        let rows = self.kv.scan_prefix(COOLDOWN_PREFIX).await?;
        let mut loaded = 0usize;
        let mut guard = self.entries.write().await;
        for (key, value) in rows {
            if let Some(entry) = CooldownEntry::from_kv_value(&value) {
                guard.insert(key, entry.acquired_at);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    /// `true` if `key`'s cooldown window has not yet elapsed.
    pub async fn is_active(&self, key: &str) -> bool {
        match self.entries.read().await.get(key) {
            Some(acquired_at) => self.clock.now_secs() - acquired_at < COOLDOWN_SECONDS,
            None => false,
        }
    }

    /// Seconds remaining in `key`'s cooldown window, or `None` if it is not
    /// active. Used to populate `arb_blocked{remainingSeconds}`.
    pub async fn remaining_seconds(&self, key: &str) -> Option<f64> {
        let acquired_at = *self.entries.read().await.get(key)?;
        let remaining = COOLDOWN_SECONDS - (self.clock.now_secs() - acquired_at);
        (remaining > 0.0).then_some(remaining)
    }

    /// Convenience wrapper over `is_active` that builds the key from its
    /// parts (the `cooldown:<tenant>:<provider>:<account>` key shape).
    pub async fn is_active_for(&self, tenant_id: &str, provider_id: &str, account_id: &str) -> bool {
        self.is_active(&cooldown_key(tenant_id, provider_id, account_id)).await
    }

    /// Claims the cooldown window for `key`: the in-memory mirror is updated
    /// first so concurrent `is_active` callers in this process observe it
    /// immediately, then persisted to the KV store with a matching TTL so a
    /// restart rehydrates the same window.
    pub async fn acquire(&self, key: &str) -> Result<(), KvError> {
        let now = self.clock.now_secs();
        self.entries.write().await.insert(key.to_string(), now);

        let entry = CooldownEntry { acquired_at: now };
        self.kv
            .set_with_ttl(key, &entry.to_kv_value(), COOLDOWN_SECONDS as u64)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_kv::InMemoryKvStore;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_secs(&self) -> f64 {
            self.0.load(Ordering::SeqCst) as f64
        }
    }

    #[tokio::test]
    async fn fresh_key_is_not_active() {
        let kv = Arc::new(InMemoryKvStore::new());
        let registry = CooldownRegistry::new(kv, ManualClock(AtomicI64::new(0)));
        assert!(!registry.is_active("cooldown:WL:P1:A1").await);
    }

    #[tokio::test]
    async fn acquired_key_is_active_until_window_elapses() {
        let kv = Arc::new(InMemoryKvStore::new());
        let clock = ManualClock(AtomicI64::new(1_000));
        let registry = CooldownRegistry::new(kv, clock);

        registry.acquire("cooldown:WL:P1:A1").await.unwrap();
        assert!(registry.is_active("cooldown:WL:P1:A1").await);

        registry.clock.0.store(1_000 + 59, Ordering::SeqCst);
        assert!(registry.is_active("cooldown:WL:P1:A1").await);

        registry.clock.0.store(1_000 + 60, Ordering::SeqCst);
        assert!(!registry.is_active("cooldown:WL:P1:A1").await);
    }

    #[tokio::test]
    async fn hydrate_restores_acquired_cooldowns_from_kv() {
        let kv = Arc::new(InMemoryKvStore::new());
        kv.set_with_ttl("cooldown:WL:P1:A1", "1000", 60).await.unwrap();

        let registry = CooldownRegistry::new(kv, ManualClock(AtomicI64::new(1_030)));
        let loaded = registry.hydrate().await.unwrap();
        assert_eq!(loaded, 1);
        assert!(registry.is_active("cooldown:WL:P1:A1").await);
    }
}
