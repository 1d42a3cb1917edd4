//! Per-user and per-channel session state.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Exclusive access to one session slot. `None` means no state is stored.
pub type SessionGuard<V> = OwnedMutexGuard<Option<V>>;

/// In-memory key-value store scoped by session key.
///
/// Each key owns its own slot mutex. Handlers hold the slot guard for the
/// whole read, generate, update sequence, so events for the same key run one
/// at a time while different keys proceed independently.
pub struct SessionStore<K, V> {
    slots: RwLock<HashMap<K, Arc<Mutex<Option<V>>>>>,
}

impl<K, V> Default for SessionStore<K, V> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> SessionStore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, key: &K) -> Arc<Mutex<Option<V>>> {
        if let Some(slot) = self.existing_slot(key).await {
            return slot;
        }
        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    async fn existing_slot(&self, key: &K) -> Option<Arc<Mutex<Option<V>>>> {
        self.slots.read().await.get(key).map(Arc::clone)
    }

    /// Drops the entry for `key` when it is empty and nobody else holds it.
    async fn prune(&self, key: &K) {
        let mut slots = self.slots.write().await;
        let unused = slots.get(key).is_some_and(|slot| {
            Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|value| value.is_none())
        });
        if unused {
            slots.remove(key);
        }
    }

    /// Number of keys currently holding a slot.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }

    /// Waits for exclusive access to the slot of `key`, creating it if needed.
    pub async fn lock(&self, key: &K) -> SessionGuard<V> {
        self.slot(key).await.lock_owned().await
    }

    /// Like [`lock`](Self::lock), but only for keys that currently hold state.
    ///
    /// Never creates a slot, so lookups for unknown keys leave no trace.
    pub async fn lock_active(&self, key: &K) -> Option<SessionGuard<V>> {
        let guard = self.existing_slot(key).await?.lock_owned().await;
        if guard.is_some() {
            return Some(guard);
        }
        drop(guard);
        self.prune(key).await;
        None
    }

    pub async fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.lock_active(key).await.and_then(|guard| guard.clone())
    }

    pub async fn set(&self, key: &K, value: V) {
        *self.lock(key).await = Some(value);
    }

    /// Clears the slot and forgets the key, returning what it held.
    pub async fn remove(&self, key: &K) -> Option<V> {
        let slot = self.existing_slot(key).await?;
        let value = slot.lock().await.take();
        drop(slot);
        self.prune(key).await;
        value
    }
}
