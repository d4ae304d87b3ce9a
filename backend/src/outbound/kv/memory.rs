//! Process-local key-value store with clock-driven expiry.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{KeyPrefix, StoreKey};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// `BTreeMap`-backed store. Expired entries are hidden on read and purged
/// lazily on the next write.
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryKeyValueStore {
    /// Store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Store whose expiry decisions follow `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            clock,
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> Result<usize, KeyValueStoreError> {
        let now = self.clock.utc();
        Ok(self.lock()?.values().filter(|e| e.is_live(now)).count())
    }

    pub fn is_empty(&self) -> Result<bool, KeyValueStoreError> {
        self.len().map(|len| len == 0)
    }

    #[cfg(test)]
    fn stored_entries(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Entry>>, KeyValueStoreError> {
        self.entries
            .lock()
            .map_err(|_| KeyValueStoreError::backend("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, KeyValueStoreError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key.as_str()) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KeyValueStoreError> {
        let now = self.clock.utc();
        let expires_at = ttl
            .map(|ttl| {
                TimeDelta::from_std(ttl)
                    .map(|delta| now + delta)
                    .map_err(|err| KeyValueStoreError::backend(format!("invalid ttl: {err}")))
            })
            .transpose()?;

        self.lock()?.insert(
            key.as_str().to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &StoreKey) -> Result<(), KeyValueStoreError> {
        self.lock()?.remove(key.as_str());
        Ok(())
    }

    async fn list(&self, prefix: &KeyPrefix) -> Result<Vec<StoreKey>, KeyValueStoreError> {
        let now = self.clock.utc();
        let entries = self.lock()?;
        entries
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix.as_str()))
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, _)| {
                StoreKey::new(key.clone())
                    .map_err(|err| KeyValueStoreError::serialization(err.to_string()))
            })
            .collect()
    }
}
