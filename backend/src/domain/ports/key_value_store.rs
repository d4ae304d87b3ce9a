//! Driven port over the flat key-value store.
//!
//! The store offers single-key reads and writes, optional expiry, and prefix
//! enumeration. It has no transactions and no compare-and-swap; callers that
//! rewrite a record hold the route's write lock instead.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{KeyPrefix, StoreKey};

define_port_error! {
    /// Errors surfaced by key-value store adapters.
    pub enum KeyValueStoreError {
        /// Backend is unavailable, timing out, or rejected the command.
        Backend { message: String } => "key-value store backend failure: {message}",
        /// A stored value could not be encoded or decoded.
        Serialization { message: String } => "key-value store serialisation failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` when absent or expired.
    async fn get(&self, key: &StoreKey) -> Result<Option<String>, KeyValueStoreError>;

    /// Write `value` under `key`, replacing any previous value. A `ttl`
    /// makes the key expire after that duration.
    async fn put(
        &self,
        key: &StoreKey,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KeyValueStoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &StoreKey) -> Result<(), KeyValueStoreError>;

    /// Every live key starting with `prefix`, in ascending key order.
    async fn list(&self, prefix: &KeyPrefix) -> Result<Vec<StoreKey>, KeyValueStoreError>;
}
