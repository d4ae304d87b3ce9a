//! Per-route single-writer locks.
//!
//! The store offers no compare-and-swap, so every read-modify-write of a
//! route document runs while holding that route's lock. Locks are created on
//! demand and dropped from the map once no writer holds them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::route::RouteId;

/// Registry of in-process locks keyed by route.
#[derive(Debug, Clone, Default)]
pub struct RouteWriteLocks {
    locks: Arc<Mutex<HashMap<RouteId, Weak<AsyncMutex<()>>>>>,
}

impl RouteWriteLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive write access to `route_id`.
    pub async fn acquire(&self, route_id: &RouteId) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(route_id);
        lock.lock_owned().await
    }

    fn lock_for(&self, route_id: &RouteId) -> Arc<AsyncMutex<()>> {
        // Poisoning is ignored: the map only holds weak handles.
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        locks.retain(|_, weak| weak.strong_count() > 0);
        if let Some(existing) = locks.get(route_id).and_then(Weak::upgrade) {
            return existing;
        }
        let fresh = Arc::new(AsyncMutex::new(()));
        locks.insert(route_id.clone(), Arc::downgrade(&fresh));
        fresh
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks
            .lock()
            .map(|locks| locks.values().filter(|w| w.strong_count() > 0).count())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn route(raw: &str) -> RouteId {
        RouteId::new(raw).expect("route id")
    }

    #[tokio::test]
    async fn same_route_is_exclusive() {
        let locks = RouteWriteLocks::new();
        let guard = locks.acquire(&route("abc")).await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move { contender.acquire(&route("abc")).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("second writer proceeds")
            .expect("task joins");
    }

    #[tokio::test]
    async fn different_routes_do_not_block() {
        let locks = RouteWriteLocks::new();
        let _first = locks.acquire(&route("abc")).await;
        tokio::time::timeout(Duration::from_secs(1), locks.acquire(&route("def")))
            .await
            .expect("independent route proceeds");
    }

    #[tokio::test]
    async fn released_locks_are_forgotten() {
        let locks = RouteWriteLocks::new();
        drop(locks.acquire(&route("abc")).await);
        assert_eq!(locks.tracked(), 0);
    }
}
