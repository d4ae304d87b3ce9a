//! History index over created routes.
//!
//! Entries are written once at route creation and never revised; `orderCount`
//! is a snapshot. Listing a day reads every entry under that day's prefix and
//! orders the result newest first.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::ports::{HistoryIndex, KeyValueStore};
use super::route_records::{RouteRecords, map_store_error};
use super::{
    Error, HistoryDate, HistoryEntry, KeyPrefix, RouteDocument, RouteId, StoreKey,
};

#[derive(Clone)]
pub struct HistoryIndexService {
    store: Arc<dyn KeyValueStore>,
    routes: RouteRecords,
}

impl HistoryIndexService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let routes = RouteRecords::new(store.clone());
        Self { store, routes }
    }
}

#[async_trait]
impl HistoryIndex for HistoryIndexService {
    async fn record(&self, entry: &HistoryEntry) -> Result<(), Error> {
        let key = StoreKey::history(&HistoryDate::of(entry.created_at), &entry.route_id);
        let raw = serde_json::to_string(entry)
            .map_err(|err| Error::internal(format!("history entry encoding failed: {err}")))?;
        self.store
            .put(&key, &raw, None)
            .await
            .map_err(map_store_error)
    }

    async fn list(&self, date: &HistoryDate) -> Result<Vec<HistoryEntry>, Error> {
        let keys = self
            .store
            .list(&KeyPrefix::history_day(date))
            .await
            .map_err(map_store_error)?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            // Entries can vanish between list and get when a delete races.
            let Some(raw) = self.store.get(&key).await.map_err(map_store_error)? else {
                continue;
            };
            match serde_json::from_str::<HistoryEntry>(&raw) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(key = %key, error = %err, "skipping unreadable history entry"),
            }
        }
        entries.sort_by_key(|entry| Reverse(entry.created_at));
        Ok(entries)
    }

    async fn detail(&self, route_id: &RouteId) -> Result<RouteDocument, Error> {
        self.routes.load(route_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::outbound::kv::InMemoryKeyValueStore;
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};

    fn at(timestamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(timestamp)
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn entry(route: &str, created_at: &str, order_count: usize) -> HistoryEntry {
        HistoryEntry {
            route_id: RouteId::new(route).expect("route id"),
            created_at: at(created_at),
            order_count,
        }
    }

    #[fixture]
    fn store() -> Arc<InMemoryKeyValueStore> {
        Arc::new(InMemoryKeyValueStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_newest_first(store: Arc<InMemoryKeyValueStore>) {
        let service = HistoryIndexService::new(store);
        for record in [
            entry("bbbb", "2025-12-11T09:00:00Z", 2),
            entry("aaaa", "2025-12-11T08:00:00Z", 1),
            entry("cccc", "2025-12-11T10:00:00Z", 3),
        ] {
            service.record(&record).await.expect("record");
        }

        let listed = service
            .list(&"2025-12-11".parse().expect("date"))
            .await
            .expect("list");
        let ids: Vec<_> = listed.iter().map(|e| e.route_id.as_str()).collect();
        assert_eq!(ids, ["cccc", "bbbb", "aaaa"]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_is_scoped_to_the_day(store: Arc<InMemoryKeyValueStore>) {
        let service = HistoryIndexService::new(store);
        service
            .record(&entry("aaaa", "2025-12-10T23:59:59Z", 1))
            .await
            .expect("record");
        service
            .record(&entry("bbbb", "2025-12-11T00:00:00Z", 1))
            .await
            .expect("record");

        let listed = service
            .list(&"2025-12-11".parse().expect("date"))
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].route_id.as_str(), "bbbb");
    }

    #[rstest]
    #[tokio::test]
    async fn unreadable_entries_are_skipped(store: Arc<InMemoryKeyValueStore>) {
        let service = HistoryIndexService::new(store.clone());
        service
            .record(&entry("aaaa", "2025-12-11T08:00:00Z", 1))
            .await
            .expect("record");
        let junk = StoreKey::new("history:2025-12-11:zzzz").expect("key");
        store.put(&junk, "{not json", None).await.expect("put");

        let listed = service
            .list(&"2025-12-11".parse().expect("date"))
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn detail_of_unknown_route_is_not_found(store: Arc<InMemoryKeyValueStore>) {
        let service = HistoryIndexService::new(store);
        let err = service
            .detail(&RouteId::new("nope").expect("route id"))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
